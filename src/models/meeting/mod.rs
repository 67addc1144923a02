pub mod access;
pub mod id;
pub mod queries;
pub mod types;

pub use id::generate_meeting_id;
pub use queries::*;
pub use types::*;
