/// Meeting pages.
///
/// - `create.rs`: type chooser, one-on-one and video-conference forms
/// - `list.rs`: meetings I created, meetings I can join
/// - `join.rs`: join check for a single meeting
/// - `update.rs`: cancel / reactivate
/// - `forms.rs`: form parsing, field error state and validation

pub mod create;
pub mod forms;
pub mod join;
pub mod list;
pub mod update;

pub use create::{choose_type, one_on_one_form, one_on_one_submit, video_conference_form, video_conference_submit};
pub use join::join;
pub use list::{joinable, mine};
pub use update::set_status;
