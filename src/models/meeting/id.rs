use rand::Rng;
use rand::distr::Alphanumeric;

pub const MEETING_ID_LEN: usize = 8;

/// Short public meeting id: 8 random ASCII letters and digits.
pub fn generate_meeting_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(MEETING_ID_LEN)
        .map(char::from)
        .collect()
}

/// Whether a path segment looks like a generated meeting id.
pub fn is_meeting_id(value: &str) -> bool {
    value.len() == MEETING_ID_LEN && value.chars().all(|c| c.is_ascii_alphanumeric())
}
