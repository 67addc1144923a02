/// Validate a required text field with a max length.
pub fn validate_required(value: &str, message: &str, max_len: usize, field_name: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(message.to_string());
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate that a number falls inside an inclusive range.
pub fn validate_range(value: i64, min: i64, max: i64, field_name: &str) -> Option<String> {
    if value < min || value > max {
        return Some(format!("{field_name} must be between {min} and {max}"));
    }
    None
}
