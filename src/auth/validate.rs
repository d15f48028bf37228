/// Validate a username: 1-150 chars, letters, digits and `@.+-_` only.
pub fn validate_username(username: &str) -> Option<String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Some("This field may not be blank.".to_string());
    }
    if trimmed.len() > 150 {
        return Some("Ensure this field has no more than 150 characters.".to_string());
    }
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        return Some(
            "Enter a valid username. This value may contain only letters, numbers, \
             and @/./+/-/_ characters."
                .to_string(),
        );
    }
    None
}

/// Validate a password: min 8 chars on create.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("This field may not be blank.".to_string());
    }
    if password.len() < 8 {
        return Some("This password is too short. It must contain at least 8 characters.".to_string());
    }
    None
}

/// Validate an email: empty is OK, otherwise must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() > 254 {
        return Some("Ensure this field has no more than 254 characters.".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Enter a valid email address.".to_string());
    }
    None
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some("This field may not be blank.".to_string());
    }
    if trimmed.len() > max_len {
        return Some(format!("Ensure this field has no more than {max_len} characters."));
    }
    None
}

/// Validate an optional text field with a max length (blank is OK).
pub fn validate_optional(value: &str, max_len: usize) -> Option<String> {
    if value.len() > max_len {
        return Some(format!("Ensure this field has no more than {max_len} characters."));
    }
    None
}

/// Validate a value against a closed choice set.
pub fn validate_choice(value: &str, choices: &[&str]) -> Option<String> {
    if choices.contains(&value) {
        None
    } else {
        Some(format!("\"{value}\" is not a valid choice."))
    }
}
