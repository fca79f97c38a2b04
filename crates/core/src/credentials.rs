//! Sign-up and sign-in input rules.
//!
//! Emails are normalized (trimmed, lowercased) before they are stored or
//! looked up, so `Ada@Example.com ` and `ada@example.com` are one account.

/// Minimum display-name length in characters.
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum display-name length in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted email length (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Normalize an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an (already normalized) email address.
///
/// This is a structural check only: one `@`, a non-empty local part, and a
/// dotted domain without empty labels. Deliverability is proven by the
/// verification code, not by this function.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err("Invalid email address".to_string());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email address".to_string());
    };
    let domain_ok = domain.contains('.')
        && !domain.contains('@')
        && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

/// Validate a display name: trimmed length between the min and max.
pub fn validate_name(name: &str) -> Result<(), String> {
    let len = name.trim().chars().count();
    if len < MIN_NAME_LENGTH {
        return Err(format!(
            "Name must be at least {MIN_NAME_LENGTH} characters long"
        ));
    }
    if len > MAX_NAME_LENGTH {
        return Err(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters long"
        ));
    }
    Ok(())
}

/// Validate that a password meets the minimum length.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    Ok(())
}

/// Derive a display name from an email's local part.
///
/// Used when an account is created by a flow that never asks for a name
/// (email code sign-in). Falls back to `"Jotbook user"` when the local part
/// is too short to pass [`validate_name`].
pub fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default().trim();
    if local.chars().count() >= MIN_NAME_LENGTH {
        local.chars().take(MAX_NAME_LENGTH).collect()
    } else {
        "Jotbook user".to_string()
    }
}
