//! Rules for the one-time platform bootstrap and for user fields.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Conflict message when the default context already exists.
pub const SETUP_ALREADY_DONE: &str = "Sistema já configurado";

/// Conflict message for a duplicate user email.
pub const USER_EMAIL_CONFLICT: &str = "Já existe um usuário com esse email";

/// Name given to the default context when the request omits one.
pub const DEFAULT_CONTEXT_NAME: &str = "Padrão";

/// Lowercase and trim an email, then check its shape.
pub fn normalize_email(email: &str) -> Result<String, CoreError> {
    let normalized = email.trim().to_lowercase();
    if !normalized.validate_email() {
        return Err(CoreError::Validation(format!("Invalid email '{}'", email.trim())));
    }
    Ok(normalized)
}

/// Check that a person or context name is not blank.
pub fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(
            normalize_email("  Admin@Example.COM ").unwrap(),
            "admin@example.com"
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("").is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate_name("name", "  ").is_err());
        assert!(validate_name("name", "Ana").is_ok());
    }
}
