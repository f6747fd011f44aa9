//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("El ID de usuario no puede estar vacío")]
    EmptyId,

    #[error("El ID de usuario supera el máximo de {0} caracteres")]
    IdTooLong(usize),

    #[error("El ID de usuario contiene un carácter inválido: '{0}'")]
    InvalidIdCharacter(char),

    #[error("El campo '{0}' es obligatorio")]
    MissingField(&'static str),

    #[error("El email '{0}' no es válido")]
    InvalidEmail(String),
}

const MAX_USER_ID_LENGTH: usize = 64;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only alphanumeric characters, hyphens and underscores
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    for c in id.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
            return Err(UserValidationError::InvalidIdCharacter(c));
        }
    }

    Ok(())
}

/// Validate that a required field is present and not blank
pub fn validate_required(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::MissingField(field));
    }

    Ok(())
}

/// Validate an email address
///
/// Only the shape is checked: a non-empty local part, an `@`, and a non-empty domain.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    validate_required("email", email)?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(UserValidationError::InvalidEmail(email.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_user_ids() {
        assert!(validate_user_id("u1").is_ok());
        assert!(validate_user_id("5f1d7c2e-9a0b-4c1d-8e2f-3a4b5c6d7e8f").is_ok());
        assert!(validate_user_id("legacy_id").is_ok());
    }

    #[test]
    fn test_invalid_user_ids() {
        assert_eq!(validate_user_id(""), Err(UserValidationError::EmptyId));
        assert_eq!(
            validate_user_id(&"a".repeat(65)),
            Err(UserValidationError::IdTooLong(64))
        );
        assert_eq!(
            validate_user_id("u 1"),
            Err(UserValidationError::InvalidIdCharacter(' '))
        );
        assert_eq!(
            validate_user_id("../etc"),
            Err(UserValidationError::InvalidIdCharacter('.'))
        );
    }

    #[test]
    fn test_required_fields() {
        assert!(validate_required("nombre", "Alice").is_ok());
        assert_eq!(
            validate_required("nombre", "   "),
            Err(UserValidationError::MissingField("nombre"))
        );
    }

    #[test]
    fn test_messages_name_the_field() {
        let err = validate_required("username", "").unwrap_err();
        assert_eq!(err.to_string(), "El campo 'username' es obligatorio");
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }
}
