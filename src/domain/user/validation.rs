//! User validation

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Username cannot exceed {0} characters")]
    UsernameTooLong(usize),

    #[error("Username can only contain lowercase letters, digits, '.', '_' and '-'")]
    InvalidUsernameCharacters,

    #[error("Username must start and end with a letter or digit")]
    InvalidUsernameFormat,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
}

const MAX_USERNAME_LENGTH: usize = 255;
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate a username
///
/// The username is the first field of the token auth header, so it can never
/// contain the `:` delimiter.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
    {
        return Err(UserValidationError::InvalidUsernameCharacters);
    }

    let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !edge_ok(username.chars().next()) || !edge_ok(username.chars().last()) {
        return Err(UserValidationError::InvalidUsernameFormat);
    }

    Ok(())
}

/// Validate a password for interactive login
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("ci.bot-01").is_ok());
        assert!(validate_username("a").is_ok());
    }

    #[test]
    fn test_empty_username() {
        assert_eq!(validate_username(""), Err(UserValidationError::EmptyUsername));
    }

    #[test]
    fn test_username_with_delimiter() {
        assert_eq!(
            validate_username("alice:admin"),
            Err(UserValidationError::InvalidUsernameCharacters)
        );
        assert_eq!(
            validate_username("Alice"),
            Err(UserValidationError::InvalidUsernameCharacters)
        );
    }

    #[test]
    fn test_username_format() {
        assert_eq!(
            validate_username("-alice"),
            Err(UserValidationError::InvalidUsernameFormat)
        );
        assert_eq!(
            validate_username("alice."),
            Err(UserValidationError::InvalidUsernameFormat)
        );
    }

    #[test]
    fn test_username_too_long() {
        assert_eq!(
            validate_username(&"a".repeat(256)),
            Err(UserValidationError::UsernameTooLong(255))
        );
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345678").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(UserValidationError::PasswordTooShort(8))
        );
    }
}
