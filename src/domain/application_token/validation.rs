//! Application token validation

use thiserror::Error;

/// Errors that can occur during application token validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationTokenValidationError {
    #[error("Application cannot be blank")]
    EmptyApplication,

    #[error("Application cannot exceed {0} characters")]
    ApplicationTooLong(usize),

    #[error("Application cannot contain ':'")]
    ApplicationContainsDelimiter,

    #[error("Token secret cannot be empty")]
    EmptySecret,

    #[error("Token secret cannot contain ':'")]
    SecretContainsDelimiter,

    #[error("Token secret cannot start or end with whitespace")]
    SecretPadded,
}

impl ApplicationTokenValidationError {
    /// Input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptySecret | Self::SecretContainsDelimiter | Self::SecretPadded => "secret",
            _ => "application",
        }
    }
}

const MAX_APPLICATION_LENGTH: usize = 255;

/// Validate an application label
///
/// Labels travel in the colon-delimited auth header, so `:` is rejected.
pub fn validate_application(application: &str) -> Result<(), ApplicationTokenValidationError> {
    if application.trim().is_empty() {
        return Err(ApplicationTokenValidationError::EmptyApplication);
    }

    if application.chars().count() > MAX_APPLICATION_LENGTH {
        return Err(ApplicationTokenValidationError::ApplicationTooLong(
            MAX_APPLICATION_LENGTH,
        ));
    }

    if application.contains(':') {
        return Err(ApplicationTokenValidationError::ApplicationContainsDelimiter);
    }

    Ok(())
}

/// Validate a caller-supplied cleartext secret
///
/// Header values are trimmed before parsing, so padded secrets could never
/// authenticate.
pub fn validate_secret(secret: &str) -> Result<(), ApplicationTokenValidationError> {
    if secret.is_empty() {
        return Err(ApplicationTokenValidationError::EmptySecret);
    }

    if secret.contains(':') {
        return Err(ApplicationTokenValidationError::SecretContainsDelimiter);
    }

    if secret.trim() != secret {
        return Err(ApplicationTokenValidationError::SecretPadded);
    }

    Ok(())
}
