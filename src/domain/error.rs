use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::auth::AuthenticationFailure;

/// Field name to message mapping returned with validation failures
pub type FieldErrors = BTreeMap<String, String>;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Application token '{application}' already exists for this user")]
    DuplicateApplication { application: String },

    #[error("Team name '{name}' has already been taken")]
    DuplicateName { name: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not owner: {message}")]
    NotOwner { message: String },

    #[error("Authentication failed: {0}")]
    Authentication(AuthenticationFailure),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Validation error bound to a single input field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.into(), message.clone());

        Self::Validation { message, fields }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn duplicate_application(application: impl Into<String>) -> Self {
        Self::DuplicateApplication {
            application: application.into(),
        }
    }

    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_owner(message: impl Into<String>) -> Self {
        Self::NotOwner {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Field errors attached to a validation failure, empty for other kinds
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            Self::Validation { fields, .. } => fields.clone(),
            Self::DuplicateName { name } => {
                let mut fields = FieldErrors::new();
                fields.insert("name".to_string(), format!("'{}' has already been taken", name));
                fields
            }
            Self::DuplicateApplication { application } => {
                let mut fields = FieldErrors::new();
                fields.insert(
                    "application".to_string(),
                    format!("'{}' has already been taken", application),
                );
                fields
            }
            _ => FieldErrors::new(),
        }
    }

    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Authentication(_) | Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } | Self::NotOwner { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Validation { .. }
            | Self::DuplicateApplication { .. }
            | Self::DuplicateName { .. } => 422,
            Self::Configuration { .. } | Self::Storage { .. } | Self::Internal { .. } => 500,
        }
    }

    /// Message safe to return to the caller
    ///
    /// Authentication failures collapse into one generic message so the
    /// response never reveals which part of the credential was wrong.
    pub fn public_message(&self) -> String {
        match self {
            Self::Authentication(failure) => failure.public_message().to_string(),
            Self::Storage { .. } | Self::Internal { .. } | Self::Configuration { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<AuthenticationFailure> for DomainError {
    fn from(failure: AuthenticationFailure) -> Self {
        Self::Authentication(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Team '7' not found");
        assert_eq!(error.to_string(), "Not found: Team '7' not found");
        assert_eq!(error.status_code(), 404);
    }

    #[test]
    fn test_invalid_field_error() {
        let error = DomainError::invalid_field("name", "can't be blank");
        assert_eq!(error.to_string(), "Validation error: can't be blank");
        assert_eq!(
            error.field_errors().get("name").map(String::as_str),
            Some("can't be blank")
        );
    }

    #[test]
    fn test_forbidden_and_not_found_are_distinct() {
        let forbidden = DomainError::forbidden("cannot view team");
        let missing = DomainError::not_found("no team");
        assert_ne!(forbidden.status_code(), missing.status_code());
    }

    #[test]
    fn test_authentication_failures_share_public_message() {
        let unknown_user: DomainError = AuthenticationFailure::UnknownUser.into();
        let bad_secret: DomainError = AuthenticationFailure::InvalidSecret.into();

        assert_eq!(unknown_user.public_message(), bad_secret.public_message());
        assert_eq!(unknown_user.status_code(), 401);
    }

    #[test]
    fn test_duplicate_name_field_errors() {
        let error = DomainError::duplicate_name("platform");
        assert!(error.field_errors().contains_key("name"));
        assert_eq!(error.status_code(), 422);
    }
}
