//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Team name cannot be blank")]
    EmptyName,

    #[error("Team name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Team description cannot exceed {0} characters")]
    DescriptionTooLong(usize),
}

impl TeamValidationError {
    /// Input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong(_) => "name",
            Self::DescriptionTooLong(_) => "description",
        }
    }
}

const MAX_TEAM_NAME_LENGTH: usize = 255;
const MAX_TEAM_DESCRIPTION_LENGTH: usize = 1024;

/// Validate a team name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.chars().count() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}

/// Validate an optional team description
pub fn validate_team_description(description: Option<&str>) -> Result<(), TeamValidationError> {
    match description {
        Some(d) if d.chars().count() > MAX_TEAM_DESCRIPTION_LENGTH => Err(
            TeamValidationError::DescriptionTooLong(MAX_TEAM_DESCRIPTION_LENGTH),
        ),
        _ => Ok(()),
    }
}
