//! Team validation utilities

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Invalid team ID: '{0}'")]
    InvalidId(String),

    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team name exceeds maximum length of {0} characters")]
    NameTooLong(usize),
}

const MAX_TEAM_NAME_LENGTH: usize = 100;

/// Validate a team name
///
/// Rules:
/// - Cannot be empty or whitespace
/// - Maximum 100 characters
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.chars().count() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}
