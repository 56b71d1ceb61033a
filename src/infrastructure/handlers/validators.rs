//! Field checks run by the validation stage before any handler

use crate::domain::user::{validate_display_name, validate_email, validate_password};
use crate::domain::ValidationViolation;

use super::requests::{DeleteTeam, DeleteUser, GetMe, GetTeam, GetUser, Login, RegisterUser};

fn check<E: std::fmt::Display>(
    violations: &mut Vec<ValidationViolation>,
    field: &str,
    result: Result<(), E>,
) {
    if let Err(e) = result {
        violations.push(ValidationViolation::new(field, e.to_string()));
    }
}

fn require_id(field: &str, is_nil: bool, label: &str) -> Vec<ValidationViolation> {
    if is_nil {
        vec![ValidationViolation::new(
            field,
            format!("{} id is required", label),
        )]
    } else {
        Vec::new()
    }
}

/// Login only checks shape; whether the password is right is the handler's call.
pub fn validate_login(request: &Login) -> Vec<ValidationViolation> {
    let mut violations = Vec::new();

    check(&mut violations, "email", validate_email(&request.email));

    if request.password.is_empty() {
        violations.push(ValidationViolation::new("password", "Password is required"));
    }

    violations
}

pub fn validate_register_user(request: &RegisterUser) -> Vec<ValidationViolation> {
    let mut violations = Vec::new();

    check(&mut violations, "email", validate_email(&request.email));
    check(&mut violations, "password", validate_password(&request.password));
    check(
        &mut violations,
        "display_name",
        validate_display_name(&request.display_name),
    );

    if request.team_id.is_some_and(|id| id.is_nil()) {
        violations.push(ValidationViolation::new("team_id", "Team id must not be nil"));
    }

    violations
}

pub fn validate_get_me(request: &GetMe) -> Vec<ValidationViolation> {
    require_id("user_id", request.user_id.is_nil(), "User")
}

pub fn validate_get_user(request: &GetUser) -> Vec<ValidationViolation> {
    require_id("id", request.id.is_nil(), "User")
}

pub fn validate_delete_user(request: &DeleteUser) -> Vec<ValidationViolation> {
    require_id("id", request.id.is_nil(), "User")
}

pub fn validate_get_team(request: &GetTeam) -> Vec<ValidationViolation> {
    require_id("id", request.id.is_nil(), "Team")
}

pub fn validate_delete_team(request: &DeleteTeam) -> Vec<ValidationViolation> {
    require_id("id", request.id.is_nil(), "Team")
}
