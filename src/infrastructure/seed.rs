//! Startup seeding of the administrator account

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::config::SeedConfig;
use crate::domain::pipeline::join_violations;
use crate::domain::user::normalize_email;
use crate::domain::{DomainError, UnitOfWorkFactory, User, UserId, UserRole};
use crate::infrastructure::handlers::{validate_register_user, RegisterUser};
use crate::infrastructure::user::{hash_blocking, PasswordHasher};

/// Stable id for a seeded account, so tokens stay valid across restarts
pub fn seeded_user_id(email: &str) -> UserId {
    let email = normalize_email(email);
    UserId::from_uuid(Uuid::new_v5(&Uuid::NAMESPACE_URL, email.as_bytes()))
}

/// Ensure the configured admin exists.
///
/// Returns the id of the newly created user, or `None` when the email is
/// already taken. Settings that would fail registration are a configuration
/// error.
pub async fn seed_admin(
    scopes: &dyn UnitOfWorkFactory,
    hasher: Arc<dyn PasswordHasher>,
    seed: &SeedConfig,
    cancel: &CancellationToken,
) -> Result<Option<UserId>, DomainError> {
    let scope = scopes.begin();

    if scope.users.get_by_email(&seed.admin_email, cancel).await?.is_some() {
        info!(email = %seed.admin_email, "Admin user already present");
        return Ok(None);
    }

    let request = RegisterUser {
        email: seed.admin_email.clone(),
        password: seed.admin_password.clone(),
        display_name: seed.admin_name.clone(),
        role: UserRole::Admin,
        team_id: None,
    };

    let violations = validate_register_user(&request);
    if !violations.is_empty() {
        return Err(DomainError::configuration(format!(
            "Cannot seed admin user: {}",
            join_violations(&violations)
        )));
    }

    let id = seeded_user_id(&request.email);
    let password_hash = hash_blocking(hasher, request.password).await?;
    let admin = User::new(
        id,
        &request.email,
        password_hash,
        request.display_name.trim(),
        request.role,
    );

    scope.users.add(admin, cancel).await?;
    scope.unit_of_work.save_changes(cancel).await?;

    info!(user_id = %id, email = %seed.admin_email, "Admin user seeded");

    Ok(Some(id))
}
