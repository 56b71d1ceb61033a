//! User query and command handlers

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{
    DomainError, Outcome, RequestHandler, UnitOfWorkFactory, User, UserId, UserRepository,
    EMAIL_IN_USE, TEAM_NOT_FOUND, USER_NOT_FOUND,
};
use crate::infrastructure::user::{hash_blocking, PasswordHasher};

use super::requests::{DeleteUser, GetAllUsers, GetUser, RegisterUser};
use super::views::UserView;

pub struct GetUserHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetUser> for GetUserHandler {
    async fn handle(
        &self,
        request: GetUser,
        cancel: &CancellationToken,
    ) -> Result<Outcome<UserView>, DomainError> {
        debug!(user_id = %request.id, "Fetching user");

        let outcome = match self.users.get_by_id(&request.id, cancel).await? {
            Some(user) => Outcome::success(user),
            None => Outcome::failure(USER_NOT_FOUND),
        };

        Ok(outcome.map(|user| UserView::from(&user)))
    }
}

/// Lists every user; never fails on an empty store
pub struct GetAllUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl GetAllUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetAllUsers> for GetAllUsersHandler {
    async fn handle(
        &self,
        _request: GetAllUsers,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Vec<UserView>>, DomainError> {
        let users = self.users.get_all(cancel).await?;
        debug!(count = users.len(), "Listed users");

        Ok(Outcome::success(users.iter().map(UserView::from).collect()))
    }
}

/// Deletes a user. Referential checks belong to the repository.
pub struct DeleteUserHandler {
    scopes: Arc<dyn UnitOfWorkFactory>,
}

impl DeleteUserHandler {
    pub fn new(scopes: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { scopes }
    }
}

#[async_trait]
impl RequestHandler<DeleteUser> for DeleteUserHandler {
    async fn handle(
        &self,
        request: DeleteUser,
        cancel: &CancellationToken,
    ) -> Result<Outcome<bool>, DomainError> {
        info!(user_id = %request.id, "Deleting user");

        let scope = self.scopes.begin();

        let Some(user) = scope.users.get_by_id(&request.id, cancel).await? else {
            warn!(user_id = %request.id, "User to delete not found");
            return Ok(Outcome::failure(USER_NOT_FOUND));
        };

        scope.users.delete(&user, cancel).await?;
        scope.unit_of_work.save_changes(cancel).await?;

        info!(user_id = %request.id, "User deleted");

        Ok(Outcome::success(true))
    }
}

/// Creates an account with a freshly hashed password
pub struct RegisterUserHandler {
    scopes: Arc<dyn UnitOfWorkFactory>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegisterUserHandler {
    pub fn new(scopes: Arc<dyn UnitOfWorkFactory>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { scopes, hasher }
    }
}

#[async_trait]
impl RequestHandler<RegisterUser> for RegisterUserHandler {
    async fn handle(
        &self,
        request: RegisterUser,
        cancel: &CancellationToken,
    ) -> Result<Outcome<UserView>, DomainError> {
        info!(email = %request.email, role = %request.role, "Registering user");

        let scope = self.scopes.begin();

        if scope.users.get_by_email(&request.email, cancel).await?.is_some() {
            warn!(email = %request.email, "Registration rejected: email in use");
            return Ok(Outcome::failure(EMAIL_IN_USE));
        }

        if let Some(team_id) = request.team_id {
            if scope.teams.get_by_id(&team_id, cancel).await?.is_none() {
                warn!(team_id = %team_id, "Registration rejected: team not found");
                return Ok(Outcome::failure(TEAM_NOT_FOUND));
            }
        }

        let password_hash = hash_blocking(self.hasher.clone(), request.password).await?;

        let mut user = User::new(
            UserId::generate(),
            &request.email,
            password_hash,
            request.display_name.trim(),
            request.role,
        );

        if let Some(team_id) = request.team_id {
            user = user.with_team(team_id);
        }

        let view = UserView::from(&user);

        scope.users.add(user, cancel).await?;
        scope.unit_of_work.save_changes(cancel).await?;

        info!(user_id = %view.id, "User registered");

        Ok(Outcome::success(view))
    }
}
