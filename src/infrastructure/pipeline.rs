//! Registration table binding every request to its handler and validators

use std::sync::Arc;

use crate::domain::{Dispatcher, DomainError, TeamRepository, UnitOfWorkFactory, UserRepository};
use crate::infrastructure::auth::TokenIssuer;
use crate::infrastructure::handlers::{
    validate_delete_team, validate_delete_user, validate_get_me, validate_get_team,
    validate_get_user, validate_login, validate_register_user, DeleteTeam, DeleteTeamHandler,
    DeleteUser, DeleteUserHandler, GetAllTeams, GetAllTeamsHandler, GetAllUsers,
    GetAllUsersHandler, GetMe, GetMeHandler, GetTeam, GetTeamHandler, GetUser, GetUserHandler,
    Login, LoginHandler, RegisterUser, RegisterUserHandler,
};
use crate::infrastructure::user::PasswordHasher;

/// Ports shared by the handlers.
///
/// Queries read through `users` and `teams`. Commands open their own scope
/// from `scopes` per request.
#[derive(Clone)]
pub struct HandlerDependencies {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub scopes: Arc<dyn UnitOfWorkFactory>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
}

/// Assemble the dispatcher with every known request type
pub fn build_dispatcher(deps: &HandlerDependencies) -> Result<Dispatcher, DomainError> {
    Dispatcher::builder()
        .handler::<Login, _>(LoginHandler::new(
            deps.users.clone(),
            deps.hasher.clone(),
            deps.tokens.clone(),
        ))
        .validator::<Login, _>(validate_login)
        .handler::<GetMe, _>(GetMeHandler::new(deps.users.clone()))
        .validator::<GetMe, _>(validate_get_me)
        .handler::<RegisterUser, _>(RegisterUserHandler::new(
            deps.scopes.clone(),
            deps.hasher.clone(),
        ))
        .validator::<RegisterUser, _>(validate_register_user)
        .handler::<GetUser, _>(GetUserHandler::new(deps.users.clone()))
        .validator::<GetUser, _>(validate_get_user)
        .handler::<GetAllUsers, _>(GetAllUsersHandler::new(deps.users.clone()))
        .handler::<DeleteUser, _>(DeleteUserHandler::new(deps.scopes.clone()))
        .validator::<DeleteUser, _>(validate_delete_user)
        .handler::<GetTeam, _>(GetTeamHandler::new(deps.teams.clone()))
        .validator::<GetTeam, _>(validate_get_team)
        .handler::<GetAllTeams, _>(GetAllTeamsHandler::new(deps.teams.clone()))
        .handler::<DeleteTeam, _>(DeleteTeamHandler::new(deps.scopes.clone()))
        .validator::<DeleteTeam, _>(validate_delete_team)
        .build()
}
