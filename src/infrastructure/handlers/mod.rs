//! Request types, their handlers and validators

mod auth;
mod requests;
mod teams;
mod users;
mod validators;
mod views;

pub use auth::{GetMeHandler, LoginHandler};
pub use requests::{
    DeleteTeam, DeleteUser, GetAllTeams, GetAllUsers, GetMe, GetTeam, GetUser, Login,
    RegisterUser,
};
pub use teams::{DeleteTeamHandler, GetAllTeamsHandler, GetTeamHandler};
pub use users::{DeleteUserHandler, GetAllUsersHandler, GetUserHandler, RegisterUserHandler};
pub use validators::{
    validate_delete_team, validate_delete_user, validate_get_me, validate_get_team,
    validate_get_user, validate_login, validate_register_user,
};
pub use views::{AuthenticationOutcome, TeamView, UserView};
