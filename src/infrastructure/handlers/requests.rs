//! Commands and queries understood by the dispatcher

use crate::domain::{Request, TeamId, UserId, UserRole};

use super::views::{AuthenticationOutcome, TeamView, UserView};

/// Exchange credentials for a signed token
#[derive(Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl Login {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login")
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .finish()
    }
}

impl Request for Login {
    type Response = AuthenticationOutcome;
    const NAME: &'static str = "Login";
}

/// The caller's own profile, identified from their token
#[derive(Debug, Clone, Copy)]
pub struct GetMe {
    pub user_id: UserId,
}

impl Request for GetMe {
    type Response = UserView;
    const NAME: &'static str = "GetMe";
}

#[derive(Clone)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: UserRole,
    pub team_id: Option<TeamId>,
}

impl std::fmt::Debug for RegisterUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUser")
            .field("email", &self.email)
            .field("password", &"[hidden]")
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .field("team_id", &self.team_id)
            .finish()
    }
}

impl Request for RegisterUser {
    type Response = UserView;
    const NAME: &'static str = "RegisterUser";
}

#[derive(Debug, Clone, Copy)]
pub struct GetUser {
    pub id: UserId,
}

impl Request for GetUser {
    type Response = UserView;
    const NAME: &'static str = "GetUser";
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetAllUsers;

impl Request for GetAllUsers {
    type Response = Vec<UserView>;
    const NAME: &'static str = "GetAllUsers";
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteUser {
    pub id: UserId,
}

impl Request for DeleteUser {
    type Response = bool;
    const NAME: &'static str = "DeleteUser";
}

#[derive(Debug, Clone, Copy)]
pub struct GetTeam {
    pub id: TeamId,
}

impl Request for GetTeam {
    type Response = TeamView;
    const NAME: &'static str = "GetTeam";
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetAllTeams;

impl Request for GetAllTeams {
    type Response = Vec<TeamView>;
    const NAME: &'static str = "GetAllTeams";
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteTeam {
    pub id: TeamId,
}

impl Request for DeleteTeam {
    type Response = bool;
    const NAME: &'static str = "DeleteTeam";
}
