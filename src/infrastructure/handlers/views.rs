//! Read models returned by the handlers

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Team, TeamId, User, UserId};

/// Result of a successful login. The token is opaque to the rest of the system.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationOutcome {
    pub token: String,
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

impl std::fmt::Debug for AuthenticationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationOutcome")
            .field("token", &"[hidden]")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("role", &self.role)
            .finish()
    }
}

/// User projection safe to hand to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            email: user.email().to_string(),
            display_name: user.display_name().to_string(),
            role: user.role().label().to_string(),
            team_id: user.team_id().copied(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamView {
    pub id: TeamId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Team> for TeamView {
    fn from(team: &Team) -> Self {
        Self {
            id: *team.id(),
            name: team.name().to_string(),
            description: team.description().map(str::to_string),
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    #[test]
    fn test_user_view_projection() {
        let team_id = TeamId::generate();
        let user = User::new(
            UserId::generate(),
            "jane@example.com",
            "secret-hash",
            "Jane",
            UserRole::Manager,
        )
        .with_team(team_id);

        let view = UserView::from(&user);

        assert_eq!(view.id, *user.id());
        assert_eq!(view.email, "jane@example.com");
        assert_eq!(view.display_name, "Jane");
        assert_eq!(view.role, "Manager");
        assert_eq!(view.team_id, Some(team_id));
        assert_eq!(view.created_at, user.created_at());

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn test_team_view_projection() {
        let team = Team::new(TeamId::generate(), "Platform")
            .unwrap()
            .with_description("Core");

        let view = TeamView::from(&team);

        assert_eq!(view.id, *team.id());
        assert_eq!(view.name, "Platform");
        assert_eq!(view.description.as_deref(), Some("Core"));
    }

    #[test]
    fn test_authentication_outcome_debug_hides_token() {
        let outcome = AuthenticationOutcome {
            token: "eyJ.secret.token".to_string(),
            user_id: UserId::generate(),
            email: "a@example.com".to_string(),
            display_name: "A".to_string(),
            role: "Admin".to_string(),
        };

        assert!(!format!("{:?}", outcome).contains("eyJ.secret.token"));
    }
}
