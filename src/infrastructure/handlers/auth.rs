//! Authentication handlers: login and "who am I"

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{
    DomainError, Outcome, RequestHandler, UserRepository, INVALID_CREDENTIALS, USER_NOT_FOUND,
};
use crate::infrastructure::auth::TokenIssuer;
use crate::infrastructure::user::{verify_blocking, PasswordHasher};

use super::requests::{GetMe, Login};
use super::views::{AuthenticationOutcome, UserView};

/// Verifies credentials and issues a token.
///
/// An unknown email and a wrong password produce the same failure.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

#[async_trait]
impl RequestHandler<Login> for LoginHandler {
    async fn handle(
        &self,
        request: Login,
        cancel: &CancellationToken,
    ) -> Result<Outcome<AuthenticationOutcome>, DomainError> {
        info!(email = %request.email, "Login attempt");

        let Some(user) = self.users.get_by_email(&request.email, cancel).await? else {
            warn!(email = %request.email, "Login failed");
            return Ok(Outcome::failure(INVALID_CREDENTIALS));
        };

        let verified = verify_blocking(
            self.hasher.clone(),
            request.password,
            user.password_hash().to_string(),
        )
        .await?;

        if !verified {
            warn!(email = %request.email, "Login failed");
            return Ok(Outcome::failure(INVALID_CREDENTIALS));
        }

        let token = self.tokens.generate(user.id(), user.email(), user.role())?;

        info!(user_id = %user.id(), "Login succeeded");

        Ok(Outcome::success(AuthenticationOutcome {
            token,
            user_id: *user.id(),
            email: user.email().to_string(),
            display_name: user.display_name().to_string(),
            role: user.role().label().to_string(),
        }))
    }
}

pub struct GetMeHandler {
    users: Arc<dyn UserRepository>,
}

impl GetMeHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetMe> for GetMeHandler {
    async fn handle(
        &self,
        request: GetMe,
        cancel: &CancellationToken,
    ) -> Result<Outcome<UserView>, DomainError> {
        match self.users.get_by_id(&request.user_id, cancel).await? {
            Some(user) => Ok(Outcome::success(UserView::from(&user))),
            None => {
                warn!(user_id = %request.user_id, "Current user not found");
                Ok(Outcome::failure(USER_NOT_FOUND))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::domain::{User, UserId, UserRole};
    use crate::infrastructure::auth::{JwtTokenIssuer, TokenConfig};
    use crate::infrastructure::storage::InMemoryStore;
    use crate::infrastructure::user::Argon2Hasher;

    fn issuer() -> Arc<JwtTokenIssuer> {
        Arc::new(
            JwtTokenIssuer::new(TokenConfig::new(
                "login-test-secret-long-enough-for-hs256",
                "feedback-core",
                "feedback-clients",
            ))
            .unwrap(),
        )
    }

    fn seeded_user(email: &str, password: &str, role: UserRole) -> User {
        let hash = Argon2Hasher::new().hash(password).unwrap();
        User::new(UserId::generate(), email, hash, "Seeded User", role)
    }

    fn create_handler(users: Vec<User>) -> (LoginHandler, Arc<JwtTokenIssuer>) {
        let store = Arc::new(InMemoryStore::with_data(users, Vec::new()));
        let tokens = issuer();
        let handler = LoginHandler::new(store, Arc::new(Argon2Hasher::new()), tokens.clone());
        (handler, tokens)
    }

    #[tokio::test]
    async fn test_login_success_claims_match_user() {
        let user = seeded_user("admin@example.com", "Admin1234", UserRole::Admin);
        let (handler, tokens) = create_handler(vec![user.clone()]);

        let outcome = handler
            .handle(
                Login::new("admin@example.com", "Admin1234"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let auth = outcome.value().expect("login should succeed");
        assert_eq!(auth.user_id, *user.id());
        assert_eq!(auth.email, "admin@example.com");
        assert_eq!(auth.display_name, "Seeded User");
        assert_eq!(auth.role, "Admin");

        let claims = tokens.verify(&auth.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), *user.id());
        assert_eq!(claims.email, user.email());
        assert_eq!(claims.role, "Admin");
    }

    #[tokio::test]
    async fn test_login_unknown_user_and_wrong_password_look_identical() {
        let user = seeded_user("admin@example.com", "Admin1234", UserRole::Admin);
        let (handler, _) = create_handler(vec![user]);
        let cancel = CancellationToken::new();

        let unknown = handler
            .handle(Login::new("nobody@example.com", "Admin1234"), &cancel)
            .await
            .unwrap();
        let wrong = handler
            .handle(Login::new("admin@example.com", "wrong"), &cancel)
            .await
            .unwrap();

        assert_eq!(unknown, Outcome::Failure("Invalid credentials".to_string()));
        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn test_login_email_is_case_insensitive() {
        let user = seeded_user("member@example.com", "Member1234", UserRole::Member);
        let (handler, _) = create_handler(vec![user]);

        let outcome = handler
            .handle(
                Login::new("Member@Example.COM", "Member1234"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_login_corrupt_hash_is_invalid_credentials() {
        let user = User::new(
            UserId::generate(),
            "broken@example.com",
            "not-a-phc-string",
            "Broken",
            UserRole::Member,
        );
        let (handler, _) = create_handler(vec![user]);

        let outcome = handler
            .handle(
                Login::new("broken@example.com", "anything"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.message(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_repository_fault_propagates() {
        let mut users = MockUserRepository::new();
        users
            .expect_get_by_email()
            .times(1)
            .returning(|_, _| Err(DomainError::storage("connection refused")));

        let handler = LoginHandler::new(Arc::new(users), Arc::new(Argon2Hasher::new()), issuer());

        let result = handler
            .handle(
                Login::new("admin@example.com", "Admin1234"),
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_get_me() {
        let user = seeded_user("me@example.com", "Password1", UserRole::Manager);
        let store = Arc::new(InMemoryStore::with_data(vec![user.clone()], Vec::new()));
        let handler = GetMeHandler::new(store);
        let cancel = CancellationToken::new();

        let found = handler
            .handle(GetMe { user_id: *user.id() }, &cancel)
            .await
            .unwrap();
        assert_eq!(found, Outcome::Success(UserView::from(&user)));

        let missing = handler
            .handle(
                GetMe {
                    user_id: UserId::generate(),
                },
                &cancel,
            )
            .await
            .unwrap();
        assert_eq!(missing, Outcome::Failure("User not found".to_string()));
    }
}
