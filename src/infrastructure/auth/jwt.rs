//! JWT token issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::{DomainError, UserId, UserRole};

const MIN_SECRET_BYTES: usize = 32;
const MIN_EXPIRY_DAYS: u32 = 1;
const MAX_EXPIRY_DAYS: u32 = 365;
const DEFAULT_EXPIRY_DAYS: u32 = 7;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Role label, e.g. "Admin"
    pub role: String,
    pub iss: String,
    pub aud: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl TokenClaims {
    /// Parse the subject back into a user ID
    pub fn user_id(&self) -> Result<UserId, DomainError> {
        self.sub
            .parse()
            .map_err(|_| DomainError::token(format!("Invalid subject claim: '{}'", self.sub)))
    }

    pub fn role(&self) -> Result<UserRole, DomainError> {
        self.role
            .parse()
            .map_err(|_| DomainError::token(format!("Invalid role claim: '{}'", self.role)))
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signing configuration, fixed for the lifetime of the process
#[derive(Clone, Deserialize)]
pub struct TokenConfig {
    /// HMAC secret, at least 32 bytes
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Token lifetime in days (1-365)
    #[serde(default = "default_expiry_days")]
    pub expiry_days: u32,
}

fn default_expiry_days() -> u32 {
    DEFAULT_EXPIRY_DAYS
}

impl Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[hidden]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiry_days", &self.expiry_days)
            .finish()
    }
}

impl TokenConfig {
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            expiry_days: DEFAULT_EXPIRY_DAYS,
        }
    }

    pub fn with_expiry_days(mut self, expiry_days: u32) -> Self {
        self.expiry_days = expiry_days;
        self
    }

    /// Reject configurations that must not reach a running process
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.secret.len() < MIN_SECRET_BYTES {
            return Err(DomainError::configuration(format!(
                "Token secret must be at least {} bytes",
                MIN_SECRET_BYTES
            )));
        }

        if self.issuer.trim().is_empty() {
            return Err(DomainError::configuration("Token issuer is required"));
        }

        if self.audience.trim().is_empty() {
            return Err(DomainError::configuration("Token audience is required"));
        }

        if !(MIN_EXPIRY_DAYS..=MAX_EXPIRY_DAYS).contains(&self.expiry_days) {
            return Err(DomainError::configuration(format!(
                "Token expiry must be between {} and {} days, got {}",
                MIN_EXPIRY_DAYS, MAX_EXPIRY_DAYS, self.expiry_days
            )));
        }

        Ok(())
    }
}

/// Issues and verifies signed tokens
pub trait TokenIssuer: Send + Sync + Debug {
    /// Issue a token for the given identity
    fn generate(&self, user_id: &UserId, email: &str, role: UserRole)
        -> Result<String, DomainError>;

    /// Check signature, issuer, audience and expiry, returning the claims
    fn verify(&self, token: &str) -> Result<TokenClaims, DomainError>;

    fn expiry_days(&self) -> u32;
}

/// HS256 token issuer
#[derive(Clone)]
pub struct JwtTokenIssuer {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtTokenIssuer {
    /// Build an issuer, failing if the configuration is unusable
    pub fn new(config: TokenConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }

    fn claims_for(&self, user_id: &UserId, email: &str, role: UserRole) -> TokenClaims {
        let now = Utc::now();
        let exp = now + Duration::days(i64::from(self.config.expiry_days));

        TokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.label().to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn generate(
        &self,
        user_id: &UserId,
        email: &str,
        role: UserRole,
    ) -> Result<String, DomainError> {
        let claims = self.claims_for(user_id, email, role);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::token(format!("Failed to generate JWT: {}", e)))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = 0;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::token(format!("Invalid JWT: {}", e)))?;

        Ok(token_data.claims)
    }

    fn expiry_days(&self) -> u32 {
        self.config.expiry_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough-1234";

    fn test_config() -> TokenConfig {
        TokenConfig::new(SECRET, "feedback-core", "feedback-clients")
    }

    fn create_issuer() -> JwtTokenIssuer {
        JwtTokenIssuer::new(test_config()).unwrap()
    }

    #[test]
    fn test_generate_and_verify() {
        let issuer = create_issuer();
        let user_id = UserId::generate();

        let token = issuer
            .generate(&user_id, "admin@example.com", UserRole::Admin)
            .unwrap();
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, "Admin");
        assert_eq!(claims.role().unwrap(), UserRole::Admin);
        assert_eq!(claims.iss, "feedback-core");
        assert_eq!(claims.aud, "feedback-clients");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expiry_matches_config() {
        let issuer = JwtTokenIssuer::new(test_config().with_expiry_days(30)).unwrap();

        let token = issuer
            .generate(&UserId::generate(), "a@example.com", UserRole::Member)
            .unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
        assert_eq!(issuer.expiry_days(), 30);
    }

    #[test]
    fn test_invalid_token() {
        let issuer = create_issuer();

        let result = issuer.verify("invalid-token");
        assert!(matches!(result, Err(DomainError::Token { .. })));
    }

    #[test]
    fn test_wrong_secret() {
        let issuer1 = create_issuer();
        let issuer2 = JwtTokenIssuer::new(TokenConfig::new(
            "another-secret-key-that-is-long-enough-99",
            "feedback-core",
            "feedback-clients",
        ))
        .unwrap();

        let token = issuer1
            .generate(&UserId::generate(), "a@example.com", UserRole::Member)
            .unwrap();

        assert!(issuer2.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let other = JwtTokenIssuer::new(TokenConfig::new(SECRET, "someone-else", "feedback-clients"))
            .unwrap();

        let token = other
            .generate(&UserId::generate(), "a@example.com", UserRole::Member)
            .unwrap();

        assert!(create_issuer().verify(&token).is_err());
    }

    #[test]
    fn test_wrong_audience() {
        let other = JwtTokenIssuer::new(TokenConfig::new(SECRET, "feedback-core", "other-clients"))
            .unwrap();

        let token = other
            .generate(&UserId::generate(), "a@example.com", UserRole::Member)
            .unwrap();

        assert!(create_issuer().verify(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let issuer = create_issuer();

        let past_time = Utc::now() - Duration::days(1);
        let claims = TokenClaims {
            sub: UserId::generate().to_string(),
            email: "a@example.com".to_string(),
            role: "Member".to_string(),
            iss: "feedback-core".to_string(),
            aud: "feedback-clients".to_string(),
            iat: (past_time - Duration::days(7)).timestamp(),
            exp: past_time.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(claims.is_expired());
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = JwtTokenIssuer::new(TokenConfig::new("too-short", "iss", "aud"));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_empty_issuer_and_audience_rejected() {
        assert!(TokenConfig::new(SECRET, "", "aud").validate().is_err());
        assert!(TokenConfig::new(SECRET, "iss", "  ").validate().is_err());
    }

    #[test]
    fn test_expiry_bounds() {
        assert!(test_config().with_expiry_days(0).validate().is_err());
        assert!(test_config().with_expiry_days(1).validate().is_ok());
        assert!(test_config().with_expiry_days(365).validate().is_ok());
        assert!(test_config().with_expiry_days(366).validate().is_err());
        assert_eq!(test_config().expiry_days, 7);
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", create_issuer());
        assert!(!debug.contains(SECRET));
    }
}
