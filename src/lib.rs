//! Feedback Core
//!
//! Request pipeline for the feedback-management backend:
//! - Commands and queries routed to exactly one handler
//! - Validation before any handler runs
//! - Password hashing and signed token issuance
//! - Repository ports with an in-memory adapter

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::Dispatcher;
use infrastructure::{
    auth::{JwtTokenIssuer, TokenIssuer},
    pipeline::{build_dispatcher, HandlerDependencies},
    seed::seed_admin,
    storage::InMemoryStore,
    user::Argon2Hasher,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Everything a caller needs to drive the pipeline
#[derive(Debug, Clone)]
pub struct App {
    pub dispatcher: Dispatcher,
    pub tokens: Arc<dyn TokenIssuer>,
    pub store: Arc<InMemoryStore>,
}

/// Wire the dispatcher against a fresh in-memory store and seed the admin
pub async fn create_app_with_config(
    config: &AppConfig,
    cancel: &CancellationToken,
) -> anyhow::Result<App> {
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(config.auth.clone())?);
    let store = Arc::new(InMemoryStore::new());
    let hasher = Arc::new(Argon2Hasher::new());

    let deps = HandlerDependencies {
        users: store.clone(),
        teams: store.clone(),
        scopes: store.clone(),
        hasher: hasher.clone(),
        tokens: tokens.clone(),
    };
    let dispatcher = build_dispatcher(&deps)?;

    seed_admin(store.as_ref(), hasher, &config.seed, cancel).await?;

    info!(
        issuer = %config.auth.issuer,
        expiry_days = tokens.expiry_days(),
        "Application wired"
    );

    Ok(App {
        dispatcher,
        tokens,
        store,
    })
}
