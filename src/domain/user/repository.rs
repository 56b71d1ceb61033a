//! User repository port

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::entity::{User, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Data access for users.
///
/// A miss is `Ok(None)`; `Err` is reserved for infrastructure faults.
/// Obtained from a [`WorkScope`](crate::domain::WorkScope), mutations are staged until
/// [`UnitOfWork::save_changes`](crate::domain::UnitOfWork).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(
        &self,
        id: &UserId,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, DomainError>;

    /// Lookup is case-insensitive
    async fn get_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, DomainError>;

    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<User>, DomainError>;

    async fn add(&self, user: User, cancel: &CancellationToken) -> Result<(), DomainError>;

    async fn update(&self, user: User, cancel: &CancellationToken) -> Result<(), DomainError>;

    async fn delete(&self, user: &User, cancel: &CancellationToken) -> Result<(), DomainError>;
}
