//! Team repository port

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::entity::{Team, TeamId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Data access for teams. Same miss/fault conventions as the user port.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn get_by_id(
        &self,
        id: &TeamId,
        cancel: &CancellationToken,
    ) -> Result<Option<Team>, DomainError>;

    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Team>, DomainError>;

    async fn add(&self, team: Team, cancel: &CancellationToken) -> Result<(), DomainError>;

    async fn update(&self, team: Team, cancel: &CancellationToken) -> Result<(), DomainError>;

    async fn delete(&self, team: &Team, cancel: &CancellationToken) -> Result<(), DomainError>;
}
