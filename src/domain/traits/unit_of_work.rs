use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{DomainError, TeamRepository, UserRepository};

#[cfg(test)]
use mockall::automock;

/// Commits mutations staged through the repository ports of one scope.
///
/// A failed commit is an infrastructure fault; callers do not retry it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Apply pending changes, returning how many were written
    async fn save_changes(&self, cancel: &CancellationToken) -> Result<usize, DomainError>;
}

/// Repositories and commit handle sharing one private set of staged writes.
///
/// Writes made through `users` or `teams` are only applied by
/// `unit_of_work.save_changes`. Dropping the scope without committing
/// discards them. Reads see committed state.
#[derive(Clone)]
pub struct WorkScope {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub unit_of_work: Arc<dyn UnitOfWork>,
}

/// Opens an isolated [`WorkScope`] per unit of work
#[cfg_attr(test, automock)]
pub trait UnitOfWorkFactory: Send + Sync {
    fn begin(&self) -> WorkScope;
}
