//! In-memory implementation of the repository ports and unit of work
//!
//! Useful for testing and development. Data is lost when the process terminates.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::pipeline::ensure_not_cancelled;
use crate::domain::user::normalize_email;
use crate::domain::{
    DomainError, Team, TeamId, TeamRepository, UnitOfWork, UnitOfWorkFactory, User, UserId,
    UserRepository, WorkScope,
};

/// A mutation waiting for its transaction to commit
#[derive(Debug, Clone)]
enum PendingChange {
    AddUser(User),
    UpdateUser(User),
    DeleteUser(UserId),
    AddTeam(Team),
    UpdateTeam(Team),
    DeleteTeam(TeamId),
}

/// Committed state
#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    teams: HashMap<TeamId, Team>,
}

impl Tables {
    fn user(&self, id: &UserId) -> Option<User> {
        self.users.get(id).cloned()
    }

    fn user_by_email(&self, email: &str) -> Option<User> {
        let email = normalize_email(email);
        self.users.values().find(|u| u.email() == email).cloned()
    }

    fn all_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.email().cmp(b.email()))
        });
        users
    }

    fn team(&self, id: &TeamId) -> Option<Team> {
        self.teams.get(id).cloned()
    }

    fn all_teams(&self) -> Vec<Team> {
        let mut teams: Vec<Team> = self.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.name().cmp(b.name()));
        teams
    }

    fn apply(&mut self, change: PendingChange) -> Result<(), DomainError> {
        match change {
            PendingChange::AddUser(user) => {
                if self.users.contains_key(user.id()) {
                    return Err(DomainError::conflict(format!(
                        "User with ID '{}' already exists",
                        user.id()
                    )));
                }
                self.ensure_unique_email(&user)?;
                self.users.insert(*user.id(), user);
            }
            PendingChange::UpdateUser(user) => {
                if !self.users.contains_key(user.id()) {
                    return Err(DomainError::storage(format!(
                        "User '{}' does not exist",
                        user.id()
                    )));
                }
                self.ensure_unique_email(&user)?;
                self.users.insert(*user.id(), user);
            }
            PendingChange::DeleteUser(id) => {
                if self.users.remove(&id).is_none() {
                    return Err(DomainError::storage(format!("User '{}' does not exist", id)));
                }
            }
            PendingChange::AddTeam(team) => {
                if self.teams.contains_key(team.id()) {
                    return Err(DomainError::conflict(format!(
                        "Team with ID '{}' already exists",
                        team.id()
                    )));
                }
                self.teams.insert(*team.id(), team);
            }
            PendingChange::UpdateTeam(team) => {
                if !self.teams.contains_key(team.id()) {
                    return Err(DomainError::storage(format!(
                        "Team '{}' does not exist",
                        team.id()
                    )));
                }
                self.teams.insert(*team.id(), team);
            }
            PendingChange::DeleteTeam(id) => {
                if self.teams.remove(&id).is_none() {
                    return Err(DomainError::storage(format!("Team '{}' does not exist", id)));
                }
            }
        }

        Ok(())
    }

    fn ensure_unique_email(&self, user: &User) -> Result<(), DomainError> {
        let taken = self
            .users
            .values()
            .any(|u| u.email() == user.email() && u.id() != user.id());

        if taken {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                user.email()
            )));
        }

        Ok(())
    }
}

/// Apply a batch all-or-nothing
async fn commit(
    tables: &RwLock<Tables>,
    changes: Vec<PendingChange>,
) -> Result<usize, DomainError> {
    if changes.is_empty() {
        return Ok(0);
    }

    let mut tables = tables.write().await;

    // Apply to a copy so a failing change leaves committed state untouched
    let mut next = tables.clone();
    let count = changes.len();

    for change in changes {
        next.apply(change)?;
    }

    *tables = next;

    Ok(count)
}

/// Thread-safe store backing both repository ports.
///
/// Used directly, every write commits on its own. [`UnitOfWorkFactory::begin`]
/// opens a transaction whose writes stay private until its `save_changes`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with committed users and teams
    pub fn with_data(users: Vec<User>, teams: Vec<Team>) -> Self {
        let tables = Tables {
            users: users.into_iter().map(|u| (*u.id(), u)).collect(),
            teams: teams.into_iter().map(|t| (*t.id(), t)).collect(),
        };

        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Start a transaction over this store's tables
    pub fn transaction(&self) -> InMemoryTransaction {
        InMemoryTransaction {
            tables: self.tables.clone(),
            pending: Mutex::new(Vec::new()),
        }
    }

    async fn write(
        &self,
        change: PendingChange,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        ensure_not_cancelled(cancel)?;
        commit(&self.tables, vec![change]).await.map(|_| ())
    }
}

impl UnitOfWorkFactory for InMemoryStore {
    fn begin(&self) -> WorkScope {
        let transaction = Arc::new(self.transaction());

        WorkScope {
            users: transaction.clone(),
            teams: transaction.clone(),
            unit_of_work: transaction,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_by_id(
        &self,
        id: &UserId,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.user(id))
    }

    async fn get_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.user_by_email(email))
    }

    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<User>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.all_users())
    }

    async fn add(&self, user: User, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.write(PendingChange::AddUser(user), cancel).await
    }

    async fn update(&self, user: User, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.write(PendingChange::UpdateUser(user), cancel).await
    }

    async fn delete(&self, user: &User, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.write(PendingChange::DeleteUser(*user.id()), cancel)
            .await
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn get_by_id(
        &self,
        id: &TeamId,
        cancel: &CancellationToken,
    ) -> Result<Option<Team>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.team(id))
    }

    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Team>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.all_teams())
    }

    async fn add(&self, team: Team, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.write(PendingChange::AddTeam(team), cancel).await
    }

    async fn update(&self, team: Team, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.write(PendingChange::UpdateTeam(team), cancel).await
    }

    async fn delete(&self, team: &Team, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.write(PendingChange::DeleteTeam(*team.id()), cancel)
            .await
    }
}

/// Writes staged privately until [`UnitOfWork::save_changes`].
///
/// Reads see committed state only. A batch that breaks email uniqueness or
/// touches a missing row is rejected as a whole. Dropping the transaction
/// discards whatever was not committed.
#[derive(Debug)]
pub struct InMemoryTransaction {
    tables: Arc<RwLock<Tables>>,
    pending: Mutex<Vec<PendingChange>>,
}

impl InMemoryTransaction {
    /// Number of staged, uncommitted changes
    pub async fn pending_changes(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn stage(
        &self,
        change: PendingChange,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        ensure_not_cancelled(cancel)?;
        self.pending.lock().await.push(change);
        Ok(())
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        let discarded = self.pending.get_mut().len();

        if discarded > 0 {
            debug!(changes = discarded, "Discarding uncommitted changes");
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryTransaction {
    async fn get_by_id(
        &self,
        id: &UserId,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.user(id))
    }

    async fn get_by_email(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.user_by_email(email))
    }

    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<User>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.all_users())
    }

    async fn add(&self, user: User, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.stage(PendingChange::AddUser(user), cancel).await
    }

    async fn update(&self, user: User, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.stage(PendingChange::UpdateUser(user), cancel).await
    }

    async fn delete(&self, user: &User, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.stage(PendingChange::DeleteUser(*user.id()), cancel)
            .await
    }
}

#[async_trait]
impl TeamRepository for InMemoryTransaction {
    async fn get_by_id(
        &self,
        id: &TeamId,
        cancel: &CancellationToken,
    ) -> Result<Option<Team>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.team(id))
    }

    async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<Team>, DomainError> {
        ensure_not_cancelled(cancel)?;
        Ok(self.tables.read().await.all_teams())
    }

    async fn add(&self, team: Team, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.stage(PendingChange::AddTeam(team), cancel).await
    }

    async fn update(&self, team: Team, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.stage(PendingChange::UpdateTeam(team), cancel).await
    }

    async fn delete(&self, team: &Team, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.stage(PendingChange::DeleteTeam(*team.id()), cancel)
            .await
    }
}

#[async_trait]
impl UnitOfWork for InMemoryTransaction {
    async fn save_changes(&self, cancel: &CancellationToken) -> Result<usize, DomainError> {
        ensure_not_cancelled(cancel)?;

        let changes: Vec<PendingChange> = self.pending.lock().await.drain(..).collect();
        let count = commit(&self.tables, changes).await?;

        if count > 0 {
            debug!(changes = count, "Committed staged changes");
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    fn create_user(email: &str) -> User {
        User::new(UserId::generate(), email, "hash", "Test User", UserRole::Member)
    }

    fn create_team(name: &str) -> Team {
        Team::new(TeamId::generate(), name).unwrap()
    }

    #[tokio::test]
    async fn test_add_is_invisible_until_commit() {
        let store = InMemoryStore::new();
        let tx = store.transaction();
        let cancel = CancellationToken::new();
        let user = create_user("a@example.com");

        UserRepository::add(&tx, user.clone(), &cancel).await.unwrap();
        assert_eq!(tx.pending_changes().await, 1);
        assert!(UserRepository::get_by_id(&store, user.id(), &cancel)
            .await
            .unwrap()
            .is_none());

        assert_eq!(tx.save_changes(&cancel).await.unwrap(), 1);
        assert_eq!(tx.pending_changes().await, 0);

        let found = UserRepository::get_by_id(&store, user.id(), &cancel)
            .await
            .unwrap();
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn test_direct_writes_commit_immediately() {
        let store = InMemoryStore::new();
        let cancel = CancellationToken::new();
        let team = create_team("Platform");

        TeamRepository::add(&store, team.clone(), &cancel).await.unwrap();
        assert_eq!(
            TeamRepository::get_by_id(&store, team.id(), &cancel)
                .await
                .unwrap(),
            Some(team.clone())
        );

        let result = TeamRepository::add(&store, team, &cancel).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_get_by_email_is_case_insensitive() {
        let user = create_user("jane@example.com");
        let store = InMemoryStore::with_data(vec![user.clone()], Vec::new());

        let found = store
            .get_by_email("JANE@Example.com", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(found.map(|u| *u.id()), Some(*user.id()));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejects_batch() {
        let existing = create_user("dup@example.com");
        let store = InMemoryStore::with_data(vec![existing], Vec::new());
        let tx = store.transaction();
        let cancel = CancellationToken::new();

        let team = create_team("Platform");
        TeamRepository::add(&tx, team.clone(), &cancel).await.unwrap();
        UserRepository::add(&tx, create_user("DUP@example.com"), &cancel)
            .await
            .unwrap();

        let result = tx.save_changes(&cancel).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        // The team staged in the same batch was not committed either
        assert!(TeamRepository::get_by_id(&store, team.id(), &cancel)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let mut user = create_user("a@example.com");
        let team = create_team("Platform");
        let store = InMemoryStore::with_data(vec![user.clone()], vec![team.clone()]);
        let tx = store.transaction();
        let cancel = CancellationToken::new();

        user.set_display_name("Renamed");
        UserRepository::update(&tx, user.clone(), &cancel).await.unwrap();
        TeamRepository::delete(&tx, &team, &cancel).await.unwrap();
        assert_eq!(tx.save_changes(&cancel).await.unwrap(), 2);

        let found = UserRepository::get_by_id(&store, user.id(), &cancel)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.display_name(), "Renamed");
        assert!(TeamRepository::get_all(&store, &cancel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_storage_fault() {
        let store = InMemoryStore::new();
        let tx = store.transaction();
        let cancel = CancellationToken::new();

        UserRepository::delete(&tx, &create_user("ghost@example.com"), &cancel)
            .await
            .unwrap();

        let result = tx.save_changes(&cancel).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_uncommitted_changes_are_not_committed_by_another_scope() {
        let victim = create_user("victim@example.com");
        let store = InMemoryStore::with_data(vec![victim.clone()], Vec::new());
        let cancel = CancellationToken::new();

        let abandoned = store.begin();
        abandoned.users.delete(&victim, &cancel).await.unwrap();

        let other = store.begin();
        other
            .users
            .add(create_user("new@example.com"), &cancel)
            .await
            .unwrap();
        assert_eq!(other.unit_of_work.save_changes(&cancel).await.unwrap(), 1);

        drop(abandoned);

        assert!(UserRepository::get_by_id(&store, victim.id(), &cancel)
            .await
            .unwrap()
            .is_some());
        assert_eq!(UserRepository::get_all(&store, &cancel).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_racing_deletes_keep_first_commit() {
        let user = create_user("gone@example.com");
        let store = InMemoryStore::with_data(vec![user.clone()], Vec::new());
        let cancel = CancellationToken::new();

        let first = store.begin();
        let second = store.begin();
        first.users.delete(&user, &cancel).await.unwrap();
        second.users.delete(&user, &cancel).await.unwrap();

        assert_eq!(first.unit_of_work.save_changes(&cancel).await.unwrap(), 1);

        let result = second.unit_of_work.save_changes(&cancel).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));

        assert!(UserRepository::get_by_id(&store, user.id(), &cancel)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_teams_sorted_by_name() {
        let store = InMemoryStore::with_data(
            Vec::new(),
            vec![create_team("Zeta"), create_team("Alpha")],
        );

        let teams = TeamRepository::get_all(&store, &CancellationToken::new())
            .await
            .unwrap();

        let names: Vec<&str> = teams.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[tokio::test]
    async fn test_cancelled_calls_fail() {
        let store = InMemoryStore::new();
        let tx = store.transaction();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = UserRepository::get_all(&store, &cancel).await;
        assert!(matches!(result, Err(DomainError::Cancelled)));

        let result = UserRepository::add(&tx, create_user("a@example.com"), &cancel).await;
        assert!(matches!(result, Err(DomainError::Cancelled)));

        let result = tx.save_changes(&cancel).await;
        assert!(matches!(result, Err(DomainError::Cancelled)));
    }

    #[tokio::test]
    async fn test_empty_commit() {
        let tx = InMemoryStore::new().transaction();
        assert_eq!(tx.save_changes(&CancellationToken::new()).await.unwrap(), 0);
    }
}
