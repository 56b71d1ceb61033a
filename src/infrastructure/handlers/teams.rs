//! Team query and command handlers

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{
    DomainError, Outcome, RequestHandler, TeamRepository, UnitOfWorkFactory, TEAM_NOT_FOUND,
};

use super::requests::{DeleteTeam, GetAllTeams, GetTeam};
use super::views::TeamView;

pub struct GetTeamHandler {
    teams: Arc<dyn TeamRepository>,
}

impl GetTeamHandler {
    pub fn new(teams: Arc<dyn TeamRepository>) -> Self {
        Self { teams }
    }
}

#[async_trait]
impl RequestHandler<GetTeam> for GetTeamHandler {
    async fn handle(
        &self,
        request: GetTeam,
        cancel: &CancellationToken,
    ) -> Result<Outcome<TeamView>, DomainError> {
        debug!(team_id = %request.id, "Fetching team");

        let outcome = match self.teams.get_by_id(&request.id, cancel).await? {
            Some(team) => Outcome::success(team),
            None => Outcome::failure(TEAM_NOT_FOUND),
        };

        Ok(outcome.map(|team| TeamView::from(&team)))
    }
}

pub struct GetAllTeamsHandler {
    teams: Arc<dyn TeamRepository>,
}

impl GetAllTeamsHandler {
    pub fn new(teams: Arc<dyn TeamRepository>) -> Self {
        Self { teams }
    }
}

#[async_trait]
impl RequestHandler<GetAllTeams> for GetAllTeamsHandler {
    async fn handle(
        &self,
        _request: GetAllTeams,
        cancel: &CancellationToken,
    ) -> Result<Outcome<Vec<TeamView>>, DomainError> {
        let teams = self.teams.get_all(cancel).await?;
        debug!(count = teams.len(), "Listed teams");

        Ok(Outcome::success(teams.iter().map(TeamView::from).collect()))
    }
}

/// Deletes a team; members are left to the repository's referential rules
pub struct DeleteTeamHandler {
    scopes: Arc<dyn UnitOfWorkFactory>,
}

impl DeleteTeamHandler {
    pub fn new(scopes: Arc<dyn UnitOfWorkFactory>) -> Self {
        Self { scopes }
    }
}

#[async_trait]
impl RequestHandler<DeleteTeam> for DeleteTeamHandler {
    async fn handle(
        &self,
        request: DeleteTeam,
        cancel: &CancellationToken,
    ) -> Result<Outcome<bool>, DomainError> {
        info!(team_id = %request.id, "Deleting team");

        let scope = self.scopes.begin();

        let Some(team) = scope.teams.get_by_id(&request.id, cancel).await? else {
            warn!(team_id = %request.id, "Team to delete not found");
            return Ok(Outcome::failure(TEAM_NOT_FOUND));
        };

        scope.teams.delete(&team, cancel).await?;
        scope.unit_of_work.save_changes(cancel).await?;

        info!(team_id = %request.id, "Team deleted");

        Ok(Outcome::success(true))
    }
}
