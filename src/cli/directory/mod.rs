//! Directory listings

use tokio_util::sync::CancellationToken;

use crate::infrastructure::handlers::{GetAllTeams, GetAllUsers};

use super::{bootstrap, report};

pub async fn users(cancel: &CancellationToken) -> anyhow::Result<()> {
    let app = bootstrap(cancel).await?;
    let outcome = app.dispatcher.send(GetAllUsers, cancel).await?;

    report(outcome)
}

pub async fn teams(cancel: &CancellationToken) -> anyhow::Result<()> {
    let app = bootstrap(cancel).await?;
    let outcome = app.dispatcher.send(GetAllTeams, cancel).await?;

    report(outcome)
}
