//! Login and whoami commands

use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::infrastructure::handlers::{GetMe, Login};

use super::{bootstrap, report};

/// Arguments for the login command
#[derive(Args, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "FEEDBACK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the whoami command
#[derive(Args, Clone)]
pub struct WhoamiArgs {
    /// Token printed by `login`
    #[arg(long, env = "FEEDBACK_TOKEN", hide_env_values = true)]
    pub token: String,
}

pub async fn login(args: LoginArgs, cancel: &CancellationToken) -> anyhow::Result<()> {
    let app = bootstrap(cancel).await?;

    let outcome = app
        .dispatcher
        .send(Login::new(args.email, args.password), cancel)
        .await?;

    report(outcome)
}

pub async fn whoami(args: WhoamiArgs, cancel: &CancellationToken) -> anyhow::Result<()> {
    let app = bootstrap(cancel).await?;

    let claims = app.tokens.verify(&args.token)?;
    let user_id = claims.user_id()?;

    let outcome = app.dispatcher.send(GetMe { user_id }, cancel).await?;

    report(outcome)
}
