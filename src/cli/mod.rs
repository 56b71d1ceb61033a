//! CLI module for Feedback Core
//!
//! Each subcommand wires the pipeline against a fresh in-memory store seeded
//! with the configured admin, sends one request and prints the outcome as JSON:
//! - `login`: exchange credentials for a token
//! - `whoami`: resolve a token to the current user
//! - `users` / `teams`: list the directory

pub mod auth;
pub mod directory;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::domain::Outcome;
use crate::infrastructure::logging;
use crate::App;

/// Feedback Core - request pipeline for the feedback-management backend
#[derive(Parser)]
#[command(name = "feedback-core")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Exchange credentials for a signed token
    Login(auth::LoginArgs),

    /// Show the user a token belongs to
    Whoami(auth::WhoamiArgs),

    /// List all users
    Users,

    /// List all teams
    Teams,
}

/// Load configuration, start logging and wire the application
async fn bootstrap(cancel: &CancellationToken) -> anyhow::Result<App> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    crate::create_app_with_config(&config, cancel).await
}

/// Print an outcome as JSON; a failure also ends the command with an error
fn report<T: Serialize>(outcome: Outcome<T>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    match outcome {
        Outcome::Success(_) => Ok(()),
        Outcome::Failure(message) => Err(anyhow::anyhow!(message)),
    }
}

/// Cancel the in-flight request on Ctrl+C
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, cancelling request");
            token.cancel();
        }
    });

    cancel
}

/// Dispatch the parsed command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let cancel = cancel_on_ctrl_c();

    match cli.command {
        Command::Login(args) => auth::login(args, &cancel).await,
        Command::Whoami(args) => auth::whoami(args, &cancel).await,
        Command::Users => directory::users(&cancel).await,
        Command::Teams => directory::teams(&cancel).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        let cli = Cli::try_parse_from([
            "feedback-core",
            "login",
            "--email",
            "admin@example.com",
            "--password",
            "Admin1234",
        ])
        .unwrap();

        match cli.command {
            Command::Login(args) => {
                assert_eq!(args.email, "admin@example.com");
                assert_eq!(args.password, "Admin1234");
            }
            _ => panic!("expected login"),
        }
    }

    #[test]
    fn test_parse_whoami_requires_token() {
        assert!(Cli::try_parse_from(["feedback-core", "whoami"]).is_err());
        assert!(Cli::try_parse_from(["feedback-core", "whoami", "--token", "abc"]).is_ok());
    }

    #[test]
    fn test_parse_listing_commands() {
        assert!(matches!(
            Cli::try_parse_from(["feedback-core", "users"]).unwrap().command,
            Command::Users
        ));
        assert!(matches!(
            Cli::try_parse_from(["feedback-core", "teams"]).unwrap().command,
            Command::Teams
        ));
    }

    #[test]
    fn test_report_failure_is_error() {
        assert!(report(Outcome::<u8>::success(1)).is_ok());

        let err = report(Outcome::<u8>::failure("User not found")).unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }
}
