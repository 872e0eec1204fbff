//! Operator CLI for the access core
//!
//! Subcommands:
//! - `migrate`: create the access schema in PostgreSQL
//! - `user`: provision accounts
//! - `token`: issue, list, delete and verify application tokens
//! - `team`: create and inspect teams as a given user

pub mod migrate;
pub mod team;
pub mod token;
pub mod user;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::state::AccessContext;

/// Portus access - application tokens and team authorization
#[derive(Parser)]
#[command(name = "portus-access")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Ignore the configured database and keep everything in memory
    #[arg(long, global = true)]
    pub in_memory: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create or update the database schema
    Migrate,

    /// Manage users
    #[command(subcommand)]
    User(user::UserCommand),

    /// Manage application tokens
    #[command(subcommand)]
    Token(token::TokenCommand),

    /// Manage teams
    #[command(subcommand)]
    Team(team::TeamCommand),
}

/// Load configuration, initialize logging and dispatch the command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;
    if cli.in_memory {
        config.database.url = None;
    }

    logging::init_logging(&config.logging);

    match cli.command {
        Command::Migrate => migrate::run(&config).await,
        command => {
            let context = crate::create_access_context(&config).await?;
            dispatch(&context, command).await
        }
    }
}

async fn dispatch(context: &AccessContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Migrate => Ok(()),
        Command::User(command) => user::run(context, command).await,
        Command::Token(command) => token::run(context, command).await,
        Command::Team(command) => team::run(context, command).await,
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn require_user(context: &AccessContext, username: &str) -> anyhow::Result<crate::domain::User> {
    context
        .users
        .get_by_username(username)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User '{}' not found", username))
}
