//! Tick CLI - keep a todo list on a remote notes server from the terminal.

mod cli;
mod cli_config;
mod commands;
mod credentials;
mod error;


use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::run_auth;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::list::run_list;
use crate::commands::shell::run_shell;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "tick=info,tick_core=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_base = cli.api_base;

    match cli.command {
        Some(Commands::Auth { command }) => run_auth(command, api_base).await?,
        Some(Commands::List {
            filter,
            search,
            json,
        }) => run_list(filter.into(), search.as_deref(), json, api_base).await?,
        Some(Commands::Add { title }) => run_add(&title, api_base).await?,
        Some(Commands::Delete { id }) => run_delete(&id, api_base).await?,
        Some(Commands::Shell) => run_shell(api_base).await?,
        Some(Commands::Config { command }) => run_config(command, api_base)?,
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
