use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tick_core::StatusFilter;

#[derive(Parser)]
#[command(name = "tick")]
#[command(about = "Keep a todo list on a remote notes server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Remote API base URL (overrides TICK_API_BASE and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register, sign in or sign out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// List notes
    #[command(alias = "ls")]
    List {
        /// Status filter
        #[arg(short, long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        /// Case-insensitive title search
        #[arg(short, long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note title
        title: Vec<String>,
    },
    /// Delete a note
    #[command(alias = "rm")]
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Interactive session (toggles and edits live until you quit)
    Shell,
    /// Configure the CLI
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum FilterArg {
    All,
    Todo,
    Done,
}

impl From<FilterArg> for StatusFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => Self::All,
            FilterArg::Todo => Self::Todo,
            FilterArg::Done => Self::Done,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account (does not sign in)
    Register {
        #[arg(long, value_name = "NAME")]
        username: String,
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        #[arg(long, value_name = "PASSWORD")]
        confirm_password: String,
    },
    /// Sign in and store the session token in the keychain
    Login {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show who is signed in
    Status,
    /// Sign out and clear the stored session
    Logout,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the config file
    Init {
        /// Remote API base URL
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
    },
    /// Print the resolved configuration
    Show,
}
