//! Command-line interface for repoinit.

pub mod auth;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::bootstrap::{
    BootstrapOptions, RemoteProtocol, DEFAULT_BRANCH, DEFAULT_COMMIT_MESSAGE, DEFAULT_REMOTE,
};

/// Create a GitHub repository for a directory, commit its files, and push.
#[derive(Parser, Debug)]
#[command(name = "repoinit", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub init: InitArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Credential management
    Auth(AuthArgs),
}

/// Options for the default bootstrap action.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Repository name (defaults to the directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Create the repository as private
    #[arg(long)]
    pub private: bool,

    /// Repository description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Commit message
    #[arg(short, long, default_value = DEFAULT_COMMIT_MESSAGE)]
    pub message: String,

    /// Branch to push
    #[arg(short, long, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Name of the git remote
    #[arg(long, default_value = DEFAULT_REMOTE)]
    pub remote: String,

    /// Remote URL protocol (ssh or https)
    #[arg(long, default_value_t = RemoteProtocol::Ssh)]
    pub protocol: RemoteProtocol,

    /// Project directory
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

impl From<InitArgs> for BootstrapOptions {
    fn from(args: InitArgs) -> Self {
        Self {
            workdir: args.dir,
            name: args.name,
            private: args.private,
            description: args.description,
            message: args.message,
            branch: args.branch,
            remote: args.remote,
            protocol: args.protocol,
        }
    }
}

#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Resolve a credential and report where it came from
    Token,
    /// Show which credential sources are configured
    Status,
    /// Delete the stored credential
    Logout,
}
