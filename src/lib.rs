//! repoinit: publish a local directory as a new GitHub repository.
//!
//! Resolves a GitHub credential (environment, stored token, GitHub CLI, or
//! OAuth device flow), creates or reuses `owner/<name>`, then runs `git init`,
//! stages the directory's files, commits, and pushes.
//!
//! # Quick Start
//!
//! ```no_run
//! use repoinit::bootstrap::{self, BootstrapOptions};
//! use repoinit::config::AppConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> repoinit::error::Result<()> {
//! let config = AppConfig::from_env();
//! let report = bootstrap::run(&config, &BootstrapOptions::new("."), CancellationToken::new()).await?;
//! println!("{}", report.repository.html_url);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod git;
pub mod github;

#[cfg(feature = "cli")]
pub mod cli;

/// Directory name used under the user config dir.
pub const APP_NAME: &str = "repoinit";
