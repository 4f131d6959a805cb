//! Error types for repoinit.

use std::process::ExitStatus;

use thiserror::Error;

use crate::auth::AuthError;

/// Primary error type for the bootstrap workflow.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Interrupted")]
    Cancelled,

    #[error("`{program} {args}` failed with {status}")]
    Command {
        program: String,
        args: String,
        status: ExitStatus,
    },
}

impl AppError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Authentication(err) => err.is_cancelled(),
            _ => false,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AppError>;
