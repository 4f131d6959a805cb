use thiserror::Error;

/// Failures along the credential resolution chain.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No stored credential")]
    NotFound,
    #[error("{0} is not installed")]
    Unavailable(String),
    #[error("Command failed: {0}")]
    CommandError(String),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Device code expired before authorization completed")]
    Expired,
    #[error("Authorization was denied")]
    Denied,
    #[error("Authentication was cancelled")]
    Cancelled,
    #[error("Not configured: {0}")]
    NotConfigured(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("No GitHub credential available ({last})\n{remediation}")]
    Exhausted {
        last: Box<AuthError>,
        remediation: String,
    },
}

impl AuthError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Protocol(error.to_string())
    }
}
