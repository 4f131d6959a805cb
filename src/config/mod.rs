//! Runtime configuration (environment, optionally seeded from `.env`).

use std::path::PathBuf;

use crate::auth::FileTokenStore;
use crate::github::DEFAULT_API_BASE_URL;

/// Pre-supplied credential; used as-is and never persisted.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
/// OAuth app client id enabling the device flow.
pub const CLIENT_ID_ENV: &str = "GITHUB_OAUTH_CLIENT_ID";
/// REST API base, for GitHub Enterprise Server.
pub const API_URL_ENV: &str = "GITHUB_API_URL";
/// Overrides where the resolved credential is stored.
pub const TOKEN_PATH_ENV: &str = "REPOINIT_TOKEN_PATH";
/// Overrides the GitHub CLI executable.
pub const GH_PATH_ENV: &str = "REPOINIT_GH_PATH";

/// Everything read from the environment, captured once at startup.
///
/// # Example
/// ```
/// use repoinit::config::AppConfig;
///
/// let config = AppConfig::from_lookup(|key| match key {
///     "GITHUB_TOKEN" => Some("ghp_example".to_string()),
///     _ => None,
/// });
/// assert_eq!(config.github_token.as_deref(), Some("ghp_example"));
/// assert_eq!(config.gh_program, "gh");
/// ```
#[derive(Clone)]
pub struct AppConfig {
    pub github_token: Option<String>,
    pub oauth_client_id: Option<String>,
    pub token_path: PathBuf,
    pub gh_program: String,
    pub api_base_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("github_token", &self.github_token.as_ref().map(|_| ".."))
            .field("oauth_client_id", &self.oauth_client_id)
            .field("token_path", &self.token_path)
            .field("gh_program", &self.gh_program)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl AppConfig {
    /// Load `.env` from the working directory if present (existing variables
    /// win), then read the process environment.
    pub fn from_env() -> Self {
        Self::log_dotenv(dotenvy::dotenv());
        Self::from_process_env()
    }

    /// Log the outcome of a `.env` load.
    pub fn log_dotenv(result: dotenvy::Result<PathBuf>) {
        match result {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env"),
        }
    }

    pub fn from_process_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            github_token: get(TOKEN_ENV),
            oauth_client_id: get(CLIENT_ID_ENV).map(|id| id.trim().to_string()),
            token_path: get(TOKEN_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(FileTokenStore::default_path),
            gh_program: get(GH_PATH_ENV).unwrap_or_else(|| "gh".to_string()),
            api_base_url: get(API_URL_ENV)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        }
    }

    pub fn token_store(&self) -> FileTokenStore {
        FileTokenStore::new(self.token_path.clone())
    }
}
