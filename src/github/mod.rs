//! Minimal GitHub REST client: who am I, does the repository exist, create it.

use bon::Builder;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::Credential;
use crate::error::{AppError, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const CLIENT_USER_AGENT: &str = concat!("repoinit/", env!("CARGO_PKG_VERSION"));

/// The authenticated account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

/// Repository fields used by the bootstrap workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub ssh_url: Option<String>,
    pub clone_url: Option<String>,
    #[serde(default)]
    pub private: bool,
}

impl Repository {
    /// SSH remote, derived from `full_name` when the API omitted it.
    pub fn ssh_remote(&self) -> String {
        self.ssh_url
            .clone()
            .unwrap_or_else(|| format!("git@github.com:{}.git", self.full_name))
    }

    /// HTTPS remote, derived from `html_url` when the API omitted it.
    pub fn https_remote(&self) -> String {
        self.clone_url
            .clone()
            .unwrap_or_else(|| format!("{}.git", self.html_url.trim_end_matches('/')))
    }
}

/// Body of `POST /user/repos`.
///
/// # Example
/// ```
/// use repoinit::github::CreateRepository;
///
/// let request = CreateRepository::builder()
///     .name("my-project")
///     .private(true)
///     .build();
/// assert!(!request.auto_init);
/// ```
#[derive(Debug, Clone, Builder, Serialize)]
pub struct CreateRepository {
    #[builder(into)]
    pub name: String,
    #[builder(default)]
    pub private: bool,
    #[builder(default)]
    pub auto_init: bool,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Outcome of [`GitHubClient::ensure_repository`].
#[derive(Debug, Clone)]
pub struct EnsuredRepository {
    pub repository: Repository,
    pub created: bool,
}

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    credential: Credential,
}

impl GitHubClient {
    pub fn new(base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.credential.expose()))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// `GET /user`
    pub async fn authenticated_user(&self) -> Result<User> {
        let resp = self.request(Method::GET, "/user").send().await?;
        decode(resp).await
    }

    /// `GET /repos/{owner}/{name}`; `None` when it does not exist.
    pub async fn get_repository(&self, owner: &str, name: &str) -> Result<Option<Repository>> {
        let resp = self
            .request(Method::GET, &format!("/repos/{owner}/{name}"))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(resp).await.map(Some)
    }

    /// `POST /user/repos`
    pub async fn create_repository(&self, request: &CreateRepository) -> Result<Repository> {
        let resp = self
            .request(Method::POST, "/user/repos")
            .json(request)
            .send()
            .await?;
        decode(resp).await
    }

    /// Reuse `owner/name` for the authenticated user if it exists, else create it.
    pub async fn ensure_repository(&self, request: &CreateRepository) -> Result<EnsuredRepository> {
        let user = self.authenticated_user().await?;
        if let Some(repository) = self.get_repository(&user.login, &request.name).await? {
            tracing::info!(repository = %repository.full_name, "repository already exists");
            return Ok(EnsuredRepository {
                repository,
                created: false,
            });
        }
        let repository = self.create_repository(request).await?;
        tracing::info!(repository = %repository.full_name, private = repository.private, "created repository");
        Ok(EnsuredRepository {
            repository,
            created: true,
        })
    }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(AppError::api(status.as_u16(), error_message(&body)));
    }
    Ok(serde_json::from_str(&body)?)
}

fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiErrorBody {
        message: Option<String>,
        #[serde(default)]
        errors: Vec<serde_json::Value>,
    }

    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody {
            message: Some(message),
            errors,
        }) => {
            let details: Vec<String> = errors
                .iter()
                .filter_map(|error| error.get("message").and_then(|m| m.as_str()))
                .map(str::to_string)
                .collect();
            if details.is_empty() {
                message
            } else {
                format!("{message} ({})", details.join("; "))
            }
        }
        _ => body.trim().to_string(),
    }
}
