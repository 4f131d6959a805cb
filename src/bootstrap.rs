//! End-to-end workflow: credential, remote repository, local git, push.

use std::path::{Path, PathBuf};

use strum::{Display, EnumString};
use tokio_util::sync::CancellationToken;

use crate::auth::{ResolveContext, TokenResolver};
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::git::Git;
use crate::github::{CreateRepository, GitHubClient, Repository};

pub const DEFAULT_COMMIT_MESSAGE: &str = "Initial commit";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_REMOTE: &str = "origin";

/// Which remote URL the local repository points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RemoteProtocol {
    #[default]
    Ssh,
    Https,
}

#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub workdir: PathBuf,
    /// Defaults to the working directory's name.
    pub name: Option<String>,
    pub private: bool,
    pub description: Option<String>,
    pub message: String,
    pub branch: String,
    pub remote: String,
    pub protocol: RemoteProtocol,
}

impl BootstrapOptions {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            name: None,
            private: false,
            description: None,
            message: DEFAULT_COMMIT_MESSAGE.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            protocol: RemoteProtocol::default(),
        }
    }

    /// Explicit name, else the final component of the (absolute) working directory.
    pub fn repository_name(&self) -> Result<String> {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return Ok(name.to_string());
        }
        let absolute = std::fs::canonicalize(&self.workdir)?;
        absolute
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "cannot derive a repository name from {}; pass --name",
                    absolute.display()
                ))
            })
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub repository: Repository,
    pub created: bool,
    pub remote_url: String,
    pub staged: Vec<PathBuf>,
}

/// Resolve a credential, then [`publish`] the working directory.
///
/// `cancel` aborts the whole run: an in-flight API call is dropped and a
/// running git child is killed.
pub async fn run(
    config: &AppConfig,
    options: &BootstrapOptions,
    cancel: CancellationToken,
) -> Result<BootstrapReport> {
    let resolver = TokenResolver::from_config(config);
    let credential = resolver
        .resolve(&ResolveContext::new(cancel.clone()))
        .await?;
    let github = GitHubClient::new(config.api_base_url.clone(), credential);
    let git = Git::new(options.workdir.clone());
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        report = publish(&github, &git, options) => report,
    }
}

/// Create or reuse the remote repository, then init, stage, commit, and push.
pub async fn publish(
    github: &GitHubClient,
    git: &Git,
    options: &BootstrapOptions,
) -> Result<BootstrapReport> {
    let name = options.repository_name()?;
    let request = CreateRepository::builder()
        .name(name)
        .private(options.private)
        .maybe_description(options.description.clone())
        .build();

    let ensured = github.ensure_repository(&request).await?;
    if ensured.created {
        println!("Created repository: {}", ensured.repository.html_url);
    } else {
        println!("Using existing repository: {}", ensured.repository.html_url);
    }

    git.init().await?;

    let remote_url = match options.protocol {
        RemoteProtocol::Ssh => ensured.repository.ssh_remote(),
        RemoteProtocol::Https => ensured.repository.https_remote(),
    };
    configure_remote(git, &options.remote, &remote_url).await?;

    let staged = stage_files(git).await?;

    git.commit(&options.message).await?;
    git.rename_branch(&options.branch).await?;
    git.push(&options.remote, &options.branch).await?;

    println!("Successfully initialized and pushed repository!");
    Ok(BootstrapReport {
        repository: ensured.repository,
        created: ensured.created,
        remote_url,
        staged,
    })
}

async fn configure_remote(git: &Git, remote: &str, url: &str) -> Result<()> {
    match git.remote_url(remote).await? {
        None => git.add_remote(remote, url).await,
        Some(existing) if existing == url => Ok(()),
        Some(existing) => {
            tracing::info!(remote, from = %existing, to = %url, "updating remote url");
            git.set_remote_url(remote, url).await
        }
    }
}

/// Stage `.gitignore` first, then every other candidate. Individual
/// failures are warnings; returns what was staged.
async fn stage_files(git: &Git) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::new();

    let gitignore = PathBuf::from(".gitignore");
    if git.workdir().join(&gitignore).is_file() {
        match git.add(&gitignore).await {
            Ok(()) => staged.push(gitignore),
            Err(err) => tracing::warn!(error = %err, "failed to add .gitignore"),
        }
    }

    for file in stageable_files(git.workdir())? {
        match git.add(&file).await {
            Ok(()) => staged.push(file),
            Err(err) => tracing::warn!(file = %file.display(), error = %err, "failed to add file"),
        }
    }

    Ok(staged)
}

/// Top-level entries that are not hidden and not directories, sorted by name.
pub fn stageable_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') || entry.file_type()?.is_dir() {
            continue;
        }
        files.push(PathBuf::from(name));
    }
    files.sort();
    Ok(files)
}
