//! Thin wrapper over the `git` executable.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::error::{AppError, Result};

/// Runs git subcommands inside one working directory.
///
/// Output of mutating commands goes straight to the user's terminal.
#[derive(Debug, Clone)]
pub struct Git {
    program: String,
    workdir: PathBuf,
}

impl Git {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: "git".to_string(),
            workdir: workdir.into(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .current_dir(&self.workdir)
            .kill_on_drop(true);
        command
    }

    async fn run(&self, args: &[&str]) -> Result<()> {
        tracing::debug!(args = ?args, "running git");
        let status = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(AppError::Command {
                program: self.program.clone(),
                args: args.join(" "),
                status,
            })
        }
    }

    pub async fn init(&self) -> Result<()> {
        self.run(&["init"]).await
    }

    /// URL of remote `name`, or `None` when no such remote is configured.
    pub async fn remote_url(&self, name: &str) -> Result<Option<String>> {
        let output = self
            .command(&["remote", "get-url", name])
            .stdin(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            return Ok(None);
        }
        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!url.is_empty()).then_some(url))
    }

    pub async fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "add", name, url]).await
    }

    pub async fn set_remote_url(&self, name: &str, url: &str) -> Result<()> {
        self.run(&["remote", "set-url", name, url]).await
    }

    pub async fn add(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(&["add", "--", path.as_ref()]).await
    }

    pub async fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message]).await
    }

    /// `git branch -M <branch>`, so the push target exists whatever
    /// `init.defaultBranch` is.
    pub async fn rename_branch(&self, branch: &str) -> Result<()> {
        self.run(&["branch", "-M", branch]).await
    }

    pub async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "-u", remote, branch]).await
    }
}
