use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use super::device_flow::REPO_SCOPE;
use super::error::AuthError;
use super::token::Credential;

const DEFAULT_GH_PROGRAM: &str = "gh";

/// Delegates authentication to the GitHub CLI.
///
/// # Example
/// ```no_run
/// use repoinit::auth::GhCli;
///
/// # async fn example() -> Result<(), repoinit::auth::AuthError> {
/// let gh = GhCli::new();
/// let credential = match gh.query_token().await {
///     Ok(credential) => credential,
///     Err(_) => {
///         gh.interactive_login().await?;
///         gh.query_token().await?
///     }
/// };
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    base_args: Vec<String>,
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GhCli {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_GH_PROGRAM)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Arguments inserted before the `auth ...` subcommand, e.g. a script path
    /// when `program` is an interpreter.
    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.base_args).args(args);
        command
    }

    /// `gh auth token`, with stdout captured as the credential.
    pub async fn query_token(&self) -> Result<Credential, AuthError> {
        let output = self
            .command(&["auth", "token"])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| self.spawn_error(err))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.status_error("auth token", output.status, stderr.trim()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Credential::new(stdout.as_ref()).ok_or_else(|| {
            AuthError::CommandError(format!("{} auth token printed nothing", self.program))
        })
    }

    /// `gh auth login --web --scopes repo`, attached to this terminal.
    ///
    /// Returns once the subprocess exits; the caller re-queries for the token.
    pub async fn interactive_login(&self) -> Result<(), AuthError> {
        let status = self
            .command(&["auth", "login", "--web", "--scopes", REPO_SCOPE])
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|err| self.spawn_error(err))?;

        if status.success() {
            Ok(())
        } else {
            Err(self.status_error("auth login", status, ""))
        }
    }

    fn spawn_error(&self, err: std::io::Error) -> AuthError {
        if err.kind() == std::io::ErrorKind::NotFound {
            AuthError::Unavailable(self.program.clone())
        } else {
            AuthError::CommandError(format!("failed to run {}: {err}", self.program))
        }
    }

    fn status_error(&self, subcommand: &str, status: ExitStatus, stderr: &str) -> AuthError {
        let mut message = format!("{} {subcommand} exited with {status}", self.program);
        if !stderr.is_empty() {
            message.push_str(": ");
            message.push_str(stderr);
        }
        AuthError::CommandError(message)
    }
}
