use async_trait::async_trait;

use super::{CredentialProvider, ResolveContext};
use crate::auth::error::AuthError;
use crate::auth::gh_cli::GhCli;
use crate::auth::token::Credential;

/// Token already held by a logged-in `gh`.
pub struct GhCliTokenProvider {
    gh: GhCli,
}

impl GhCliTokenProvider {
    pub fn new(gh: GhCli) -> Self {
        Self { gh }
    }
}

#[async_trait]
impl CredentialProvider for GhCliTokenProvider {
    fn name(&self) -> &'static str {
        "gh auth token"
    }

    fn persists(&self) -> bool {
        true
    }

    async fn try_resolve(&self, ctx: &ResolveContext) -> Result<Credential, AuthError> {
        tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => Err(AuthError::Cancelled),
            result = self.gh.query_token() => result,
        }
    }
}

/// Runs `gh`'s browser login, then asks it for the token once more.
pub struct GhCliLoginProvider {
    gh: GhCli,
}

impl GhCliLoginProvider {
    pub fn new(gh: GhCli) -> Self {
        Self { gh }
    }
}

#[async_trait]
impl CredentialProvider for GhCliLoginProvider {
    fn name(&self) -> &'static str {
        "gh auth login"
    }

    fn persists(&self) -> bool {
        true
    }

    async fn try_resolve(&self, ctx: &ResolveContext) -> Result<Credential, AuthError> {
        // The login subprocess owns the terminal; it is awaited to completion
        // rather than raced against cancellation.
        self.gh.interactive_login().await?;
        if ctx.is_cancelled() {
            return Err(AuthError::Cancelled);
        }
        self.gh.query_token().await
    }
}
