use std::sync::Arc;

use super::error::AuthError;
use super::gh_cli::GhCli;
use super::providers::{
    CredentialProvider, DeviceFlowProvider, EnvironmentProvider, GhCliLoginProvider,
    GhCliTokenProvider, ResolveContext, StoredCredentialProvider,
};
use super::store::{FileTokenStore, TokenStore};
use super::token::Credential;
use crate::config::{AppConfig, CLIENT_ID_ENV, TOKEN_ENV};

/// A credential together with the provider that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedCredential {
    pub credential: Credential,
    pub source: &'static str,
}

/// Tries each [`CredentialProvider`] in order; the first success wins.
///
/// Credentials from persisting providers are written to the token store.
/// Failing providers are skipped silently (logged at debug level); if every
/// provider fails the last error is returned inside
/// [`AuthError::Exhausted`] along with setup instructions.
///
/// # Example
/// ```no_run
/// use repoinit::auth::{ResolveContext, TokenResolver};
/// use repoinit::config::AppConfig;
///
/// # async fn example() -> Result<(), repoinit::auth::AuthError> {
/// let resolver = TokenResolver::from_config(&AppConfig::from_env());
/// let credential = resolver.resolve(&ResolveContext::default()).await?;
/// # Ok(())
/// # }
/// ```
pub struct TokenResolver {
    providers: Vec<Box<dyn CredentialProvider>>,
    store: Arc<dyn TokenStore>,
}

impl TokenResolver {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>, store: Arc<dyn TokenStore>) -> Self {
        Self { providers, store }
    }

    /// Standard chain: environment, token file, `gh auth token`,
    /// `gh auth login` + token, device flow.
    pub fn from_config(config: &AppConfig) -> Self {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_path.clone()));
        let gh = GhCli::with_program(config.gh_program.clone());
        let providers: Vec<Box<dyn CredentialProvider>> = vec![
            Box::new(EnvironmentProvider::new(config.github_token.clone())),
            Box::new(StoredCredentialProvider::new(store.clone())),
            Box::new(GhCliTokenProvider::new(gh.clone())),
            Box::new(GhCliLoginProvider::new(gh)),
            Box::new(DeviceFlowProvider::new(config.oauth_client_id.clone())),
        ];
        Self::new(providers, store)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }

    pub async fn resolve(&self, ctx: &ResolveContext) -> Result<Credential, AuthError> {
        Ok(self.resolve_with_source(ctx).await?.credential)
    }

    pub async fn resolve_with_source(
        &self,
        ctx: &ResolveContext,
    ) -> Result<ResolvedCredential, AuthError> {
        let mut last_error = AuthError::NotConfigured("no credential providers".to_string());

        for provider in &self.providers {
            if ctx.is_cancelled() {
                return Err(AuthError::Cancelled);
            }
            match provider.try_resolve(ctx).await {
                Ok(credential) => {
                    tracing::info!(source = provider.name(), "resolved GitHub credential");
                    if provider.persists() {
                        self.persist(&credential);
                    }
                    return Ok(ResolvedCredential {
                        credential,
                        source: provider.name(),
                    });
                }
                Err(AuthError::Cancelled) => return Err(AuthError::Cancelled),
                Err(err) => {
                    tracing::debug!(source = provider.name(), error = %err, "credential source failed");
                    last_error = err;
                }
            }
        }

        Err(AuthError::Exhausted {
            last: Box::new(last_error),
            remediation: remediation(),
        })
    }

    fn persist(&self, credential: &Credential) {
        if let Err(err) = self.store.write(credential) {
            tracing::warn!(error = %err, "could not save GitHub credential; it will be resolved again next run");
        }
    }
}

fn remediation() -> String {
    format!(
        "To authenticate, do one of the following:\n  \
         - export {TOKEN_ENV}=<personal access token with the repo scope> (or put it in .env)\n  \
         - install the GitHub CLI (https://cli.github.com) and run `gh auth login`\n  \
         - set {CLIENT_ID_ENV} to an OAuth app client id with device flow enabled"
    )
}
