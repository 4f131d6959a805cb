use async_trait::async_trait;

use super::{CredentialProvider, ResolveContext};
use crate::auth::error::AuthError;
use crate::auth::token::Credential;

/// Credential supplied by the caller through `GITHUB_TOKEN`.
///
/// The value is captured by [`AppConfig`](crate::config::AppConfig) so this
/// provider never touches the process environment itself.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentProvider {
    value: Option<String>,
}

impl EnvironmentProvider {
    pub fn new(value: Option<String>) -> Self {
        Self { value }
    }
}

#[async_trait]
impl CredentialProvider for EnvironmentProvider {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn persists(&self) -> bool {
        false
    }

    async fn try_resolve(&self, _ctx: &ResolveContext) -> Result<Credential, AuthError> {
        self.value
            .as_deref()
            .and_then(Credential::new)
            .ok_or_else(|| AuthError::NotConfigured(format!("{} is not set", crate::config::TOKEN_ENV)))
    }
}
