//! Credential sources tried, in order, by the [`TokenResolver`](super::TokenResolver).

pub mod device_flow;
pub mod environment;
pub mod gh_cli;
pub mod stored;

pub use device_flow::DeviceFlowProvider;
pub use environment::EnvironmentProvider;
pub use gh_cli::{GhCliLoginProvider, GhCliTokenProvider};
pub use stored::StoredCredentialProvider;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::AuthError;
use super::token::Credential;

/// Per-call state handed to every provider.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    cancel: CancellationToken,
}

impl ResolveContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// One step of the credential fallback chain.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Short label used in logs and `repoinit auth token`.
    fn name(&self) -> &'static str;

    /// Whether a credential from this source is written to the token store.
    fn persists(&self) -> bool;

    async fn try_resolve(&self, ctx: &ResolveContext) -> Result<Credential, AuthError>;
}
