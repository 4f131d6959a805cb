use async_trait::async_trait;

use super::{CredentialProvider, ResolveContext};
use crate::auth::device_flow::{GitHubDeviceFlow, REPO_SCOPE};
use crate::auth::error::AuthError;
use crate::auth::token::Credential;

/// OAuth device flow, available only when a client id is configured.
pub struct DeviceFlowProvider {
    flow: Option<GitHubDeviceFlow>,
}

impl DeviceFlowProvider {
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            flow: client_id
                .filter(|id| !id.trim().is_empty())
                .map(|id| GitHubDeviceFlow::new(id.trim())),
        }
    }

    pub fn with_flow(flow: GitHubDeviceFlow) -> Self {
        Self { flow: Some(flow) }
    }
}

#[async_trait]
impl CredentialProvider for DeviceFlowProvider {
    fn name(&self) -> &'static str {
        "device flow"
    }

    fn persists(&self) -> bool {
        true
    }

    async fn try_resolve(&self, ctx: &ResolveContext) -> Result<Credential, AuthError> {
        let flow = self.flow.as_ref().ok_or_else(|| {
            AuthError::NotConfigured(format!("{} is not set", crate::config::CLIENT_ID_ENV))
        })?;
        flow.authorize(&[REPO_SCOPE], ctx.cancellation()).await
    }
}
