use std::sync::Arc;

use async_trait::async_trait;

use super::{CredentialProvider, ResolveContext};
use crate::auth::error::AuthError;
use crate::auth::store::TokenStore;
use crate::auth::token::Credential;

/// Credential persisted by an earlier run.
pub struct StoredCredentialProvider {
    store: Arc<dyn TokenStore>,
}

impl StoredCredentialProvider {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CredentialProvider for StoredCredentialProvider {
    fn name(&self) -> &'static str {
        "token file"
    }

    fn persists(&self) -> bool {
        false
    }

    async fn try_resolve(&self, _ctx: &ResolveContext) -> Result<Credential, AuthError> {
        self.store.read()
    }
}
