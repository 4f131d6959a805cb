//! Handlers for `repoinit auth ...`.

use tokio_util::sync::CancellationToken;

use crate::auth::{ResolveContext, TokenResolver, TokenStore};
use crate::config::{AppConfig, CLIENT_ID_ENV, TOKEN_ENV};
use crate::error::Result;

/// `repoinit auth token`. Reports the source, never the secret.
pub async fn handle_token(config: &AppConfig, cancel: CancellationToken) -> Result<()> {
    let resolver = TokenResolver::from_config(config);
    let resolved = resolver
        .resolve_with_source(&ResolveContext::new(cancel))
        .await?;
    println!("✅ GitHub credential available (from {})", resolved.source);
    Ok(())
}

/// `repoinit auth status`
pub fn handle_status(config: &AppConfig) -> Result<()> {
    let store = config.token_store();

    println!("🔐 Credential sources (in resolution order)\n");
    println!("  {TOKEN_ENV}: {}", set_or_not(config.github_token.is_some()));
    let stored = match store.read() {
        Ok(_) => "✅ Present".to_string(),
        Err(_) => "❌ Not present".to_string(),
    };
    println!("  Token file ({}): {stored}", store.path().display());
    println!("  GitHub CLI: `{} auth token`", config.gh_program);
    println!(
        "  {CLIENT_ID_ENV}: {}",
        set_or_not(config.oauth_client_id.is_some())
    );
    Ok(())
}

/// `repoinit auth logout`
pub fn handle_logout(config: &AppConfig) -> Result<()> {
    let store = config.token_store();
    store.clear()?;
    println!("✅ Removed stored credential at {}", store.path().display());
    Ok(())
}

fn set_or_not(set: bool) -> &'static str {
    if set {
        "✅ Set"
    } else {
        "❌ Not set"
    }
}
