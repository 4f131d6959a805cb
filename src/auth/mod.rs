//! GitHub credential resolution: environment, token file, `gh`, device flow.

pub mod device_code;
pub mod device_flow;
pub mod error;
pub mod gh_cli;
pub mod providers;
pub mod resolver;
pub mod store;
pub mod token;

pub use device_code::{DeviceAuthorization, PollOutcome};
pub use device_flow::{wait_for_authorization, DevicePoller, GitHubDeviceFlow, REPO_SCOPE};
pub use error::AuthError;
pub use gh_cli::GhCli;
pub use providers::{CredentialProvider, ResolveContext};
pub use resolver::{ResolvedCredential, TokenResolver};
pub use store::{FileTokenStore, TokenStore};
pub use token::Credential;
