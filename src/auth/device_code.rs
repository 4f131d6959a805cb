use std::time::Duration;

use strum::{Display, EnumString};

use super::token::Credential;

/// Poll interval used when the server omits one or sends a non-positive value.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound accepted for `expires_in` and `interval`.
pub const MAX_DEVICE_CODE_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Server-issued device authorization.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use repoinit::auth::DeviceAuthorization;
///
/// let authorization = DeviceAuthorization {
///     device_code: "device-code".to_string(),
///     user_code: "ABCD-1234".to_string(),
///     verification_uri: "https://github.com/login/device".to_string(),
///     verification_uri_complete: None,
///     expires_in: Duration::from_secs(900),
///     interval: Duration::from_secs(5),
/// };
/// assert!(authorization.instructions().contains("ABCD-1234"));
/// ```
#[derive(Clone)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    pub expires_in: Duration,
    pub interval: Duration,
}

impl DeviceAuthorization {
    /// Human-directed login instructions. The combined URI already embeds the
    /// user code, so the code is only printed separately without it.
    pub fn instructions(&self) -> String {
        match self.verification_uri_complete.as_deref() {
            Some(url) if !url.trim().is_empty() => {
                format!("🔗 Open {url} to authorize repoinit")
            }
            _ => format!(
                "🔗 Visit: {}\n📋 Enter code: {}",
                self.verification_uri, self.user_code
            ),
        }
    }
}

impl std::fmt::Debug for DeviceAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceAuthorization")
            .field("device_code", &"<redacted>")
            .field("user_code", &self.user_code)
            .field("verification_uri", &self.verification_uri)
            .field("verification_uri_complete", &self.verification_uri_complete)
            .field("expires_in", &self.expires_in)
            .field("interval", &self.interval)
            .finish()
    }
}

/// Result of a single token-endpoint poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Granted(Credential),
    Pending,
    SlowDown,
    Expired,
    Denied,
    ProtocolError(String),
}

/// Error codes the token endpoint uses to drive the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum DeviceFlowErrorCode {
    AuthorizationPending,
    SlowDown,
    ExpiredToken,
    AccessDenied,
}

impl From<DeviceFlowErrorCode> for PollOutcome {
    fn from(code: DeviceFlowErrorCode) -> Self {
        match code {
            DeviceFlowErrorCode::AuthorizationPending => PollOutcome::Pending,
            DeviceFlowErrorCode::SlowDown => PollOutcome::SlowDown,
            DeviceFlowErrorCode::ExpiredToken => PollOutcome::Expired,
            DeviceFlowErrorCode::AccessDenied => PollOutcome::Denied,
        }
    }
}
