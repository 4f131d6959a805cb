//! GitHub OAuth device authorization grant.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::device_code::{
    DeviceAuthorization, DeviceFlowErrorCode, PollOutcome, DEFAULT_POLL_INTERVAL,
    MAX_DEVICE_CODE_LIFETIME,
};
use super::error::AuthError;
use super::token::Credential;

const DEFAULT_DEVICE_CODE_URL: &str = "https://github.com/login/device/code";
const DEFAULT_ACCESS_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Scope requested by the device flow: read/write access to repositories.
pub const REPO_SCOPE: &str = "repo";

/// Source of poll outcomes for a pending device authorization.
#[async_trait]
pub trait DevicePoller: Send + Sync {
    async fn poll(&self, device_code: &str) -> Result<PollOutcome, AuthError>;
}

/// GitHub device-flow client.
///
/// # Example
/// ```no_run
/// use repoinit::auth::GitHubDeviceFlow;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), repoinit::auth::AuthError> {
/// let flow = GitHubDeviceFlow::new("Iv1.0123456789abcdef");
/// let credential = flow.authorize(&["repo"], &CancellationToken::new()).await?;
/// # Ok(())
/// # }
/// ```
pub struct GitHubDeviceFlow {
    client: reqwest::Client,
    client_id: String,
    device_code_url: String,
    access_token_url: String,
}

impl GitHubDeviceFlow {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.into(),
            device_code_url: DEFAULT_DEVICE_CODE_URL.to_string(),
            access_token_url: DEFAULT_ACCESS_TOKEN_URL.to_string(),
        }
    }

    pub fn with_device_code_url(mut self, url: impl Into<String>) -> Self {
        self.device_code_url = url.into();
        self
    }

    pub fn with_access_token_url(mut self, url: impl Into<String>) -> Self {
        self.access_token_url = url.into();
        self
    }

    /// Request a new device authorization for `scopes`.
    pub async fn begin(&self, scopes: &[&str]) -> Result<DeviceAuthorization, AuthError> {
        let scope = scopes.join(",");
        let resp = self
            .client
            .post(&self.device_code_url)
            .header("Accept", "application/json")
            .form(&[("client_id", self.client_id.as_str()), ("scope", scope.as_str())])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(AuthError::Protocol(format!(
                "Device code request failed with status {status}: {body}"
            )));
        }
        let payload: DeviceCodeResponse = serde_json::from_str(&body)?;
        let interval = match payload.interval {
            Some(secs) if secs > 0 => Duration::from_secs(secs as u64),
            _ => DEFAULT_POLL_INTERVAL,
        };
        let expires_in = Duration::from_secs(payload.expires_in);
        if expires_in > MAX_DEVICE_CODE_LIFETIME || interval > MAX_DEVICE_CODE_LIFETIME {
            return Err(AuthError::Protocol(format!(
                "Implausible device code timing: expires_in={}s interval={}s",
                expires_in.as_secs(),
                interval.as_secs()
            )));
        }
        Ok(DeviceAuthorization {
            device_code: payload.device_code,
            user_code: payload.user_code,
            verification_uri: payload.verification_uri,
            verification_uri_complete: payload.verification_uri_complete,
            expires_in,
            interval,
        })
    }

    /// Run the whole flow: request a code, show the instructions on stdout,
    /// then poll until the user finishes, the code expires, or `cancel` fires.
    pub async fn authorize(
        &self,
        scopes: &[&str],
        cancel: &CancellationToken,
    ) -> Result<Credential, AuthError> {
        let started = Instant::now();
        let authorization = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AuthError::Cancelled),
            authorization = self.begin(scopes) => authorization?,
        };
        tracing::debug!(
            interval_secs = authorization.interval.as_secs(),
            expires_in_secs = authorization.expires_in.as_secs(),
            "device authorization issued"
        );

        println!("{}", authorization.instructions());
        println!("⏳ Waiting for authorization...");

        wait_for_authorization(self, &authorization, started, cancel).await
    }
}

#[async_trait]
impl DevicePoller for GitHubDeviceFlow {
    async fn poll(&self, device_code: &str) -> Result<PollOutcome, AuthError> {
        let resp = self
            .client
            .post(&self.access_token_url)
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("device_code", device_code),
                ("grant_type", DEVICE_CODE_GRANT_TYPE),
            ])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Ok(PollOutcome::ProtocolError(format!(
                "Device token request failed with status {status}: {body}"
            )));
        }
        Ok(classify_token_response(&body))
    }
}

fn classify_token_response(body: &str) -> PollOutcome {
    let payload: AccessTokenResponse = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(err) => {
            return PollOutcome::ProtocolError(format!("Undecodable token response: {err}"))
        }
    };
    match payload.error.as_deref().map(str::trim) {
        None | Some("") => payload
            .access_token
            .and_then(Credential::new)
            .map(PollOutcome::Granted)
            .unwrap_or_else(|| {
                PollOutcome::ProtocolError(
                    "Token response missing access_token and error".to_string(),
                )
            }),
        Some(code) => match DeviceFlowErrorCode::from_str(code) {
            Ok(known) => known.into(),
            Err(_) => PollOutcome::ProtocolError(match payload.error_description {
                Some(description) => format!("{code}: {description}"),
                None => code.to_string(),
            }),
        },
    }
}

/// Poll `poller` every `authorization.interval` until the user grants or
/// denies access, the authorization expires, or `cancel` fires.
///
/// `started` is when the authorization was requested; expiry is measured from
/// it regardless of what the polls return. `SlowDown` keeps the same interval.
pub async fn wait_for_authorization<P>(
    poller: &P,
    authorization: &DeviceAuthorization,
    started: Instant,
    cancel: &CancellationToken,
) -> Result<Credential, AuthError>
where
    P: DevicePoller + ?Sized,
{
    let out_of_range = || AuthError::Protocol("Device code timing out of range".to_string());
    let deadline = started
        .checked_add(authorization.expires_in)
        .ok_or_else(out_of_range)?;
    let interval = authorization.interval.max(Duration::from_secs(1));
    let first_tick = started.checked_add(interval).ok_or_else(out_of_range)?;
    let mut ticker = tokio::time::interval_at(first_tick, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AuthError::Cancelled),
            _ = tokio::time::sleep_until(deadline) => return Err(AuthError::Expired),
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AuthError::Cancelled),
            _ = tokio::time::sleep_until(deadline) => return Err(AuthError::Expired),
            outcome = poller.poll(&authorization.device_code) => outcome?,
        };

        match outcome {
            PollOutcome::Granted(credential) => return Ok(credential),
            PollOutcome::Pending => continue,
            PollOutcome::SlowDown => {
                tracing::debug!("device flow asked to slow down; keeping interval");
                continue;
            }
            PollOutcome::Expired => return Err(AuthError::Expired),
            PollOutcome::Denied => return Err(AuthError::Denied),
            PollOutcome::ProtocolError(detail) => return Err(AuthError::Protocol(detail)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_uri: String,
    verification_uri_complete: Option<String>,
    expires_in: u64,
    interval: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}
