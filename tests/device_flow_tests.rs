use std::time::Duration;

use repoinit::auth::{AuthError, DevicePoller, GitHubDeviceFlow, PollOutcome};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn device_flow(server: &MockServer) -> GitHubDeviceFlow {
    GitHubDeviceFlow::new("client-123")
        .with_device_code_url(format!("{}/login/device/code", server.uri()))
        .with_access_token_url(format!("{}/login/oauth/access_token", server.uri()))
}

async fn mount_token_response(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn begin_posts_form_and_parses_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/device/code"))
        .and(header("accept", "application/json"))
        .and(body_string_contains("client_id=client-123"))
        .and(body_string_contains("scope=repo%2Cread%3Aorg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "D",
            "user_code": "ABCD-1234",
            "verification_uri": "https://github.com/login/device",
            "expires_in": 900,
            "interval": 5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let authorization = device_flow(&server)
        .begin(&["repo", "read:org"])
        .await
        .expect("begin device flow");

    assert_eq!(authorization.device_code, "D");
    assert_eq!(authorization.user_code, "ABCD-1234");
    assert_eq!(authorization.verification_uri, "https://github.com/login/device");
    assert!(authorization.verification_uri_complete.is_none());
    assert_eq!(authorization.expires_in, Duration::from_secs(900));
    assert_eq!(authorization.interval, Duration::from_secs(5));
}

#[tokio::test]
async fn begin_defaults_missing_or_non_positive_interval() {
    for interval in [json!(null), json!(0), json!(-3)] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/device/code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "device_code": "D",
                "user_code": "ABCD-1234",
                "verification_uri": "https://github.com/login/device",
                "verification_uri_complete": "https://github.com/login/device?user_code=ABCD-1234",
                "expires_in": 900,
                "interval": interval
            })))
            .mount(&server)
            .await;

        let authorization = device_flow(&server).begin(&["repo"]).await.unwrap();
        assert_eq!(authorization.interval, Duration::from_secs(5));
        assert_eq!(
            authorization.verification_uri_complete.as_deref(),
            Some("https://github.com/login/device?user_code=ABCD-1234")
        );
    }
}

#[tokio::test]
async fn begin_non_success_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/device/code"))
        .respond_with(ResponseTemplate::new(400).set_body_string("device flow disabled"))
        .mount(&server)
        .await;

    let result = device_flow(&server).begin(&["repo"]).await;
    assert!(
        matches!(result, Err(AuthError::Protocol(message)) if message.contains("device flow disabled"))
    );
}

#[tokio::test]
async fn begin_malformed_body_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/device/code"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = device_flow(&server).begin(&["repo"]).await;
    assert!(matches!(result, Err(AuthError::Protocol(_))));
}

#[tokio::test]
async fn begin_rejects_implausible_timing() {
    let cases = [
        (json!(18446744073709551615u64), json!(5)),
        (json!(900), json!(9_999_999_999i64)),
    ];
    for (expires_in, interval) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/device/code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "device_code": "D",
                "user_code": "ABCD-1234",
                "verification_uri": "https://github.com/login/device",
                "expires_in": expires_in,
                "interval": interval
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = device_flow(&server)
            .authorize(&["repo"], &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(AuthError::Protocol(_))), "{result:?}");
        server.verify().await;
    }
}

#[tokio::test]
async fn poll_sends_device_code_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(header("accept", "application/json"))
        .and(body_string_contains("client_id=client-123"))
        .and(body_string_contains("device_code=D"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Adevice_code",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ghu_xyz",
            "token_type": "bearer",
            "scope": "repo"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = device_flow(&server).poll("D").await.unwrap();
    match outcome {
        PollOutcome::Granted(credential) => assert_eq!(credential.expose(), "ghu_xyz"),
        other => panic!("expected Granted, got {other:?}"),
    }
}

#[tokio::test]
async fn poll_maps_pending_and_slow_down() {
    let server = MockServer::start().await;
    mount_token_response(&server, json!({"error": "authorization_pending"})).await;
    assert_eq!(device_flow(&server).poll("D").await.unwrap(), PollOutcome::Pending);

    let server = MockServer::start().await;
    mount_token_response(&server, json!({"error": "slow_down", "interval": 10})).await;
    assert_eq!(device_flow(&server).poll("D").await.unwrap(), PollOutcome::SlowDown);
}

#[tokio::test]
async fn poll_maps_terminal_errors() {
    let server = MockServer::start().await;
    mount_token_response(&server, json!({"error": "access_denied"})).await;
    assert_eq!(device_flow(&server).poll("D").await.unwrap(), PollOutcome::Denied);

    let server = MockServer::start().await;
    mount_token_response(&server, json!({"error": "expired_token"})).await;
    assert_eq!(device_flow(&server).poll("D").await.unwrap(), PollOutcome::Expired);
}

#[tokio::test]
async fn poll_unknown_error_is_protocol_error_with_code() {
    let server = MockServer::start().await;
    mount_token_response(&server, json!({"error": "unsupported_grant_type"})).await;

    let outcome = device_flow(&server).poll("D").await.unwrap();
    assert_eq!(
        outcome,
        PollOutcome::ProtocolError("unsupported_grant_type".to_string())
    );
}

#[tokio::test]
async fn poll_non_success_status_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = device_flow(&server).poll("D").await.unwrap();
    assert!(matches!(outcome, PollOutcome::ProtocolError(message) if message.contains("500")));
}

#[tokio::test]
async fn authorize_runs_begin_then_polls_until_granted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/device/code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "D",
            "user_code": "ABCD-1234",
            "verification_uri": "https://github.com/login/device",
            "expires_in": 900,
            "interval": 1
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_token_response(&server, json!({"access_token": "ghu_xyz"})).await;

    let credential = device_flow(&server)
        .authorize(&["repo"], &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(credential.expose(), "ghu_xyz");
    server.verify().await;
}

#[tokio::test]
async fn authorize_cancelled_before_begin_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = device_flow(&server).authorize(&["repo"], &cancel).await;

    assert!(matches!(result, Err(AuthError::Cancelled)));
    server.verify().await;
}
