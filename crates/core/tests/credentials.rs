//! Credential gate behaviour seen through the client

mod support;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use support::{client, message, MockTransport, TEST_TOKEN};
use zeropush_core::{HttpMethod, HttpResponse, TransportError};
use zeropush_domain::{AuthStatus, PushError};

const VERIFY: &str = "/verify_credentials";

#[tokio::test]
async fn test_concurrent_first_calls_share_one_check() {
    let transport = Arc::new(
        MockTransport::authenticated()
            .with_delay(Duration::from_millis(20))
            .respond_json(HttpMethod::Get, "/inactive_tokens", json!([])),
    );
    let client = client(&transport);

    let (a, b, c, d) = tokio::join!(
        client.verify_credentials(),
        client.verify_credentials(),
        client.inactive_tokens(None),
        client.inactive_tokens(Some(0)),
    );

    assert!(a.is_ok() && b.is_ok());
    assert!(c.unwrap().is_empty());
    assert!(d.unwrap().is_empty());
    assert_eq!(transport.calls_to(VERIFY), 1);
    assert_eq!(client.auth_status(), AuthStatus::Authenticated);
}

#[tokio::test]
async fn test_verification_is_idempotent() {
    let transport = Arc::new(MockTransport::authenticated());
    let client = client(&transport);
    assert_eq!(client.auth_status(), AuthStatus::Unknown);

    client.verify_credentials().await.unwrap();
    client.verify_credentials().await.unwrap();

    assert_eq!(transport.calls_to(VERIFY), 1);
    assert_eq!(client.auth_status(), AuthStatus::Authenticated);
}

#[tokio::test]
async fn test_rejected_token_stays_denied() {
    let transport = Arc::new(MockTransport::new().respond(
        HttpMethod::Get,
        VERIFY,
        HttpResponse::new(401, json!({ "message": "Resource access denied" }).to_string()),
    ));
    let client = client(&transport);

    let err = client.verify_credentials().await.unwrap_err();
    assert!(matches!(err, PushError::Unauthorized(_)));
    assert_eq!(client.auth_status(), AuthStatus::Denied);

    let err = client.unregister(&["abc"]).await.unwrap_err();
    assert!(matches!(err, PushError::Unauthorized(_)));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_unexpected_verify_message_is_denied() {
    let transport = Arc::new(MockTransport::new().respond(HttpMethod::Get, VERIFY, message("nope")));
    let client = client(&transport);

    assert!(matches!(client.verify_credentials().await, Err(PushError::Unauthorized(_))));
    assert_eq!(client.auth_status(), AuthStatus::Denied);
}

#[tokio::test]
async fn test_failed_check_is_retried() {
    let transport = Arc::new(MockTransport::new().respond_sequence(
        HttpMethod::Get,
        VERIFY,
        vec![HttpResponse::new(503, "maintenance"), message("authenticated")],
    ));
    let client = client(&transport);

    let err = client.verify_credentials().await.unwrap_err();
    assert_eq!(err, PushError::Server { status: 503, body: "maintenance".into() });
    assert_eq!(client.auth_status(), AuthStatus::Unknown);

    client.verify_credentials().await.unwrap();
    assert_eq!(client.auth_status(), AuthStatus::Authenticated);
    assert_eq!(transport.calls_to(VERIFY), 2);
}

#[tokio::test]
async fn test_transport_failure_is_not_memoized() {
    let transport = Arc::new(MockTransport::new().fail(
        HttpMethod::Get,
        VERIFY,
        TransportError::timeout("no answer within 30s"),
    ));
    let client = client(&transport);

    for _ in 0..2 {
        let err = client.verify_credentials().await.unwrap_err();
        assert!(matches!(err, PushError::Transport(_)));
    }
    assert_eq!(transport.calls_to(VERIFY), 2);
    assert_eq!(client.auth_status(), AuthStatus::Unknown);
}

#[tokio::test]
async fn test_token_travels_in_query_and_body() {
    let transport = Arc::new(
        MockTransport::authenticated()
            .respond(HttpMethod::Post, "/set_badge", message("ok"))
            .respond_json(HttpMethod::Get, "/inactive_tokens", json!([])),
    );
    let client = client(&transport);

    client.set_badge_for_device("abc", "+1").await.unwrap();
    client.inactive_tokens(Some(1_400_000_000)).await.unwrap();

    let verify = &transport.requests_to(VERIFY)[0];
    assert_eq!(verify.query[0], ("auth_token".to_string(), TEST_TOKEN.to_string()));

    let badge = &transport.requests_to("/set_badge")[0];
    assert_eq!(
        badge.body,
        Some(json!({ "device_token": "abc", "badge": "+1", "auth_token": TEST_TOKEN }))
    );

    let inactive = &transport.requests_to("/inactive_tokens")[0];
    assert_eq!(inactive.query_param("auth_token"), Some(TEST_TOKEN));
    assert_eq!(inactive.query_param("since"), Some("1400000000"));
}
