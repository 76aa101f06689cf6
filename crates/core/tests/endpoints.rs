//! Request shapes of the single-item operations

mod support;

use std::sync::Arc;

use serde_json::json;
use support::{client, message, operation_requests, MockTransport};
use zeropush_core::{HttpMethod, HttpRequest};
use zeropush_domain::{FanOutKey, Notification, SafariNotification};

fn body_field(request: &HttpRequest, field: &str) -> Option<String> {
    request.body.as_ref()?.get(field)?.as_str().map(str::to_string)
}

#[tokio::test]
async fn test_register_device_with_channel() {
    let transport = Arc::new(
        MockTransport::authenticated().respond(HttpMethod::Post, "/register", message("ok")),
    );
    let client = client(&transport);

    let response = client.register_device("abc", Some("news")).await.unwrap();
    assert_eq!(response.message.as_deref(), Some("ok"));

    let request = &transport.requests_to("/register")[0];
    assert_eq!(body_field(request, "device_token").as_deref(), Some("abc"));
    assert_eq!(body_field(request, "channel").as_deref(), Some("news"));
}

#[tokio::test]
async fn test_unregister_sends_token_in_query() {
    let transport = Arc::new(
        MockTransport::authenticated().respond(HttpMethod::Delete, "/unregister", message("ok")),
    );
    let client = client(&transport);

    let result = client.unregister(&["a", "b"]).await.unwrap();
    assert!(result.is_complete_success());

    let requests = transport.requests_to("/unregister");
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.body.is_none() && r.query_param("device_token").is_some()));
}

#[tokio::test]
async fn test_set_badge_posts_badge_string() {
    let transport = Arc::new(
        MockTransport::authenticated().respond(HttpMethod::Post, "/set_badge", message("ok")),
    );
    let client = client(&transport);

    client.set_badge_for_device("abc", "+1").await.unwrap();
    let result = client.set_badge(&["x", "y"], "5").await.unwrap();
    assert_eq!(result.successes.len(), 2);

    let requests = transport.requests_to("/set_badge");
    assert_eq!(requests.len(), 3);
    assert_eq!(body_field(&requests[0], "badge").as_deref(), Some("+1"));
    assert!(requests[1..].iter().all(|r| body_field(r, "badge").as_deref() == Some("5")));
}

#[tokio::test]
async fn test_inactive_tokens_since_filter() {
    let transport = Arc::new(MockTransport::authenticated().respond_json(
        HttpMethod::Get,
        "/inactive_tokens",
        json!([{ "device_token": "old", "marked_inactive_at": "2014-01-01T00:00:00Z" }]),
    ));
    let client = client(&transport);

    let tokens = client.inactive_tokens(Some(1_400_000_000)).await.unwrap();
    assert_eq!(tokens[0].device_token, "old");
    client.inactive_tokens(Some(0)).await.unwrap();
    client.inactive_tokens(None).await.unwrap();

    let requests = transport.requests_to("/inactive_tokens");
    assert_eq!(requests[0].query_param("since"), Some("1400000000"));
    assert_eq!(requests[1].query_param("since"), None);
    assert_eq!(requests[2].query_param("since"), None);
}

#[tokio::test]
async fn test_channel_detail_and_delete_use_encoded_path() {
    let info = json!({ "channel": "world news", "device_tokens": ["a", "b"] });
    let transport = Arc::new(
        MockTransport::authenticated()
            .respond_json(HttpMethod::Get, "/channels/world%20news", info.clone())
            .respond_json(HttpMethod::Delete, "/channels/world%20news", info),
    );
    let client = client(&transport);

    let channel = client.channel("world news").await.unwrap();
    assert_eq!(channel.device_tokens, vec!["a", "b"]);
    let deleted = client.delete_channel("world news").await.unwrap();
    assert_eq!(deleted.channel, "world news");

    let methods: Vec<_> = operation_requests(&transport).iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Delete]);
}

#[tokio::test]
async fn test_device_detail() {
    let transport = Arc::new(MockTransport::authenticated().respond_json(
        HttpMethod::Get,
        "/devices/abc",
        json!({ "token": "abc", "active": false, "badge": 3, "channels": ["news"] }),
    ));
    let client = client(&transport);

    let device = client.device("abc").await.unwrap();
    assert!(!device.active);
    assert_eq!(device.badge, Some(3));
}

#[tokio::test]
async fn test_broadcasts_omit_device_tokens() {
    let transport = Arc::new(
        MockTransport::authenticated()
            .respond_json(HttpMethod::Post, "/broadcast", json!({ "sent_count": 10 }))
            .respond_json(HttpMethod::Post, "/broadcast/news", json!({ "sent_count": 4 })),
    );
    let client = client(&transport);
    let notification = Notification::from(SafariNotification::new("Title", "Body"));

    assert_eq!(client.broadcast_to_all(&notification).await.unwrap().sent_count, 10);
    assert_eq!(client.broadcast_to_channel("news", &notification).await.unwrap().sent_count, 4);

    for request in operation_requests(&transport) {
        let body = request.body.as_ref().unwrap();
        assert!(body.get("device_tokens").is_none());
        assert_eq!(body_field(&request, "title").as_deref(), Some("Title"));
    }
}

#[tokio::test]
async fn test_delete_channels_keys_by_channel() {
    let transport = Arc::new(MockTransport::authenticated().respond_json(
        HttpMethod::Delete,
        "/channels/news",
        json!({ "channel": "news" }),
    ));
    let client = client(&transport);

    let result = client.delete_channels(&["news", "gone"]).await.unwrap();

    assert_eq!(result.successes[0].key, FanOutKey::channel("news"));
    assert_eq!(result.failures[0].key, FanOutKey::channel("gone"));
}
