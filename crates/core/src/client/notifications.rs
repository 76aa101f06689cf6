//! Notify and broadcast operations

use std::str::FromStr;

use serde_json::Value;
use tracing::{info, instrument};
use zeropush_common::validation::SchemaName;
use zeropush_domain::{
    BroadcastResponse, FanOutResult, Notification, NotifyResponse, Platform, PushError, Result,
};

use super::{segment, to_strings, PushClient};
use crate::encoder::encode_notification;
use crate::fanout::{channel_keys, fan_out};
use crate::ports::HttpRequest;

const NOTIFY_PATH: &str = "/notify";
const BROADCAST_PATH: &str = "/broadcast";

fn payload_schema(platform: Platform) -> (SchemaName, &'static str) {
    match platform {
        Platform::Android => {
            (SchemaName::AndroidNotification, "Invalid Android notification object")
        }
        Platform::IosMacos => {
            (SchemaName::IosMacosNotification, "Invalid iOS or MacOS notification object")
        }
        Platform::Safari => (SchemaName::SafariNotification, "Invalid Safari notification object"),
    }
}

fn typed_payload(notification: &Notification) -> Result<Value> {
    notification.to_payload().map_err(|e| {
        PushError::invalid_payload(format!("Notification is not valid JSON: {e}"), Vec::new())
    })
}

impl PushClient {
    /// Send `notification` to specific devices.
    #[instrument(
        skip(self, notification, device_tokens),
        fields(platform = %notification.platform(), count = device_tokens.len())
    )]
    pub async fn notify<S: AsRef<str>>(
        &self,
        notification: &Notification,
        device_tokens: &[S],
    ) -> Result<NotifyResponse> {
        let payload = typed_payload(notification)?;
        self.notify_payload(notification.platform(), &to_strings(device_tokens), payload).await
    }

    /// Send an untyped payload to specific devices, selecting the platform
    /// by its wire key (`android`, `ios_macos`, `safari`).
    ///
    /// # Errors
    ///
    /// [`PushError::UnknownPlatformType`] for any other key, before any
    /// other check or network call.
    #[instrument(skip(self, device_tokens, payload), fields(count = device_tokens.len()))]
    pub async fn notify_platform<S: AsRef<str>>(
        &self,
        platform: &str,
        device_tokens: &[S],
        payload: Value,
    ) -> Result<NotifyResponse> {
        if !self.validator.is_valid(&Value::from(platform), SchemaName::Platform) {
            return Err(PushError::UnknownPlatformType(platform.to_string()));
        }
        let platform = Platform::from_str(platform).map_err(PushError::UnknownPlatformType)?;

        self.notify_payload(platform, &to_strings(device_tokens), payload).await
    }

    async fn notify_payload(
        &self,
        platform: Platform,
        device_tokens: &[String],
        payload: Value,
    ) -> Result<NotifyResponse> {
        self.check_tokens(device_tokens)?;
        let (schema, message) = payload_schema(platform);
        self.check(&payload, schema, message)?;

        self.gate.verify(&self.executor).await?;

        let body = encode_notification(platform, &payload, Some(device_tokens))?;
        let response: NotifyResponse =
            self.send(HttpRequest::post(NOTIFY_PATH).with_body(body)).await?;

        info!(
            sent = response.sent_count,
            inactive = response.inactive_tokens.len(),
            unregistered = response.unregistered_tokens.len(),
            "Notification sent"
        );
        Ok(response)
    }

    /// Send `notification` to every registered device.
    #[instrument(skip(self, notification), fields(platform = %notification.platform()))]
    pub async fn broadcast_to_all(&self, notification: &Notification) -> Result<BroadcastResponse> {
        let payload = self.broadcast_payload(notification)?;
        self.gate.verify(&self.executor).await?;

        let response: BroadcastResponse =
            self.send(HttpRequest::post(BROADCAST_PATH).with_body(payload)).await?;
        info!(sent = response.sent_count, "Broadcast sent to all devices");
        Ok(response)
    }

    /// Send `notification` to the devices subscribed to `channel`.
    #[instrument(skip(self, notification), fields(platform = %notification.platform()))]
    pub async fn broadcast_to_channel(
        &self,
        channel: &str,
        notification: &Notification,
    ) -> Result<BroadcastResponse> {
        self.check_channel(channel)?;
        let payload = self.broadcast_payload(notification)?;
        self.gate.verify(&self.executor).await?;

        self.broadcast_one(channel, payload).await
    }

    /// Broadcast `notification` to each channel independently.
    #[instrument(skip(self, channels, notification), fields(count = channels.len()))]
    pub async fn broadcast_to_channels<S: AsRef<str>>(
        &self,
        channels: &[S],
        notification: &Notification,
    ) -> Result<FanOutResult<BroadcastResponse>> {
        let channels = to_strings(channels);
        self.check_channels(&channels)?;
        let payload = self.broadcast_payload(notification)?;
        self.gate.verify(&self.executor).await?;

        let payload = &payload;
        Ok(fan_out(channel_keys(&channels), self.fan_out_concurrency, |key| async move {
            let channel = key.channel_name().unwrap_or_default();
            self.broadcast_one(channel, payload.clone()).await
        })
        .await)
    }

    async fn broadcast_one(&self, channel: &str, payload: Value) -> Result<BroadcastResponse> {
        let path = format!("{BROADCAST_PATH}/{}", segment(channel));
        let response: BroadcastResponse =
            self.send(HttpRequest::post(path).with_body(payload)).await?;
        info!(channel, sent = response.sent_count, "Broadcast sent to channel");
        Ok(response)
    }

    /// Validate and encode a broadcast body
    fn broadcast_payload(&self, notification: &Notification) -> Result<Value> {
        let platform = notification.platform();
        let payload = typed_payload(notification)?;
        let (schema, message) = payload_schema(platform);
        self.check(&payload, schema, message)?;
        encode_notification(platform, &payload, None)
    }
}
