//! Device registration, badges, subscriptions and device queries

use serde_json::{json, Value};
use tracing::{info, instrument};
use zeropush_common::validation::SchemaName;
use zeropush_domain::{DeviceInfo, FanOutResult, InactiveToken, MessageResponse, Result};

use super::{segment, to_strings, PushClient, RegisterOptions};
use crate::fanout::{cross_product, device_keys, fan_out};
use crate::pagination::{walk, PageRequest};
use crate::ports::{HttpMethod, HttpRequest};

const REGISTER_PATH: &str = "/register";
const UNREGISTER_PATH: &str = "/unregister";
const SET_BADGE_PATH: &str = "/set_badge";
const SUBSCRIBE_PATH: &str = "/subscribe";
const INACTIVE_TOKENS_PATH: &str = "/inactive_tokens";
const DEVICES_PATH: &str = "/devices";

const BADGE_MESSAGE: &str = "Badge parameter must be a string (ex: \"+1\")";
const SINCE_MESSAGE: &str = "Since parameter must be a non-negative integer (unix timestamp)";

fn register_request(device_token: &str, channel: Option<&str>) -> HttpRequest {
    let mut body = json!({ "device_token": device_token });
    if let Some(channel) = channel {
        body["channel"] = Value::from(channel);
    }
    HttpRequest::post(REGISTER_PATH).with_body(body)
}

fn subscription_request(method: HttpMethod, device_token: &str, channel: &str) -> HttpRequest {
    let request = HttpRequest::new(method, format!("{SUBSCRIBE_PATH}/{}", segment(channel)));
    if method.carries_body() {
        request.with_body(json!({ "device_token": device_token }))
    } else {
        request.with_query("device_token", device_token)
    }
}

fn channel_list_request(method: HttpMethod, device_token: &str, channels: &str) -> HttpRequest {
    HttpRequest::new(method, format!("{DEVICES_PATH}/{}", segment(device_token)))
        .with_body(json!({ "channel_list": channels }))
}

impl PushClient {
    /// Register one device, optionally subscribing it to `channel`.
    #[instrument(skip(self, device_token))]
    pub async fn register_device(
        &self,
        device_token: &str,
        channel: Option<&str>,
    ) -> Result<MessageResponse> {
        self.check_token(device_token)?;
        if let Some(channel) = channel {
            self.check_channel(channel)?;
        }
        self.gate.verify(&self.executor).await?;

        self.send(register_request(device_token, channel)).await
    }

    /// Register many devices. With channels, one request is sent per
    /// (token, channel) pair.
    #[instrument(skip(self, device_tokens, options), fields(count = device_tokens.len()))]
    pub async fn register<S: AsRef<str>>(
        &self,
        device_tokens: &[S],
        options: RegisterOptions,
    ) -> Result<FanOutResult<MessageResponse>> {
        let tokens = to_strings(device_tokens);
        self.check_tokens(&tokens)?;
        if let Some(channels) = &options.channels {
            self.check_channels(channels)?;
        }
        self.gate.verify(&self.executor).await?;

        let keys = match &options.channels {
            Some(channels) => cross_product(&tokens, channels),
            None => device_keys(&tokens),
        };

        let result = fan_out(keys, self.fan_out_concurrency, |key| async move {
            let token = key.device_token().unwrap_or_default();
            self.send(register_request(token, key.channel_name())).await
        })
        .await;

        info!(
            registered = result.successes.len(),
            failed = result.failures.len(),
            "Register completed"
        );
        Ok(result)
    }

    #[instrument(skip(self, device_token))]
    pub async fn unregister_device(&self, device_token: &str) -> Result<MessageResponse> {
        self.check_token(device_token)?;
        self.gate.verify(&self.executor).await?;

        self.unregister_one(device_token).await
    }

    #[instrument(skip(self, device_tokens), fields(count = device_tokens.len()))]
    pub async fn unregister<S: AsRef<str>>(
        &self,
        device_tokens: &[S],
    ) -> Result<FanOutResult<MessageResponse>> {
        let tokens = to_strings(device_tokens);
        self.check_tokens(&tokens)?;
        self.gate.verify(&self.executor).await?;

        Ok(fan_out(device_keys(&tokens), self.fan_out_concurrency, |key| async move {
            self.unregister_one(key.device_token().unwrap_or_default()).await
        })
        .await)
    }

    async fn unregister_one(&self, device_token: &str) -> Result<MessageResponse> {
        self.send(HttpRequest::delete(UNREGISTER_PATH).with_query("device_token", device_token))
            .await
    }

    /// Set the badge of one device. `badge` is absolute (`"5"`) or relative
    /// (`"+1"`, `"-1"`).
    #[instrument(skip(self, device_token))]
    pub async fn set_badge_for_device(
        &self,
        device_token: &str,
        badge: &str,
    ) -> Result<MessageResponse> {
        self.check_token(device_token)?;
        self.check(&Value::from(badge), SchemaName::Badge, BADGE_MESSAGE)?;
        self.gate.verify(&self.executor).await?;

        self.set_badge_one(device_token, badge).await
    }

    #[instrument(skip(self, device_tokens), fields(count = device_tokens.len()))]
    pub async fn set_badge<S: AsRef<str>>(
        &self,
        device_tokens: &[S],
        badge: &str,
    ) -> Result<FanOutResult<MessageResponse>> {
        let tokens = to_strings(device_tokens);
        self.check_tokens(&tokens)?;
        self.check(&Value::from(badge), SchemaName::Badge, BADGE_MESSAGE)?;
        self.gate.verify(&self.executor).await?;

        Ok(fan_out(device_keys(&tokens), self.fan_out_concurrency, |key| async move {
            self.set_badge_one(key.device_token().unwrap_or_default(), badge).await
        })
        .await)
    }

    async fn set_badge_one(&self, device_token: &str, badge: &str) -> Result<MessageResponse> {
        let body = json!({ "device_token": device_token, "badge": badge });
        self.send(HttpRequest::post(SET_BADGE_PATH).with_body(body)).await
    }

    /// Subscribe every token to every channel.
    #[instrument(skip(self, device_tokens, channels))]
    pub async fn subscribe<S: AsRef<str>, C: AsRef<str>>(
        &self,
        device_tokens: &[S],
        channels: &[C],
    ) -> Result<FanOutResult<MessageResponse>> {
        self.subscription(HttpMethod::Post, device_tokens, channels).await
    }

    /// Remove every token from every channel.
    #[instrument(skip(self, device_tokens, channels))]
    pub async fn unsubscribe<S: AsRef<str>, C: AsRef<str>>(
        &self,
        device_tokens: &[S],
        channels: &[C],
    ) -> Result<FanOutResult<MessageResponse>> {
        self.subscription(HttpMethod::Delete, device_tokens, channels).await
    }

    async fn subscription<S: AsRef<str>, C: AsRef<str>>(
        &self,
        method: HttpMethod,
        device_tokens: &[S],
        channels: &[C],
    ) -> Result<FanOutResult<MessageResponse>> {
        let tokens = to_strings(device_tokens);
        let channels = to_strings(channels);
        self.check_tokens(&tokens)?;
        self.check_channels(&channels)?;
        self.gate.verify(&self.executor).await?;

        let keys = cross_product(&tokens, &channels);
        Ok(fan_out(keys, self.fan_out_concurrency, |key| async move {
            let token = key.device_token().unwrap_or_default();
            let channel = key.channel_name().unwrap_or_default();
            self.send(subscription_request(method, token, channel)).await
        })
        .await)
    }

    /// Add `channels` to the subscriptions of each device.
    #[instrument(skip(self, device_tokens, channels))]
    pub async fn append_channel_subscriptions<S: AsRef<str>, C: AsRef<str>>(
        &self,
        device_tokens: &[S],
        channels: &[C],
    ) -> Result<FanOutResult<DeviceInfo>> {
        self.update_channel_list(HttpMethod::Patch, device_tokens, channels).await
    }

    /// Replace the subscriptions of each device with exactly `channels`.
    #[instrument(skip(self, device_tokens, channels))]
    pub async fn replace_channel_subscriptions<S: AsRef<str>, C: AsRef<str>>(
        &self,
        device_tokens: &[S],
        channels: &[C],
    ) -> Result<FanOutResult<DeviceInfo>> {
        self.update_channel_list(HttpMethod::Put, device_tokens, channels).await
    }

    async fn update_channel_list<S: AsRef<str>, C: AsRef<str>>(
        &self,
        method: HttpMethod,
        device_tokens: &[S],
        channels: &[C],
    ) -> Result<FanOutResult<DeviceInfo>> {
        let tokens = to_strings(device_tokens);
        let channels = to_strings(channels);
        self.check_tokens(&tokens)?;
        self.check_channels(&channels)?;
        self.gate.verify(&self.executor).await?;

        let channel_list = channels.join(",");
        let channel_list = channel_list.as_str();
        Ok(fan_out(device_keys(&tokens), self.fan_out_concurrency, |key| async move {
            let token = key.device_token().unwrap_or_default();
            self.send(channel_list_request(method, token, channel_list)).await
        })
        .await)
    }

    /// Tokens the service marked inactive, optionally only those since a
    /// unix timestamp. `None` or `Some(0)` lists all of them.
    #[instrument(skip(self))]
    pub async fn inactive_tokens(&self, since: Option<i64>) -> Result<Vec<InactiveToken>> {
        if let Some(since) = since {
            self.check(&Value::from(since), SchemaName::Integer, SINCE_MESSAGE)?;
        }
        self.gate.verify(&self.executor).await?;

        let mut request = HttpRequest::get(INACTIVE_TOKENS_PATH);
        if let Some(since) = since.filter(|since| *since != 0) {
            request = request.with_query("since", since);
        }

        let tokens: Vec<InactiveToken> = self.send(request).await?;
        info!(count = tokens.len(), "Fetched inactive tokens");
        Ok(tokens)
    }

    /// Every registered device, across all pages from `pages.page` on.
    #[instrument(skip(self))]
    pub async fn list_devices(&self, pages: PageRequest) -> Result<Vec<DeviceInfo>> {
        self.gate.verify(&self.executor).await?;

        let devices: Vec<DeviceInfo> = walk(pages.cursor(self.default_per_page), |cursor| {
            self.send_with_headers(
                HttpRequest::get(DEVICES_PATH)
                    .with_query("page", cursor.page)
                    .with_query("per_page", cursor.per_page),
            )
        })
        .await?;

        info!(count = devices.len(), "Listed devices");
        Ok(devices)
    }

    #[instrument(skip(self, device_token))]
    pub async fn device(&self, device_token: &str) -> Result<DeviceInfo> {
        self.check_token(device_token)?;
        self.gate.verify(&self.executor).await?;

        self.send(HttpRequest::get(format!("{DEVICES_PATH}/{}", segment(device_token)))).await
    }
}
