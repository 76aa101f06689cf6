//! Channel queries and deletion

use tracing::{info, instrument};
use zeropush_domain::{ChannelInfo, FanOutResult, Result};

use super::{segment, to_strings, PushClient};
use crate::fanout::{channel_keys, fan_out};
use crate::pagination::{walk, PageRequest};
use crate::ports::HttpRequest;

const CHANNELS_PATH: &str = "/channels";

fn channel_path(channel: &str) -> String {
    format!("{CHANNELS_PATH}/{}", segment(channel))
}

impl PushClient {
    /// Names of every channel, across all pages from `pages.page` on.
    #[instrument(skip(self))]
    pub async fn list_channels(&self, pages: PageRequest) -> Result<Vec<String>> {
        self.gate.verify(&self.executor).await?;

        let channels: Vec<String> = walk(pages.cursor(self.default_per_page), |cursor| {
            self.send_with_headers(
                HttpRequest::get(CHANNELS_PATH)
                    .with_query("page", cursor.page)
                    .with_query("per_page", cursor.per_page),
            )
        })
        .await?;

        info!(count = channels.len(), "Listed channels");
        Ok(channels)
    }

    /// A channel and the device tokens subscribed to it.
    #[instrument(skip(self))]
    pub async fn channel(&self, channel: &str) -> Result<ChannelInfo> {
        self.check_channel(channel)?;
        self.gate.verify(&self.executor).await?;

        self.send(HttpRequest::get(channel_path(channel))).await
    }

    #[instrument(skip(self))]
    pub async fn delete_channel(&self, channel: &str) -> Result<ChannelInfo> {
        self.check_channel(channel)?;
        self.gate.verify(&self.executor).await?;

        self.delete_one(channel).await
    }

    /// Delete each channel independently.
    #[instrument(skip(self, channels), fields(count = channels.len()))]
    pub async fn delete_channels<S: AsRef<str>>(
        &self,
        channels: &[S],
    ) -> Result<FanOutResult<ChannelInfo>> {
        let channels = to_strings(channels);
        self.check_channels(&channels)?;
        self.gate.verify(&self.executor).await?;

        Ok(fan_out(channel_keys(&channels), self.fan_out_concurrency, |key| async move {
            self.delete_one(key.channel_name().unwrap_or_default()).await
        })
        .await)
    }

    async fn delete_one(&self, channel: &str) -> Result<ChannelInfo> {
        let info: ChannelInfo = self.send(HttpRequest::delete(channel_path(channel))).await?;
        info!(channel, "Channel deleted");
        Ok(info)
    }
}
