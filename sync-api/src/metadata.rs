/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

use std::time::Duration;

use serde::Deserialize;

use crate::constants::METADATA_FETCH_TIMEOUT;
use crate::ids::default_thumbnail_for;

/// Title and thumbnail for a provider video, resolved out-of-band so the
/// room's synchronous state mutation never has to await anything itself.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMeta {
    pub title: String,
    pub thumbnail: String,
}

impl VideoMeta {
    pub fn fallback(provider_ref: &str) -> Self {
        VideoMeta {
            title: "Unknown Video".to_string(),
            thumbnail: default_thumbnail_for(provider_ref),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
}

/// Fetches display metadata for a provider video id. A plain `async fn`
/// would be enough, but the trait seam lets tests swap in a canned
/// implementation instead of hitting the network.
#[async_trait::async_trait]
pub trait MetadataOracle: Send + Sync {
    async fn fetch(&self, provider_ref: &str) -> VideoMeta;
}

/// YouTube oEmbed-backed oracle; any non-200 response or timeout falls back
/// to a generic title and the default thumbnail rather than failing the
/// `add_video` call.
pub struct OEmbedOracle {
    client: reqwest::Client,
}

impl OEmbedOracle {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(METADATA_FETCH_TIMEOUT)
            .build()
            .expect("reqwest client builds");
        OEmbedOracle { client }
    }
}

impl Default for OEmbedOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MetadataOracle for OEmbedOracle {
    async fn fetch(&self, provider_ref: &str) -> VideoMeta {
        let url = format!(
            "https://www.youtube.com/oembed?url=https://www.youtube.com/watch?v={provider_ref}&format=json"
        );
        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<OEmbedResponse>().await {
                Ok(body) => VideoMeta {
                    title: body.title.unwrap_or_else(|| "Unknown Video".to_string()),
                    thumbnail: body
                        .thumbnail_url
                        .unwrap_or_else(|| default_thumbnail_for(provider_ref)),
                },
                Err(_) => VideoMeta::fallback(provider_ref),
            },
            _ => VideoMeta::fallback(provider_ref),
        }
    }
}

/// Oracle used in tests: returns a fixed, deterministic title/thumbnail
/// after an optional artificial delay, without touching the network.
pub struct StaticOracle {
    pub delay: Duration,
}

impl Default for StaticOracle {
    fn default() -> Self {
        StaticOracle {
            delay: Duration::from_millis(0),
        }
    }
}

#[async_trait::async_trait]
impl MetadataOracle for StaticOracle {
    async fn fetch(&self, provider_ref: &str) -> VideoMeta {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        VideoMeta {
            title: format!("Video {provider_ref}"),
            thumbnail: default_thumbnail_for(provider_ref),
        }
    }
}
