use crate::config::YOUTUBE_API_KEY;
use crate::models::{ChannelInfo, PageTokens, SearchHit, NO_LATEST_VIDEO};
use async_trait::async_trait;
use log::info;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use thiserror::Error;

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Error)]
pub enum PlatformError {
    /// Network-level failure before a response could be decoded.
    #[error("transport failure talking to the platform: {0}")]
    Transport(#[from] reqwest::Error),
    /// The platform answered with an error envelope (quota exhaustion,
    /// invalid key, missing resource).
    #[error("platform rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::Api { status: 404, .. })
    }
}

/// One page of raw search results plus its pagination envelope.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub total_results: u64,
    pub results_per_page: Option<u32>,
    pub tokens: PageTokens,
}

#[async_trait]
pub trait CreatorSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        search_type: &str,
        results_per_page: u32,
        page_token: Option<&str>,
        region_code: &str,
    ) -> Result<SearchPage, PlatformError>;
}

#[async_trait]
pub trait ChannelLookup: Send + Sync {
    /// `Ok(None)` means the channel no longer exists or is hidden.
    async fn get_channel_info(&self, channel_id: &str)
        -> Result<Option<ChannelInfo>, PlatformError>;
}

pub struct YouTubeClient {
    http: Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new() -> Self {
        Self::with_api_key(YOUTUBE_API_KEY.clone())
    }

    pub fn with_api_key(api_key: String) -> Self {
        YouTubeClient {
            http: Client::new(),
            api_key,
        }
    }

    async fn get_json(&self, request: RequestBuilder) -> Result<Value, PlatformError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or_default();
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(PlatformError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Publish timestamp of the most recent item in a playlist, or the
    /// `"None"` sentinel when the playlist is empty or gone.
    ///
    /// Documentation: https://developers.google.com/youtube/v3/docs/playlistItems
    pub async fn get_latest_upload(&self, playlist_id: &str) -> Result<String, PlatformError> {
        let request = self
            .http
            .get(format!("{API_BASE}/playlistItems"))
            .query(&[
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", "1"),
                ("key", self.api_key.as_str()),
            ]);

        match self.get_json(request).await {
            Ok(response) => {
                let published = response["items"][0]["snippet"]["publishedAt"]
                    .as_str()
                    .map(str::to_string);
                Ok(published.unwrap_or_else(|| NO_LATEST_VIDEO.to_string()))
            }
            Err(e) if e.is_not_found() => Ok(NO_LATEST_VIDEO.to_string()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl CreatorSearch for YouTubeClient {
    /// Documentation: https://developers.google.com/youtube/v3/docs/search
    async fn search(
        &self,
        query: &str,
        search_type: &str,
        results_per_page: u32,
        page_token: Option<&str>,
        region_code: &str,
    ) -> Result<SearchPage, PlatformError> {
        let max_results = results_per_page.to_string();
        let mut request = self.http.get(format!("{API_BASE}/search")).query(&[
            ("q", query),
            ("type", search_type),
            ("part", "id,snippet"),
            ("maxResults", max_results.as_str()),
            ("order", "title"),
            ("regionCode", region_code),
            ("key", self.api_key.as_str()),
        ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = self.get_json(request).await?;

        let hits = response["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let channel_id = item["snippet"]["channelId"].as_str()?;
                        Some(SearchHit {
                            channel_id: channel_id.to_string(),
                            snippet: item["snippet"].clone(),
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        info!("Search returned {} hits", hits.len());

        Ok(SearchPage {
            hits,
            total_results: response["pageInfo"]["totalResults"].as_u64().unwrap_or(0),
            results_per_page: response["pageInfo"]["resultsPerPage"]
                .as_u64()
                .map(|v| v as u32),
            tokens: PageTokens {
                next: response["nextPageToken"].as_str().map(str::to_string),
                prev: response["prevPageToken"].as_str().map(str::to_string),
            },
        })
    }
}

#[async_trait]
impl ChannelLookup for YouTubeClient {
    /// Documentation: https://developers.google.com/youtube/v3/docs/channels
    async fn get_channel_info(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelInfo>, PlatformError> {
        let request = self.http.get(format!("{API_BASE}/channels")).query(&[
            ("part", "snippet,statistics,contentDetails"),
            ("id", channel_id),
            ("key", self.api_key.as_str()),
        ]);

        let response = self.get_json(request).await?;

        let channel = match response["items"].as_array().and_then(|array| array.first()) {
            Some(channel) => channel,
            None => {
                info!("No items in channel response for {channel_id}");
                return Ok(None);
            }
        };

        let snippet = &channel["snippet"];
        let statistics = &channel["statistics"];

        let latest_video_updated_at =
            match channel["contentDetails"]["relatedPlaylists"]["uploads"].as_str() {
                Some(playlist_id) => self.get_latest_upload(playlist_id).await?,
                None => NO_LATEST_VIDEO.to_string(),
            };

        Ok(Some(ChannelInfo {
            title: snippet["title"].as_str().unwrap_or("").to_string(),
            owner_name: snippet["customUrl"].as_str().unwrap_or("Unknown").to_string(),
            country: snippet["country"].as_str().unwrap_or("Unknown").to_string(),
            description: snippet["description"].as_str().unwrap_or("").to_string(),
            created_at: snippet["publishedAt"].as_str().unwrap_or("").to_string(),
            subscribers: statistics["subscriberCount"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
            video_count: statistics["videoCount"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
            view_count: statistics["viewCount"]
                .as_str()
                .unwrap_or("0")
                .parse()
                .unwrap_or(0),
            latest_video_updated_at,
        }))
    }
}
