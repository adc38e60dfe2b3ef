//! Typed wire model for the two YouTube Data API v3 list endpoints, the
//! `CommentSource` seam the walkers page through, and the blocking HTTP client.

use crate::error::EtlError;
use reqwest::blocking::Client;
use serde::Deserialize;

pub const PLAYLIST_PAGE_SIZE: u32 = 50;
pub const COMMENT_PAGE_SIZE: u32 = 100;

// ----------------------------- playlistItems.list -----------------------------

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub title: String,
    pub published_at: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: String,
}

// ----------------------------- commentThreads.list -----------------------------

/// ThreadPage → [CommentThread → top-level Comment, [reply Comment]]
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadPage {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommentThread {
    pub snippet: CommentThreadSnippet,
    pub replies: Option<CommentThreadReplies>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    pub top_level_comment: Comment,
    #[serde(default)]
    pub total_reply_count: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommentThreadReplies {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Comment {
    pub snippet: CommentSnippet,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub text_display: String,
    pub video_id: Option<String>, // absent on channel-level comments
    pub published_at: String,
}

impl CommentThread {
    /// Replies embedded in this page, in API order. Empty unless the thread
    /// reports replies *and* the payload carries a replies collection.
    pub fn embedded_replies(&self) -> &[Comment] {
        if self.snippet.total_reply_count == 0 {
            return &[];
        }
        self.replies.as_ref().map(|r| r.comments.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

// ----------------------------- Source seam -----------------------------

/// A paginated, read-only source of playlist items and comment threads.
/// `page_token == None` requests the first page.
pub trait CommentSource {
    fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>) -> Result<PlaylistItemPage, EtlError>;
    fn comment_threads(&self, video_id: &str, page_token: Option<&str>) -> Result<CommentThreadPage, EtlError>;
}

impl<S: CommentSource + ?Sized> CommentSource for &S {
    fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>) -> Result<PlaylistItemPage, EtlError> {
        (**self).playlist_items(playlist_id, page_token)
    }
    fn comment_threads(&self, video_id: &str, page_token: Option<&str>) -> Result<CommentThreadPage, EtlError> {
        (**self).comment_threads(video_id, page_token)
    }
}

// ----------------------------- HTTP client -----------------------------

/// Blocking client for the YouTube Data API. No timeout or retry is layered
/// on top of the transport defaults.
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, EtlError> {
        let client = Client::builder()
            .user_agent(concat!("ytetl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EtlError::Configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Query parameters for `playlistItems.list` (API key excluded).
    pub fn playlist_items_query(playlist_id: &str, page_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut q = vec![
            ("part", "snippet,contentDetails".to_string()),
            ("playlistId", playlist_id.to_string()),
            ("maxResults", PLAYLIST_PAGE_SIZE.to_string()),
        ];
        if let Some(t) = page_token {
            q.push(("pageToken", t.to_string()));
        }
        q
    }

    /// Query parameters for `commentThreads.list` (API key excluded).
    /// Only the first page pins `maxResults`; continuations inherit the API default.
    pub fn comment_threads_query(video_id: &str, page_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut q = vec![
            ("part", "snippet,replies".to_string()),
            ("videoId", video_id.to_string()),
            ("order", "relevance".to_string()),
        ];
        match page_token {
            None => q.push(("maxResults", COMMENT_PAGE_SIZE.to_string())),
            Some(t) => q.push(("pageToken", t.to_string())),
        }
        q
    }

    fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str, query: Vec<(&'static str, String)>) -> Result<T, EtlError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%endpoint, ?query, "API request");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .map_err(|e| EtlError::extraction(format!("{} request failed", endpoint), e))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| EtlError::extraction(format!("{} response unreadable", endpoint), e))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|env| format!("{} {}", env.error.code, env.error.message))
                .unwrap_or_else(|_| status.to_string());
            return Err(EtlError::extraction_msg(format!("{} returned {}", endpoint, detail)));
        }

        serde_json::from_str(&body)
            .map_err(|e| EtlError::extraction(format!("{} response malformed", endpoint), e))
    }
}

impl CommentSource for YouTubeClient {
    fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>) -> Result<PlaylistItemPage, EtlError> {
        self.get("playlistItems", Self::playlist_items_query(playlist_id, page_token))
    }

    fn comment_threads(&self, video_id: &str, page_token: Option<&str>) -> Result<CommentThreadPage, EtlError> {
        self.get("commentThreads", Self::comment_threads_query(video_id, page_token))
    }
}
