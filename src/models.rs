use serde::Serialize;
use time::Date;

/// Identity of a video as listed in a playlist; every comment row inherits it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoRef {
    pub video_id: String,
    pub title: String,
    pub published_at: String, // raw API timestamp
}

/// One extracted row: a top-level comment or one of its embedded replies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub video_title: String,
    pub video_id: String,
    pub video_date: String,
    pub text: String,
    pub comment_date: String,
}

/// Output row. Dates are narrowed to calendar days; column order is the CSV header order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CleanedRecord {
    pub video_title: String,
    pub video_id: String,
    #[serde(serialize_with = "crate::date::serialize_date")]
    pub video_date: Date,
    pub text: String,
    #[serde(serialize_with = "crate::date::serialize_date")]
    pub comment_date: Date,
    pub cleaned_text: String,
    pub cleaned_text_sentiment: String,
}

impl CleanedRecord {
    /// Rows with either cleaned field empty (or whitespace only) are dropped before loading.
    pub fn has_content(&self) -> bool {
        !self.cleaned_text.trim().is_empty() && !self.cleaned_text_sentiment.trim().is_empty()
    }
}
