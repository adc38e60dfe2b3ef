mod config;
mod date;
mod error;
mod models;

mod youtube;
mod comments;
mod playlist;

mod lemma;
mod stopwords;
mod clean;
mod transform;

mod progress;
mod sink;
mod util;
mod pipeline;

pub use crate::config::{EtlConfig, API_KEY_ENV, DEFAULT_API_BASE_URL, DEFAULT_OUTPUT_DIR};
pub use crate::error::{BoxError, EtlError};
pub use crate::models::{CleanedRecord, CommentRecord, VideoRef};
pub use crate::pipeline::{CommentETL, RunState, RunSummary};

// Extraction: wire model, source seam, HTTP client, walkers.
pub use crate::youtube::{
    Comment, CommentSnippet, CommentSource, CommentThread, CommentThreadPage, CommentThreadReplies,
    CommentThreadSnippet, PlaylistItem, PlaylistItemContentDetails, PlaylistItemPage, PlaylistItemSnippet,
    YouTubeClient, COMMENT_PAGE_SIZE, PLAYLIST_PAGE_SIZE,
};
pub use crate::comments::{extract_comments, CommentPages};
pub use crate::playlist::{PlaylistPaging, PlaylistWalker};

// Normalization building blocks, each usable on its own.
pub use crate::clean::{Normalizer, Stage, FULL_STAGES, MARKUP_STAGES, SENTIMENT_STAGES};
pub use crate::lemma::{locate_wordnet, wordnet_search_paths, Lexicon, PartOfSpeech};
pub use crate::stopwords::StopWords;
pub use crate::transform::{clean_record, drop_empty, transform, TransformStats};
pub use crate::date::{calendar_date, file_stamp, format_date};

pub use crate::sink::{reserve_output_path, write_csv, COLUMNS};
pub use crate::progress::ProgressScope;
pub use crate::util::init_tracing_once;
