use crate::comments::extract_comments;
use crate::error::EtlError;
use crate::models::{CommentRecord, VideoRef};
use crate::progress::ProgressScope;
use crate::youtube::{CommentSource, PlaylistItem, PLAYLIST_PAGE_SIZE};

/// How far to follow a playlist's own pagination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlaylistPaging {
    /// First page only (at most 50 videos). Later pages are logged and skipped.
    #[default]
    FirstPage,
    /// Follow continuation tokens until the playlist is exhausted.
    Exhaustive,
}

/// Walks every video in a playlist and concatenates their comment records in playlist order.
pub struct PlaylistWalker<S: CommentSource> {
    source: S,
    paging: PlaylistPaging,
    progress: bool,
}

impl<S: CommentSource> PlaylistWalker<S> {
    pub fn new(source: S) -> Self {
        Self { source, paging: PlaylistPaging::default(), progress: false }
    }
    pub fn paging(mut self, paging: PlaylistPaging) -> Self { self.paging = paging; self }
    pub fn progress(mut self, yes: bool) -> Self { self.progress = yes; self }

    pub fn source(&self) -> &S { &self.source }

    /// Videos in playlist API order, subject to the paging policy.
    pub fn list_videos(&self, playlist_id: &str) -> Result<Vec<VideoRef>, EtlError> {
        let mut videos = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self
                .source
                .playlist_items(playlist_id, token.as_deref())
                .map_err(|e| EtlError::extraction(format!("playlist items for {}", playlist_id), e))?;
            videos.extend(page.items.iter().map(video_ref));

            token = page.next_page_token.filter(|t| !t.is_empty());
            match (token.is_some(), self.paging) {
                (false, _) => break,
                (true, PlaylistPaging::Exhaustive) => continue,
                (true, PlaylistPaging::FirstPage) => {
                    tracing::warn!(
                        playlist_id,
                        kept = videos.len(),
                        page_size = PLAYLIST_PAGE_SIZE,
                        "playlist has more videos than one page; remaining pages skipped"
                    );
                    break;
                }
            }
        }
        Ok(videos)
    }

    /// Comment records of every listed video, concatenated in playlist order.
    /// The first failing video aborts the whole playlist.
    pub fn walk(&self, playlist_id: &str) -> Result<Vec<CommentRecord>, EtlError> {
        let videos = self.list_videos(playlist_id)?;
        tracing::info!(playlist_id, videos = videos.len(), "walking playlist");

        let pb = ProgressScope::count_if(self.progress, format!("playlist {}", playlist_id), videos.len() as u64);
        let mut records = Vec::new();
        for video in &videos {
            tracing::info!(video_id = %video.video_id, title = %video.title, "extracting video comments");
            match extract_comments(&self.source, video) {
                Ok(rows) => records.extend(rows),
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            }
            pb.inc_items(1);
            tracing::debug!(playlist_id, total = records.len(), "running comment count");
        }
        pb.finish(format!("{} comments", records.len()));
        tracing::info!(playlist_id, comments = records.len(), "playlist extraction complete");
        Ok(records)
    }
}

fn video_ref(item: &PlaylistItem) -> VideoRef {
    VideoRef {
        video_id: item.content_details.video_id.clone(),
        title: item.snippet.title.clone(),
        published_at: item.snippet.published_at.clone(),
    }
}
