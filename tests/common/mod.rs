#![allow(dead_code)]

use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use ytetl::{CommentSource, CommentThreadPage, EtlError, PlaylistItemPage};

/// One request the scripted source received, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Playlist(String, Option<String>),
    Threads(String, Option<String>),
}

type PageKey = (String, Option<String>);

/// In-memory stand-in for the comment API. Pages are keyed by
/// `(id, page_token)`; unscripted requests fail like a transport error would.
#[derive(Default)]
pub struct ScriptedSource {
    playlists: HashMap<PageKey, Value>,
    threads: HashMap<PageKey, Value>,
    failing: HashSet<PageKey>,
    calls: RefCell<Vec<Call>>,
}

fn key(id: &str, token: Option<&str>) -> PageKey {
    (id.to_string(), token.map(str::to_string))
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playlist_page(mut self, playlist_id: &str, token: Option<&str>, page: Value) -> Self {
        self.playlists.insert(key(playlist_id, token), page);
        self
    }

    pub fn thread_page(mut self, video_id: &str, token: Option<&str>, page: Value) -> Self {
        self.threads.insert(key(video_id, token), page);
        self
    }

    pub fn fail_threads(mut self, video_id: &str, token: Option<&str>) -> Self {
        self.failing.insert(key(video_id, token));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn thread_calls(&self, video_id: &str) -> Vec<Option<String>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Threads(v, t) if v == video_id => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn playlist_calls(&self) -> usize {
        self.calls.borrow().iter().filter(|c| matches!(c, Call::Playlist(..))).count()
    }
}

impl CommentSource for ScriptedSource {
    fn playlist_items(&self, playlist_id: &str, page_token: Option<&str>) -> Result<PlaylistItemPage, EtlError> {
        self.calls.borrow_mut().push(Call::Playlist(playlist_id.to_string(), page_token.map(str::to_string)));
        let page = self
            .playlists
            .get(&key(playlist_id, page_token))
            .ok_or_else(|| EtlError::extraction_msg(format!("no scripted playlist page {} {:?}", playlist_id, page_token)))?;
        serde_json::from_value(page.clone()).map_err(|e| EtlError::extraction("malformed playlist page", e))
    }

    fn comment_threads(&self, video_id: &str, page_token: Option<&str>) -> Result<CommentThreadPage, EtlError> {
        self.calls.borrow_mut().push(Call::Threads(video_id.to_string(), page_token.map(str::to_string)));
        if self.failing.contains(&key(video_id, page_token)) {
            return Err(EtlError::extraction_msg(format!("commentThreads returned 403 for {}", video_id)));
        }
        let page = self
            .threads
            .get(&key(video_id, page_token))
            .ok_or_else(|| EtlError::extraction_msg(format!("no scripted thread page {} {:?}", video_id, page_token)))?;
        serde_json::from_value(page.clone()).map_err(|e| EtlError::extraction("malformed thread page", e))
    }
}

// ----------------------------- JSON builders -----------------------------

pub fn comment(text: &str, video_id: &str, published_at: &str) -> Value {
    json!({
        "kind": "youtube#comment",
        "snippet": {
            "textDisplay": text,
            "textOriginal": text,
            "videoId": video_id,
            "publishedAt": published_at,
            "likeCount": 0
        }
    })
}

/// A thread; `replies: None` leaves the `replies` field out of the payload.
pub fn thread(top: Value, total_reply_count: u32, replies: Option<Vec<Value>>) -> Value {
    let mut t = json!({
        "kind": "youtube#commentThread",
        "snippet": {
            "topLevelComment": top,
            "totalReplyCount": total_reply_count,
            "canReply": true
        }
    });
    if let Some(r) = replies {
        t["replies"] = json!({ "comments": r });
    }
    t
}

pub fn thread_page(items: Vec<Value>, next: Option<&str>) -> Value {
    let mut p = json!({ "kind": "youtube#commentThreadListResponse", "items": items });
    if let Some(n) = next {
        p["nextPageToken"] = json!(n);
    }
    p
}

pub fn playlist_item(video_id: &str, title: &str, published_at: &str) -> Value {
    json!({
        "kind": "youtube#playlistItem",
        "snippet": { "title": title, "publishedAt": published_at, "position": 0 },
        "contentDetails": { "videoId": video_id, "videoPublishedAt": published_at }
    })
}

pub fn playlist_page(items: Vec<Value>, next: Option<&str>) -> Value {
    let mut p = json!({ "kind": "youtube#playlistItemListResponse", "items": items });
    if let Some(n) = next {
        p["nextPageToken"] = json!(n);
    }
    p
}

// ----------------------------- WordNet fixture -----------------------------

/// Writes a WordNet `dict/` layout into `dir`: an `index.<pos>` file per part of
/// speech (indented license header, one line per lemma) and the three `.exc` files.
pub fn write_wordnet(dir: &Path, nouns: &[&str], verbs: &[&str], adjectives: &[&str], verb_exc: &str) {
    for (pos, tag, lemmas) in [("noun", "n", nouns), ("verb", "v", verbs), ("adj", "a", adjectives)] {
        let mut index = String::from("  1 This software and database is being provided to you, the LICENSEE\n");
        for lemma in lemmas {
            index.push_str(&format!("{} {} 1 0 1 0 00000000\n", lemma, tag));
        }
        fs::write(dir.join(format!("index.{}", pos)), index).unwrap();
    }
    fs::write(dir.join("noun.exc"), "").unwrap();
    fs::write(dir.join("verb.exc"), verb_exc).unwrap();
    fs::write(dir.join("adj.exc"), "").unwrap();
}
