use crate::error::EtlError;
use crate::playlist::PlaylistPaging;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const API_KEY_ENV: &str = "YTETL_API_KEY";

/// Run configuration, read from `config.json` with defaults and builder chaining.
#[derive(Clone, Debug, Deserialize)]
pub struct EtlConfig {
    #[serde(default)]
    pub playlist_ids: Vec<String>,
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    #[serde(rename = "API_KEY", default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub wordnet_dir: Option<PathBuf>,   // WordNet dict dir; searched for when None
    #[serde(default)]
    pub compact_lexicon: bool,          // use the compiled-in lexicon instead of WordNet
    #[serde(default)]
    pub paginate_playlists: bool,       // false keeps the first page only (≤ 50 videos)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_progress")]
    pub progress: bool,
}

fn default_output_directory() -> PathBuf { PathBuf::from(DEFAULT_OUTPUT_DIR) }
fn default_api_base_url() -> String { DEFAULT_API_BASE_URL.to_string() }
fn default_progress() -> bool { true }

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            playlist_ids: Vec::new(),
            output_directory: default_output_directory(),
            api_key: None,
            wordnet_dir: None,
            compact_lexicon: false,
            paginate_playlists: false,
            api_base_url: default_api_base_url(),
            progress: true,
        }
    }
}

impl EtlConfig {
    /// Read and parse the JSON config document, then apply env overrides.
    /// Does not validate; call [`EtlConfig::validate`] before running.
    pub fn load(path: &Path) -> Result<Self, EtlError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            EtlError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut cfg = Self::from_json(&raw)?;
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_json(raw: &str) -> Result<Self, EtlError> {
        serde_json::from_str(raw).map_err(|e| {
            EtlError::Configuration(format!("config contains invalid JSON: {}", e))
        })
    }

    /// `YTETL_API_KEY` takes precedence over the `API_KEY` field when set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            let key = key.trim();
            if !key.is_empty() {
                self.api_key = Some(key.to_string());
            }
        }
    }

    /// Field-level checks. Output directory writability is checked by the orchestrator.
    pub fn validate(&self) -> Result<(), EtlError> {
        if self.playlist_ids.is_empty() {
            return Err(EtlError::Configuration("missing required key 'playlist_ids'".into()));
        }
        if let Some(pos) = self.playlist_ids.iter().position(|id| id.trim().is_empty()) {
            return Err(EtlError::Configuration(format!("playlist_ids[{}] is empty", pos)));
        }
        if self.output_directory.as_os_str().is_empty() {
            return Err(EtlError::Configuration("output_directory is empty".into()));
        }
        Ok(())
    }

    /// The API key, or a configuration error naming both places it can come from.
    pub fn require_api_key(&self) -> Result<&str, EtlError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(k) if !k.is_empty() => Ok(k),
            _ => Err(EtlError::Configuration(format!(
                "missing required key 'API_KEY' (or env {})",
                API_KEY_ENV
            ))),
        }
    }

    pub fn playlist_paging(&self) -> PlaylistPaging {
        if self.paginate_playlists { PlaylistPaging::Exhaustive } else { PlaylistPaging::FirstPage }
    }

    pub fn with_playlist_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.playlist_ids = ids.into_iter().map(Into::into).collect();
        self
    }
    pub fn with_output_directory(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_directory = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
    pub fn with_wordnet_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.wordnet_dir = Some(dir.as_ref().to_path_buf());
        self
    }
    pub fn with_compact_lexicon(mut self, yes: bool) -> Self {
        self.compact_lexicon = yes;
        self
    }
    pub fn with_paginate_playlists(mut self, yes: bool) -> Self {
        self.paginate_playlists = yes;
        self
    }
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
}
