use crate::clean::Normalizer;
use crate::config::EtlConfig;
use crate::date::now_local_or_utc;
use crate::error::EtlError;
use crate::lemma::{locate_wordnet, wordnet_search_paths, Lexicon};
use crate::models::CommentRecord;
use crate::playlist::PlaylistWalker;
use crate::sink::write_csv;
use crate::stopwords::StopWords;
use crate::transform::transform;
use crate::util::{ensure_writable_dir, init_tracing_once};
use crate::youtube::CommentSource;
use std::borrow::Cow;
use std::path::PathBuf;

/// Orchestrator lifecycle. `Failed` is absorbing and records where it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Initialized,
    Extracting,
    Transforming,
    Loading,
    Done,
    Failed,
}

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub raw_records: usize,
    pub rows_written: usize,
    pub rows_dropped: usize,
}

/// Lexicon resolution: an explicit `wordnet_dir`, else the compact lexicon when
/// asked for, else the first WordNet install found in the usual places.
fn load_normalizer(config: &EtlConfig) -> Result<Cow<'static, Normalizer>, EtlError> {
    let dir = match &config.wordnet_dir {
        Some(dir) => dir.clone(),
        None if config.compact_lexicon => {
            tracing::warn!("using the compact built-in lexicon; words outside it are not lemmatized");
            return Ok(Cow::Borrowed(Normalizer::shared()));
        }
        None => locate_wordnet(wordnet_search_paths(|key| std::env::var(key).ok())).ok_or_else(|| {
            EtlError::Configuration(
                "no WordNet dictionary found: set 'wordnet_dir' (or WNSEARCHDIR), or set 'compact_lexicon' to true"
                    .into(),
            )
        })?,
    };
    let lexicon = Lexicon::from_wordnet_dir(&dir)?;
    Ok(Cow::Owned(Normalizer::new(lexicon, StopWords::english())))
}

/// Extract → transform → load over the configured playlists, strictly in order.
pub struct CommentETL<S: CommentSource> {
    config: EtlConfig,
    walker: PlaylistWalker<S>,
    normalizer: Cow<'static, Normalizer>,
    state: RunState,
    failed_in: Option<RunState>,
}

impl<S: CommentSource> CommentETL<S> {
    /// Validate the configuration, make sure the output directory is writable,
    /// and load the lexicon. Leaves the run in `Initialized`.
    pub fn new(config: EtlConfig, source: S) -> Result<Self, EtlError> {
        init_tracing_once();
        config.validate()?;
        ensure_writable_dir(&config.output_directory).map_err(|source| EtlError::Permission {
            path: config.output_directory.clone(),
            source,
        })?;

        let normalizer = load_normalizer(&config)?;
        let walker = PlaylistWalker::new(source)
            .paging(config.playlist_paging())
            .progress(config.progress);

        Ok(Self { config, walker, normalizer, state: RunState::Initialized, failed_in: None })
    }

    /// Replace the normalizer (e.g. a custom lexicon or stopword list).
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Cow::Owned(normalizer);
        self
    }

    pub fn state(&self) -> RunState { self.state }

    /// The stage that was active when the run failed.
    pub fn failed_in(&self) -> Option<RunState> { self.failed_in }

    pub fn config(&self) -> &EtlConfig { &self.config }

    /// Every configured playlist in order; any playlist failure fails the run.
    pub fn extract(&self) -> Result<Vec<CommentRecord>, EtlError> {
        let mut records = Vec::new();
        for pid in &self.config.playlist_ids {
            let rows = self
                .walker
                .walk(pid)
                .map_err(|e| EtlError::extraction(format!("playlist {}", pid), e))?;
            records.extend(rows);
        }
        tracing::info!(playlists = self.config.playlist_ids.len(), records = records.len(), "extraction complete");
        Ok(records)
    }

    /// Run every stage once. A second call after `Done` or `Failed` is refused.
    pub fn run(&mut self) -> Result<RunSummary, EtlError> {
        if self.state != RunState::Initialized {
            return Err(EtlError::Configuration(format!("run already finished in state {:?}", self.state)));
        }

        let raw = self.step(RunState::Extracting, |etl| etl.extract())?;
        let raw_records = raw.len();

        let (rows, stats) = self.step(RunState::Transforming, |etl| transform(&etl.normalizer, raw))?;

        let output = self.step(RunState::Loading, |etl| {
            write_csv(&etl.config.output_directory, &rows, now_local_or_utc())
        })?;

        self.state = RunState::Done;
        tracing::info!(path = %output.display(), rows = stats.kept, "run complete");
        Ok(RunSummary { output, raw_records, rows_written: stats.kept, rows_dropped: stats.dropped })
    }

    fn step<T>(&mut self, state: RunState, f: impl FnOnce(&Self) -> Result<T, EtlError>) -> Result<T, EtlError> {
        tracing::info!(?state, "entering stage");
        self.state = state;
        f(self).map_err(|e| self.fail(e))
    }

    fn fail(&mut self, err: EtlError) -> EtlError {
        self.failed_in = Some(self.state);
        self.state = RunState::Failed;
        tracing::error!(stage = err.stage(), error = %err, "run failed");
        err
    }
}
