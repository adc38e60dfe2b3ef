//! Comment text normalization as an explicit, ordered list of rewrite stages.
//! Each stage takes the previous stage's whole output; order is part of the contract.

use crate::lemma::{Lexicon, PartOfSpeech};
use crate::stopwords::StopWords;
use regex::Regex;
use std::sync::{LazyLock, OnceLock};

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s+(?:[^>]*?\s+)?href="([^"]*)"[^>]*>(.*?)</a>"#).expect("anchor regex")
});
static PLATFORM_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://)?(www\.)?(youtube\.com|youtu\.be)/[^\s]+").expect("platform url regex")
});
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("mention regex"));
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_, \t]").expect("punctuation regex"));
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9 \t]").expect("non-alnum regex"));
static URL_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+://\S+").expect("url token regex"));
static CHANNEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)UC[A-Za-z0-9]+").expect("channel id regex"));
static ANGLE_MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("angle markup regex"));

/// One rewrite step of a cleaning pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// `&amp;` → `&`, numeric and named HTML entities.
    DecodeEntities,
    /// Literal `<br>` → one space.
    LineBreaks,
    /// `<a href="...">label</a>` → `label`.
    AnchorText,
    /// youtube.com / youtu.be links removed.
    PlatformUrls,
    /// `@handle` removed.
    Mentions,
    /// Anything outside `[A-Za-z0-9_, \t]` removed.
    Punctuation,
    /// Anything outside `[A-Za-z0-9 \t]` removed.
    NonAlphanumeric,
    /// `scheme://...` tokens removed.
    UrlTokens,
    /// `UC` (any case) plus the alphanumerics after it removed, wherever it occurs.
    ChannelIds,
    /// Remaining `<...>` markup removed.
    AngleMarkup,
    Lowercase,
    /// Per whitespace token, re-joined with single spaces.
    Lemmatize(PartOfSpeech),
    /// Exact-match stopword tokens dropped.
    StopWords,
    Trim,
}

/// Stages shared by both pipelines: entity decoding through markup stripping.
pub const MARKUP_STAGES: [Stage; 10] = [
    Stage::DecodeEntities,
    Stage::LineBreaks,
    Stage::AnchorText,
    Stage::PlatformUrls,
    Stage::Mentions,
    Stage::Punctuation,
    Stage::NonAlphanumeric,
    Stage::UrlTokens,
    Stage::ChannelIds,
    Stage::AngleMarkup,
];

/// Topic/frequency variant: markup stages, then lowercase, verb → adjective →
/// noun lemmatization (each pass over the previous one's output), stopwords, trim.
pub const FULL_STAGES: [Stage; 16] = [
    Stage::DecodeEntities,
    Stage::LineBreaks,
    Stage::AnchorText,
    Stage::PlatformUrls,
    Stage::Mentions,
    Stage::Punctuation,
    Stage::NonAlphanumeric,
    Stage::UrlTokens,
    Stage::ChannelIds,
    Stage::AngleMarkup,
    Stage::Lowercase,
    Stage::Lemmatize(PartOfSpeech::Verb),
    Stage::Lemmatize(PartOfSpeech::Adjective),
    Stage::Lemmatize(PartOfSpeech::Noun),
    Stage::StopWords,
    Stage::Trim,
];

/// Sentiment variant: markup stages only, so case survives.
pub const SENTIMENT_STAGES: [Stage; 10] = MARKUP_STAGES;

static SHARED: OnceLock<Normalizer> = OnceLock::new();

/// Owns the lexicon and stopword list; both are read-only after construction.
#[derive(Clone, Debug)]
pub struct Normalizer {
    lexicon: Lexicon,
    stopwords: StopWords,
}

impl Normalizer {
    pub fn new(lexicon: Lexicon, stopwords: StopWords) -> Self {
        Self { lexicon, stopwords }
    }

    /// Process-wide normalizer over the compact lexicon and English stopwords,
    /// built on first use.
    pub fn shared() -> &'static Normalizer {
        SHARED.get_or_init(|| Normalizer::new(Lexicon::compact(), StopWords::english()))
    }

    pub fn lexicon(&self) -> &Lexicon { &self.lexicon }
    pub fn stopwords(&self) -> &StopWords { &self.stopwords }

    pub fn apply(&self, stage: Stage, text: &str) -> String {
        match stage {
            Stage::DecodeEntities => html_escape::decode_html_entities(text).into_owned(),
            Stage::LineBreaks => text.replace("<br>", " "),
            Stage::AnchorText => ANCHOR_RE.replace_all(text, "${2}").into_owned(),
            Stage::PlatformUrls => PLATFORM_URL_RE.replace_all(text, "").into_owned(),
            Stage::Mentions => MENTION_RE.replace_all(text, "").into_owned(),
            Stage::Punctuation => PUNCTUATION_RE.replace_all(text, "").into_owned(),
            Stage::NonAlphanumeric => NON_ALNUM_RE.replace_all(text, "").into_owned(),
            Stage::UrlTokens => URL_TOKEN_RE.replace_all(text, "").into_owned(),
            Stage::ChannelIds => CHANNEL_ID_RE.replace_all(text, "").into_owned(),
            Stage::AngleMarkup => ANGLE_MARKUP_RE.replace_all(text, "").into_owned(),
            Stage::Lowercase => text.to_lowercase(),
            Stage::Lemmatize(pos) => text
                .split_whitespace()
                .map(|t| self.lexicon.lemmatize(t, pos))
                .collect::<Vec<_>>()
                .join(" "),
            Stage::StopWords => self.stopwords.remove(text),
            Stage::Trim => text.trim().to_string(),
        }
    }

    pub fn run(&self, stages: &[Stage], text: &str) -> String {
        stages.iter().fold(text.to_string(), |acc, stage| self.apply(*stage, &acc))
    }

    /// Lowercased, lemmatized, stopword-free text for topic analysis.
    pub fn clean_text(&self, text: &str) -> String {
        self.run(&FULL_STAGES, text)
    }

    /// Markup-free text that keeps case for sentiment scoring.
    pub fn clean_text_sentiment(&self, text: &str) -> String {
        self.run(&SENTIMENT_STAGES, text)
    }
}
