//! WordNet-style morphological lemmatizer.
//!
//! For a word and a part of speech: if the word is a listed exception, the
//! candidates are the word and its exception bases; otherwise the candidates
//! are the word and every suffix-detachment result for that part of speech.
//! Candidates absent from the lexicon are discarded and the shortest survivor
//! wins (earliest on ties). Unknown words come back unchanged.

use crate::error::EtlError;
use ahash::{AHashMap, AHashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
}

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""), ("ses", "s"), ("ves", "f"), ("xes", "x"), ("zes", "z"),
    ("ches", "ch"), ("shes", "sh"), ("men", "man"), ("ies", "y"),
];
const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""), ("ies", "y"), ("es", "e"), ("es", ""),
    ("ed", "e"), ("ed", ""), ("ing", "e"), ("ing", ""),
];
const ADJ_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 3] = [PartOfSpeech::Noun, PartOfSpeech::Verb, PartOfSpeech::Adjective];

    /// File-name stem used by WordNet (`index.adj`, `adj.exc`, ...).
    pub fn wordnet_name(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adj",
        }
    }

    fn rules(self) -> &'static [(&'static str, &'static str)] {
        match self {
            PartOfSpeech::Noun => NOUN_RULES,
            PartOfSpeech::Verb => VERB_RULES,
            PartOfSpeech::Adjective => ADJ_RULES,
        }
    }

    fn slot(self) -> usize {
        match self {
            PartOfSpeech::Noun => 0,
            PartOfSpeech::Verb => 1,
            PartOfSpeech::Adjective => 2,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct PosTable {
    lemmas: AHashSet<String>,
    exceptions: AHashMap<String, Vec<String>>,
}

/// Lemma sets and exception lists for nouns, verbs and adjectives.
/// Built once per run and shared read-only.
#[derive(Clone, Debug, Default)]
pub struct Lexicon {
    tables: [PosTable; 3],
}

const BUILTIN: [(PartOfSpeech, &str, &str); 3] = [
    (
        PartOfSpeech::Noun,
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/lexicon/noun.txt")),
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/lexicon/noun.exc")),
    ),
    (
        PartOfSpeech::Verb,
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/lexicon/verb.txt")),
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/lexicon/verb.exc")),
    ),
    (
        PartOfSpeech::Adjective,
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/lexicon/adj.txt")),
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/lexicon/adj.exc")),
    ),
];

impl Lexicon {
    /// Small lexicon compiled into the binary: common English plus comment
    /// vocabulary. Words outside it pass through unlemmatized, so runs use a
    /// WordNet dictionary unless this is asked for explicitly.
    pub fn compact() -> Self {
        let mut lex = Self::default();
        for (pos, lemmas, exc) in BUILTIN {
            for word in lemmas.lines().filter(|l| !l.trim_start().starts_with('#')).flat_map(str::split_whitespace) {
                lex.insert_lemma(pos, word);
            }
            lex.load_exceptions(pos, exc);
        }
        lex
    }

    /// Load `index.{noun,verb,adj}` and `{noun,verb,adj}.exc` from a WordNet `dict/` directory.
    /// Multi-word lemmas (`ice_cream`) are skipped since tokens never contain underscores here.
    pub fn from_wordnet_dir(dir: &Path) -> Result<Self, EtlError> {
        let read = |name: String| -> Result<String, EtlError> {
            let path = dir.join(&name);
            fs::read_to_string(&path)
                .map_err(|e| EtlError::Configuration(format!("cannot read WordNet file {}: {}", path.display(), e)))
        };

        let mut lex = Self::default();
        for pos in PartOfSpeech::ALL {
            let index = read(format!("index.{}", pos.wordnet_name()))?;
            for line in index.lines() {
                // license header lines are indented
                if line.starts_with(' ') || line.is_empty() {
                    continue;
                }
                if let Some(lemma) = line.split_whitespace().next() {
                    if !lemma.contains('_') {
                        lex.insert_lemma(pos, lemma);
                    }
                }
            }
            let exc = read(format!("{}.exc", pos.wordnet_name()))?;
            lex.load_exceptions(pos, &exc);
        }
        tracing::info!(
            dir = %dir.display(),
            nouns = lex.len(PartOfSpeech::Noun),
            verbs = lex.len(PartOfSpeech::Verb),
            adjectives = lex.len(PartOfSpeech::Adjective),
            "WordNet lexicon loaded"
        );
        Ok(lex)
    }

    fn load_exceptions(&mut self, pos: PartOfSpeech, text: &str) {
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            if let Some(inflected) = fields.next() {
                let bases: Vec<&str> = fields.collect();
                if !bases.is_empty() {
                    self.insert_exception(pos, inflected, &bases);
                }
            }
        }
    }

    pub fn insert_lemma(&mut self, pos: PartOfSpeech, lemma: &str) {
        self.tables[pos.slot()].lemmas.insert(lemma.to_lowercase());
    }

    pub fn insert_exception(&mut self, pos: PartOfSpeech, inflected: &str, bases: &[&str]) {
        let entry = self.tables[pos.slot()].exceptions.entry(inflected.to_lowercase()).or_default();
        entry.extend(bases.iter().map(|b| b.to_lowercase()));
    }

    pub fn contains(&self, pos: PartOfSpeech, word: &str) -> bool {
        self.tables[pos.slot()].lemmas.contains(word)
    }

    pub fn len(&self, pos: PartOfSpeech) -> usize {
        self.tables[pos.slot()].lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|t| t.lemmas.is_empty())
    }

    /// Every lexicon-valid base form of `word`, in candidate order, deduplicated.
    pub fn base_forms(&self, word: &str, pos: PartOfSpeech) -> Vec<String> {
        let table = &self.tables[pos.slot()];
        let mut forms = vec![word.to_string()];
        match table.exceptions.get(word) {
            Some(bases) => forms.extend(bases.iter().cloned()),
            None => {
                for (old, new) in pos.rules() {
                    if let Some(stem) = word.strip_suffix(old) {
                        forms.push(format!("{}{}", stem, new));
                    }
                }
            }
        }

        let mut seen = AHashSet::new();
        forms
            .into_iter()
            .filter(|f| table.lemmas.contains(f) && seen.insert(f.clone()))
            .collect()
    }

    /// Shortest valid base form, or `word` itself when none is known.
    pub fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String {
        self.base_forms(word, pos)
            .into_iter()
            .min_by_key(|f| f.len())
            .unwrap_or_else(|| word.to_string())
    }
}

/// Conventional WordNet dictionary locations, most specific first:
/// `$WNSEARCHDIR`, `$WNHOME/dict`, each `$NLTK_DATA` entry, `~/nltk_data`,
/// the system NLTK data roots, then the Debian `wordnet-base` directory.
pub fn wordnet_search_paths(env: impl Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = env("WNSEARCHDIR") {
        paths.push(PathBuf::from(dir));
    }
    if let Some(home) = env("WNHOME") {
        paths.push(Path::new(&home).join("dict"));
    }
    if let Some(list) = env("NLTK_DATA") {
        paths.extend(std::env::split_paths(&list).map(|d| d.join("corpora").join("wordnet")));
    }
    if let Some(home) = env("HOME").or_else(|| env("USERPROFILE")) {
        paths.push(Path::new(&home).join("nltk_data").join("corpora").join("wordnet"));
    }
    for root in ["/usr/share/nltk_data", "/usr/local/share/nltk_data", "/usr/lib/nltk_data", "/usr/local/lib/nltk_data"] {
        paths.push(Path::new(root).join("corpora").join("wordnet"));
    }
    paths.push(PathBuf::from("/usr/share/wordnet"));
    paths
}

/// First candidate that holds an unpacked dictionary (`index.noun` present).
pub fn locate_wordnet<I: IntoIterator<Item = PathBuf>>(candidates: I) -> Option<PathBuf> {
    candidates.into_iter().find(|dir| dir.join("index.noun").is_file())
}
