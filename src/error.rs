//! Error taxonomy for the run. Every variant names the stage that failed and
//! keeps the underlying cause reachable through `source()`.

use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum EtlError {
    /// Missing or invalid configuration fields, or a malformed config document.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Output location cannot be created or written.
    #[error("output location {} is not writable", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any failure while talking to the comment API (transport, status, decoding).
    #[error("extraction failed: {context}")]
    Extraction {
        context: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Failure while normalizing a record.
    #[error("transformation failed: {context}")]
    Transformation {
        context: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Failure while serializing rows or promoting the output file.
    #[error("failed to write output {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl EtlError {
    pub fn extraction(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        EtlError::Extraction { context: context.into(), source: Some(source.into()) }
    }

    pub fn extraction_msg(context: impl Into<String>) -> Self {
        EtlError::Extraction { context: context.into(), source: None }
    }

    pub fn transformation(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        EtlError::Transformation { context: context.into(), source: Some(source.into()) }
    }

    /// Short stage label used in the failure report.
    pub fn stage(&self) -> &'static str {
        match self {
            EtlError::Configuration(_) => "configuration",
            EtlError::Permission { .. } => "configuration",
            EtlError::Extraction { .. } => "extraction",
            EtlError::Transformation { .. } => "transformation",
            EtlError::Load { .. } => "load",
        }
    }
}
