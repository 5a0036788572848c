use thiserror::Error;

/// All errors produced by scribe-core.
///
/// The inference path itself never fails; these only surface when an
/// alternate knowledge base is loaded from disk or assembled by hand.
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("knowledge base is invalid: {0}")]
    InvalidKnowledgeBase(String),

    #[error("duplicate diagnosis key in knowledge base: {key}")]
    DuplicateDiagnosis { key: String },

    #[error("duplicate diagnosis label in knowledge base: {label}")]
    DuplicateLabel { label: String },

    #[error("duplicate finding in knowledge base vocabulary: {name}")]
    DuplicateFinding { name: String },

    #[error("knowledge base file not found: {path}")]
    KnowledgeBaseNotFound { path: std::path::PathBuf },

    #[error("knowledge base parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ScribeError>;
