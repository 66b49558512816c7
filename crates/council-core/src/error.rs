use thiserror::Error;

#[derive(Debug, Error)]
pub enum CouncilError {
    #[error("no pulse found: checked {latest} and {initial}; run 'council pulse' first")]
    PulseNotFound { latest: String, initial: String },

    #[error("invalid pulse file {path}: {source}")]
    InvalidPulse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid pulse date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid agent config {path}: {source}")]
    InvalidConfig {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("prompt template unavailable: {path}: {source}")]
    TemplateUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CouncilError>;
