use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY is not set; create a .env file or export the variable")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode completion body: {source}\n  body: {body}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("completion contained no text")]
    EmptyCompletion,
}
