//! `council-llm` — the text-generation client used by every advisory role.
//!
//! The pipeline only ever needs one operation: send a single prompt string,
//! get back the generated text. This crate wraps an OpenAI-compatible
//! chat-completions endpoint behind the [`TextGenerator`] trait so callers
//! (and tests) never depend on the HTTP details.
//!
//! # Architecture
//!
//! ```text
//! ClientConfig   ← credential, base URL, default model, timeout (read once)
//!     │
//!     ▼
//! GenerationClient::complete()   ← POST {base}/chat/completions
//!     │                             typed LlmError on every failure
//!     ▼
//! TextGenerator::generate()      ← logs the error and yields None
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use council_llm::{GenerationClient, TextGenerator};
//!
//! let client = GenerationClient::from_env()?;
//! match client.generate("Say hello.", None).await {
//!     Some(text) => println!("{text}"),
//!     None => eprintln!("no answer"),
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;


pub use client::{ClientConfig, GenerationClient, TextGenerator};
pub use error::LlmError;
pub use types::{ChatMessage, ChatRequest, ChatResponse};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Default model used when neither the caller nor `COUNCIL_MODEL` names one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default OpenAI-compatible API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
