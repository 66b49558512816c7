use std::future::Future;
use std::time::Duration;

use crate::types::{ApiErrorBody, ChatRequest, ChatResponse};
use crate::{LlmError, Result, DEFAULT_BASE_URL, DEFAULT_MODEL};

// ─── TextGenerator ────────────────────────────────────────────────────────

/// The seam every role runner talks to.
///
/// Implementations never fail past this boundary: any error is logged and
/// surfaces as `None`, which callers treat as "no answer".
pub trait TextGenerator {
    fn generate(&self, prompt: &str, model: Option<&str>) -> impl Future<Output = Option<String>>;
}

// ─── ClientConfig ─────────────────────────────────────────────────────────

/// Connection settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bearer credential. `None` is allowed: every call then fails loudly.
    pub api_key: Option<String>,
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Model used when a call does not name one.
    pub default_model: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ClientConfig {
    /// Build from `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `COUNCIL_MODEL` and
    /// `COUNCIL_TIMEOUT_SECS`. Unset or blank variables fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        let timeout = get("COUNCIL_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        Self {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            default_model: get("COUNCIL_MODEL").unwrap_or(defaults.default_model),
            timeout,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

// ─── GenerationClient ─────────────────────────────────────────────────────

/// Chat-completions client. One prompt in, one text out.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GenerationClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.is_none() {
            tracing::error!(
                "OPENAI_API_KEY is not set; every generation call will return no answer"
            );
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `prompt` as a single user turn and return the first choice's text.
    pub async fn complete(&self, prompt: &str, model: Option<&str>) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingCredential)?;
        let model = model.unwrap_or(&self.config.default_model);
        let request = ChatRequest::single_turn(model, prompt);

        tracing::info!(model, prompt_chars = prompt.len(), "calling text generation");
        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|source| LlmError::Decode { body, source })?;
        let text = parsed.first_text().ok_or(LlmError::EmptyCompletion)?;
        tracing::info!(model, "text generation succeeded");
        Ok(text.to_string())
    }
}

impl TextGenerator for GenerationClient {
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Option<String> {
        match self.complete(prompt, model).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::error!(error = %e, "text generation failed");
                None
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
