//! LLM Client: the single point of entry for text completions in TalentScout.
//!
//! The backend is chosen once, when the client is built, from `ProviderSettings`.
//! Callers never see a provider failure: any error on a cloud path is logged and
//! replaced by the offline question bank (see `fallback`).

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::ProviderSettings;

pub mod azure;
pub mod fallback;
pub mod openai;

/// Sampling temperature shared by both cloud backends. Kept low for near-deterministic output.
pub const TEMPERATURE: f32 = 0.2;
const CLIENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Which backend answers completions for the lifetime of a `ProviderClient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProviderSelection {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "azure_openai")]
    AzureOpenAi,
    #[serde(rename = "rule_based")]
    Offline,
}

impl ProviderSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderSelection::OpenAi => "openai",
            ProviderSelection::AzureOpenAi => "azure_openai",
            ProviderSelection::Offline => "rule_based",
        }
    }
}

impl fmt::Display for ProviderSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Completion body shared by the OpenAI and Azure OpenAI completions endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub text: String,
}

impl CompletionResponse {
    /// Trimmed text of the first choice. Blank output is treated as malformed.
    pub(crate) fn into_text(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// What a completion request produced, before it is flattened to text.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// A cloud provider answered.
    Completed(String),
    /// Canned questions from the question bank. `reason` is set when a provider failed first.
    Offline { text: String, reason: Option<String> },
    /// Nothing to offer: no provider answered and the prompt named no known technology.
    Guidance { reason: Option<String> },
}

impl GenerationOutcome {
    pub fn into_text(self) -> String {
        match self {
            GenerationOutcome::Completed(text) | GenerationOutcome::Offline { text, .. } => text,
            GenerationOutcome::Guidance { .. } => fallback::OFFLINE_GUIDANCE.to_string(),
        }
    }

    /// The provider failure that forced a degradation, if any.
    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            GenerationOutcome::Completed(_) => None,
            GenerationOutcome::Offline { reason, .. } | GenerationOutcome::Guidance { reason } => {
                reason.as_deref()
            }
        }
    }
}

/// Completion client with its backend fixed at construction.
#[derive(Clone)]
pub struct ProviderClient {
    selection: ProviderSelection,
    settings: ProviderSettings,
    http: Client,
}

impl ProviderClient {
    pub fn new(settings: ProviderSettings) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(CLIENT_TIMEOUT).build()?;
        Ok(Self {
            selection: settings.selection(),
            settings,
            http,
        })
    }

    pub fn selection(&self) -> ProviderSelection {
        self.selection
    }

    /// Model identifier used by the selected backend, for logging.
    pub fn model(&self) -> &str {
        match self.selection {
            ProviderSelection::OpenAi => &self.settings.openai_engine,
            ProviderSelection::AzureOpenAi => &self.settings.azure_deployment,
            ProviderSelection::Offline => "question-bank",
        }
    }

    /// Runs the prompt against the selected backend and reports how the text was obtained.
    /// Never fails: provider errors degrade to the offline question bank.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> GenerationOutcome {
        let result = match self.selection {
            ProviderSelection::OpenAi => {
                openai::complete(&self.http, &self.settings, prompt, max_tokens).await
            }
            ProviderSelection::AzureOpenAi => {
                azure::complete(&self.http, &self.settings, prompt, max_tokens).await
            }
            ProviderSelection::Offline => return fallback::offline_outcome(prompt, None),
        };

        match result {
            Ok(text) => {
                debug!(provider = %self.selection, "Completion succeeded ({} chars)", text.len());
                GenerationOutcome::Completed(text)
            }
            Err(e) => {
                error!(provider = %self.selection, "Completion failed, using offline fallback: {e}");
                fallback::offline_outcome(prompt, Some(e.to_string()))
            }
        }
    }

    /// Text-only view of `complete`. Always non-empty.
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> String {
        let outcome = self.complete(prompt, max_tokens).await;
        if let Some(reason) = outcome.degraded_reason() {
            debug!(provider = %self.selection, "Serving offline text after provider failure: {reason}");
        }
        outcome.into_text()
    }
}
