//! OpenAI completions backend.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CompletionResponse, LlmError, TEMPERATURE};
use crate::config::ProviderSettings;

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

pub(crate) fn completions_url(base_url: &str) -> String {
    format!("{}/completions", base_url.trim_end_matches('/'))
}

/// Single completion request. No retries: the caller degrades on any error.
pub(crate) async fn complete(
    client: &Client,
    settings: &ProviderSettings,
    prompt: &str,
    max_tokens: u32,
) -> Result<String, LlmError> {
    let api_key = settings
        .openai_api_key
        .as_deref()
        .ok_or(LlmError::MissingCredential("OPENAI_API_KEY"))?;

    let request_body = OpenAiRequest {
        model: &settings.openai_engine,
        prompt,
        max_tokens,
        temperature: TEMPERATURE,
        n: 1,
    };

    let response = client
        .post(completions_url(&settings.openai_base_url))
        .bearer_auth(api_key)
        .json(&request_body)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<OpenAiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str::<CompletionResponse>(&body)?.into_text()
}
