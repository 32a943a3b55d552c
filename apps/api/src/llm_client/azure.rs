//! Azure OpenAI deployment-scoped completions backend.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use super::{CompletionResponse, LlmError, TEMPERATURE};
use crate::config::ProviderSettings;

pub const API_VERSION: &str = "2023-05-15";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct AzureRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

pub(crate) fn deployment_url(endpoint: &str, deployment: &str) -> String {
    format!(
        "{}/openai/deployments/{}/completions?api-version={}",
        endpoint.trim_end_matches('/'),
        deployment,
        API_VERSION
    )
}

pub(crate) async fn complete(
    client: &Client,
    settings: &ProviderSettings,
    prompt: &str,
    max_tokens: u32,
) -> Result<String, LlmError> {
    let api_key = settings
        .azure_key
        .as_deref()
        .ok_or(LlmError::MissingCredential("AZURE_OPENAI_KEY"))?;
    let endpoint = settings
        .azure_endpoint
        .as_deref()
        .ok_or(LlmError::MissingCredential("AZURE_OPENAI_ENDPOINT"))?;

    let response = client
        .post(deployment_url(endpoint, &settings.azure_deployment))
        .header("api-key", api_key)
        .timeout(REQUEST_TIMEOUT)
        .json(&AzureRequest {
            prompt,
            max_tokens,
            temperature: TEMPERATURE,
        })
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    serde_json::from_str::<CompletionResponse>(&body)?.into_text()
}
