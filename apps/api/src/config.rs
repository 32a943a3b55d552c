use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::ProviderSelection;
use crate::sessions::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_TTL};

pub const DEFAULT_OPENAI_ENGINE: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_AZURE_DEPLOYMENT: &str = "gpt-35-turbo-instruct";
const DEFAULT_DATA_DIR: &str = "./data/candidates";

/// Application configuration loaded from environment variables.
/// Nothing is required: a bare environment runs offline with local storage only.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderSettings,
    pub data_dir: PathBuf,
    pub blob_conn_str: Option<String>,
    pub blob_container: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub session_idle_ttl: Duration,
    pub max_sessions: usize,
}

/// Everything the provider client needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub force_provider: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_engine: String,
    pub openai_base_url: String,
    pub azure_key: Option<String>,
    pub azure_endpoint: Option<String>,
    pub azure_deployment: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            force_provider: None,
            openai_api_key: None,
            openai_engine: DEFAULT_OPENAI_ENGINE.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            azure_key: None,
            azure_endpoint: None,
            azure_deployment: DEFAULT_AZURE_DEPLOYMENT.to_string(),
        }
    }
}

impl ProviderSettings {
    /// Builds provider settings from an arbitrary key lookup.
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            force_provider: get("FORCE_PROVIDER").map(|v| v.to_lowercase()),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_engine: get("OPENAI_ENGINE").unwrap_or_else(|| DEFAULT_OPENAI_ENGINE.to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            azure_key: get("AZURE_OPENAI_KEY"),
            azure_endpoint: get("AZURE_OPENAI_ENDPOINT"),
            azure_deployment: get("AZURE_OPENAI_DEPLOYMENT")
                .unwrap_or_else(|| DEFAULT_AZURE_DEPLOYMENT.to_string()),
        }
    }

    /// Override wins; otherwise the first credential present decides.
    pub fn selection(&self) -> ProviderSelection {
        if let Some(forced) = &self.force_provider {
            return match forced.as_str() {
                "openai" => ProviderSelection::OpenAi,
                "azure_openai" => ProviderSelection::AzureOpenAi,
                _ => ProviderSelection::Offline,
            };
        }

        if self.openai_api_key.is_some() {
            ProviderSelection::OpenAi
        } else if self.azure_key.is_some() && self.azure_endpoint.is_some() {
            ProviderSelection::AzureOpenAi
        } else {
            ProviderSelection::Offline
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Config {
            provider: ProviderSettings::from_lookup(&lookup),
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            blob_conn_str: get("BLOB_CONN_STR"),
            blob_container: get("BLOB_CONTAINER"),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            session_idle_ttl: match get("SESSION_IDLE_TTL_SECS") {
                Some(secs) => Duration::from_secs(
                    secs.parse::<u64>()
                        .context("SESSION_IDLE_TTL_SECS must be a whole number of seconds")?,
                ),
                None => DEFAULT_SESSION_IDLE_TTL,
            },
            max_sessions: match get("MAX_SESSIONS") {
                Some(max) => max
                    .parse::<usize>()
                    .ok()
                    .filter(|&max| max > 0)
                    .context("MAX_SESSIONS must be a positive integer")?,
                None => DEFAULT_MAX_SESSIONS,
            },
        })
    }
}
