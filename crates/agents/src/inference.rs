//! Client for an OpenAI-compatible API: chat completions and embeddings.

use crate::{AgentError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_BATCH: usize = 64;

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_number<T: std::str::FromStr + PartialOrd + Default>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .filter(|value| *value > T::default())
        .unwrap_or(default)
}

/// Language-model settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API credential; `None` selects mock mode
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub timeout_secs: u64,
    pub max_batch: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_batch: DEFAULT_MAX_BATCH,
        }
    }
}

impl LlmConfig {
    /// Read settings from `OPENAI_*` environment variables.
    ///
    /// A missing or blank `OPENAI_API_KEY` leaves `api_key` unset.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Self {
            api_key,
            base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_URL),
            chat_model: env_or_default("OPENAI_CHAT_MODEL", DEFAULT_CHAT_MODEL),
            embedding_model: env_or_default("OPENAI_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            timeout_secs: env_number("OPENAI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
            max_batch: env_number("OPENAI_MAX_BATCH", DEFAULT_MAX_BATCH),
        }
    }

    /// Builder: set the credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builder: set the API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    max_batch: usize,
}

impl OpenAiClient {
    /// Build a client, or `None` when no credential is configured
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => return Ok(None),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Some(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            max_batch: config.max_batch.max(1),
        }))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Single-turn chat completion; returns the first choice's content
    #[instrument(skip(self, prompt), fields(model = %self.chat_model))]
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Requesting completion ({} prompt chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let response: ChatResponse = Self::parse(response).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AgentError::Processing("Empty completion response".into()))?;

        debug!("Received completion ({} chars)", content.len());
        Ok(content)
    }

    /// Embed a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Processing("No embedding returned".into()))
    }

    /// Embed many texts, in request batches of at most `max_batch`
    #[instrument(skip(self, texts), fields(model = %self.embedding_model, count = texts.len()))]
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/embeddings", self.base_url);
        let mut results = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.max_batch) {
            let request = EmbeddingRequest {
                model: &self.embedding_model,
                input: batch,
            };

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await?;
            let mut response: EmbeddingResponse = Self::parse(response).await?;

            if response.data.len() != batch.len() {
                return Err(AgentError::Processing(format!(
                    "Expected {} embeddings, received {}",
                    batch.len(),
                    response.data.len()
                )));
            }

            response.data.sort_by_key(|item| item.index);
            results.extend(response.data.into_iter().map(|item| item.embedding));
        }

        debug!("Received {} embeddings", results.len());
        Ok(results)
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

// ==========================================
// REQUEST/RESPONSE TYPES
// ==========================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
