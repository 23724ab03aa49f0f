use std::time::Duration;

use mcbench_core::{BenchError, Result, RunConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Outcome of one generation, after the retry budget has been applied.
/// A `Failed` value is a scored response (incorrect), not an error; the
/// caller decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Completed { text: String },
    Failed { error_detail: String },
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    host: String,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Names of the models the server currently has available.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.host);
        debug!("Fetching available models");

        let resp = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| BenchError::Http(format!("Failed to reach Ollama at {}: {e}", self.host)))?;

        if !resp.status().is_success() {
            return Err(BenchError::Http(format!(
                "Failed to list models: {}",
                resp.status()
            )));
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| BenchError::Http(format!("Failed to parse model list: {e}")))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// One chat completion, with up to `max_retries` additional attempts on
    /// transport or server failure. Exhausting the budget yields
    /// `GenerationOutcome::Failed`; only model unavailability escalates as
    /// an error, since retrying it cannot help.
    pub async fn generate(&self, config: &RunConfig, prompt: &str) -> Result<GenerationOutcome> {
        let attempts = config.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match self.chat(config, prompt).await {
                Ok(text) => return Ok(GenerationOutcome::Completed { text }),
                Err(BenchError::ModelNotAvailable(model)) => {
                    return Err(BenchError::ModelNotAvailable(model));
                }
                Err(e) => {
                    warn!(attempt, attempts, "Generation attempt failed: {e}");
                    last_error = e.to_string();
                    if attempt < attempts {
                        tokio::time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        }

        error!("Exhausted {attempts} generation attempts");
        Ok(GenerationOutcome::Failed {
            error_detail: last_error,
        })
    }

    async fn chat(&self, config: &RunConfig, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.host);

        let request = ChatRequest {
            model: config.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: ChatOptions {
                temperature: config.temperature,
                top_p: config.top_p,
                num_predict: config.max_tokens,
            },
        };

        let resp = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| BenchError::Http(format!("Chat request failed: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // Ollama answers 404 when the requested model is not pulled.
            return Err(BenchError::ModelNotAvailable(config.model_name.clone()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BenchError::Http(format!("Chat failed: {status} - {body}")));
        }

        let chat_resp: ChatResponse = resp
            .json()
            .await
            .map_err(|e| BenchError::Http(format!("Failed to parse chat response: {e}")))?;

        if chat_resp.message.content.is_empty() {
            return Err(BenchError::Http("Empty completion content".to_string()));
        }

        Ok(chat_resp.message.content)
    }
}
