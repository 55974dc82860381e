//! Chat-completion client used for clothing advice.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::weather::CurrentConditions;

pub const ASSISTANT_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const CLOTHING_QUESTION: &str =
    "Based on the weather information below, give detailed advice on what to wear.";

const SYSTEM_PROMPT: &str = "You are a smart weather assistant. Combine the current weather \
    with the user's needs and give practical, concise advice.";
const ASSISTANT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("assistant returned HTTP {0}")]
    Status(u16),
    #[error("assistant reply contained no message")]
    EmptyReply,
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl AssistantConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: ASSISTANT_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout: ASSISTANT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AssistantClient {
    client: Client,
    config: AssistantConfig,
}

impl AssistantClient {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Sends one stateless exchange: system prompt plus the weather-framed question.
    #[instrument(skip(self, current), fields(model = %self.config.model))]
    pub async fn ask(
        &self,
        current: &CurrentConditions,
        question: &str,
    ) -> Result<String, AssistantError> {
        let messages = build_messages(current, question);
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(url = %url, "asking assistant");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&ChatRequest {
                model: &self.config.model,
                messages: &messages,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Status(status.as_u16()));
        }

        let payload: ChatResponse = response.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AssistantError::EmptyReply)
    }
}

pub fn weather_context(current: &CurrentConditions) -> String {
    format!(
        "temperature: {}°C, feels like: {}°C, weather: {}, wind speed: {} m/s, humidity: {}%",
        current.temperature_c,
        current.feels_like_c,
        current.description_or("unknown"),
        current.wind_speed_ms,
        current.humidity
    )
}

pub fn build_messages(current: &CurrentConditions, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::new("system", SYSTEM_PROMPT),
        ChatMessage::new(
            "user",
            format!(
                "Weather: {}. Question: {}",
                weather_context(current),
                question.trim()
            ),
        ),
    ]
}
