use crate::domain::error::SchemaKoError;
use crate::domain::traits::AiTranslationClient;
use crate::infrastructure::config::AiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

// OpenAI-compatible chat completion request/response
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions translator
pub struct ChatCompletionsClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(client: Client, api_key: String, base_url: String, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    /// `None` when no API key is configured: the AI capability is simply absent.
    pub fn from_config(client: Client, config: &AiConfig) -> Option<Self> {
        if !config.enable {
            return None;
        }
        let api_key = config.resolve_api_key()?;
        Some(Self::new(
            client,
            api_key,
            config.base_url.clone(),
            config.model.clone(),
        ))
    }

    async fn send(&self, system: &str, prompt: &str) -> Result<String, SchemaKoError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.1,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SchemaKoError::Ai(format!(
                "chat API returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed = response.json::<ChatResponse>().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| SchemaKoError::Ai("chat API returned no content".to_string()))?;

        debug!(model = %self.model, chars = content.len(), "chat completion received");
        Ok(content)
    }
}

#[async_trait]
impl AiTranslationClient for ChatCompletionsClient {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, SchemaKoError> {
        tokio::time::timeout(timeout, self.send(system, prompt))
            .await
            .map_err(|_| SchemaKoError::Timeout(timeout.as_millis() as u64))?
    }
}
