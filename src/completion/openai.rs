//! OpenAI-style chat completions over HTTP.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::completion::{CompletionError, CompletionService};
use crate::models::config::ProviderConfig;

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
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
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiCompletion {
    client: Client,
    config: ProviderConfig,
}

impl OpenAiCompletion {
    pub fn new(config: ProviderConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(OpenAiCompletion { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletion {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| CompletionError::Misconfigured("no API key set".to_string()))?;

        let request = build_request(&self.config.model, prompt, max_tokens);
        debug!("Requesting completion from {}", self.config.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        first_reply(parsed)
    }
}

fn build_request<'a>(model: &'a str, prompt: &'a str, max_tokens: u32) -> ChatRequest<'a> {
    ChatRequest {
        model,
        max_tokens,
        messages: vec![ChatMessage { role: "system", content: prompt }],
    }
}

fn first_reply(response: ChatResponse) -> Result<String, CompletionError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(CompletionError::EmptyReply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let request = build_request("gpt-3.5-turbo", "Say the first move", 10);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 10,
                "messages": [{"role": "system", "content": "Say the first move"}]
            })
        );
    }

    #[test]
    fn first_choice_is_the_reply() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "1. e4"}}, {"message": {"content": "d4"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_reply(response).unwrap(), "1. e4");
    }

    #[test]
    fn missing_choices_is_an_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(first_reply(response), Err(CompletionError::EmptyReply)));
    }

    #[test]
    fn endpoint_joins_base_url() {
        let service = OpenAiCompletion::new(ProviderConfig {
            base_url: "http://localhost:8000/v1/".to_string(),
            ..ProviderConfig::default()
        })
        .unwrap();
        assert_eq!(service.endpoint(), "http://localhost:8000/v1/chat/completions");
    }

    #[actix_rt::test]
    async fn missing_key_is_fatal() {
        let service = OpenAiCompletion::new(ProviderConfig::default()).unwrap();
        let err = service.complete("e4", 10).await.unwrap_err();
        assert!(err.is_fatal());
    }
}
