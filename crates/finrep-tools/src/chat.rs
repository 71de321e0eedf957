//! OpenAI-compatible chat completion client
use async_trait::async_trait;
use finrep_core::{ChatMessage, ReasoningError, ReasoningService};
use serde_json::{json, Value};
use std::time::Duration;

pub struct ChatCompletionClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout_ms: u64,
}

impl ChatCompletionClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ReasoningError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ReasoningError::NotConfigured("API key is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReasoningError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            timeout_ms: timeout.as_millis() as u64,
        })
    }
}

#[async_trait]
impl ReasoningService for ChatCompletionClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, ReasoningError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(ReasoningError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let val: Value = resp.json().await.map_err(|e| self.classify(e))?;
        let content = val["choices"][0]["message"]["content"]
            .as_str()
            .map(str::trim)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(ReasoningError::EmptyResponse);
        }
        Ok(content.to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

impl ChatCompletionClient {
    fn classify(&self, err: reqwest::Error) -> ReasoningError {
        if err.is_timeout() {
            ReasoningError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            ReasoningError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_rejected() {
        let result = ChatCompletionClient::new(
            "https://api.example.com/v1",
            "model",
            "  ",
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(ReasoningError::NotConfigured(_))));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ChatCompletionClient::new(
            "https://api.example.com/v1/",
            "deepseek-chat",
            "key",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
        assert_eq!(client.model(), "deepseek-chat");
    }
}
