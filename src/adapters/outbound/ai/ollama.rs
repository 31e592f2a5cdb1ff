use crate::ports::outbound::{AiProvider, ProviderKind};
use crate::shared::error::AiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::map_status_error;

/// Local Ollama provider
///
/// Talks to a locally running Ollama daemon. No credential is required;
/// the host can be changed for daemons listening elsewhere.
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    const BASE_URL: &'static str = "http://localhost:11434";
    const TIMEOUT_SECONDS: u64 = 120;

    pub fn new(model: impl Into<String>) -> Result<Self, AiError> {
        let version = env!("CARGO_PKG_VERSION");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(format!("depsentry/{}", version))
            .build()
            .map_err(|e| AiError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: Self::BASE_URL.to_string(),
            model: model.into(),
        })
    }

    /// Overrides the daemon address
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl AiProvider for OllamaProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn send_prompt(&self, prompt: &str) -> Result<String, AiError> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
        };

        let url = format!("{}/api/generate", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;
        Ok(body.response)
    }
}
