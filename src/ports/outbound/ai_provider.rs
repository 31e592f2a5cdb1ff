use crate::shared::error::AiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Closed set of supported AI providers.
///
/// Provider selection happens at configuration time; an unknown tag is
/// rejected when parsing arguments or config, never at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI-compatible chat completions API (bearer token auth)
    OpenAi,
    /// Google Gemini generateContent API (header API key auth)
    Gemini,
    /// Local Ollama instance (no auth)
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Default model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::Ollama => "llama3.1",
        }
    }

    /// Whether this provider requires a stored credential
    pub fn requires_credential(&self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(format!(
                "Unknown AI provider: {}. Supported providers: openai, gemini, ollama",
                s
            )),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// AiProvider port - the capability set each provider backend implements.
///
/// Each implementation owns its endpoint URL, auth scheme, and
/// request/response envelope; the advisor above it only ever sees
/// prompt text in and raw text out.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// The provider tag this backend implements
    fn kind(&self) -> ProviderKind;

    /// The model this backend was configured with
    fn model(&self) -> &str;

    /// Sends a prompt and returns the raw response text
    async fn send_prompt(&self, prompt: &str) -> Result<String, AiError>;

    /// Sends a minimal prompt to validate connectivity and credentials.
    ///
    /// Mutates no state; used purely for credential validation.
    async fn test_connection(&self) -> Result<(), AiError> {
        self.send_prompt("Reply with the single word: ok").await?;
        Ok(())
    }
}
