use async_trait::async_trait;
use depsentry::prelude::*;
use depsentry::shared::error::AiError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock AiProvider replaying a scripted reply and counting calls
pub struct MockAiProvider {
    reply: std::result::Result<String, String>,
    calls: Arc<AtomicUsize>,
}

impl MockAiProvider {
    pub fn replying(raw: &str) -> Self {
        Self {
            reply: Ok(raw.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle that stays valid after the provider moves into an advisor
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn send_prompt(&self, _prompt: &str) -> std::result::Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(raw) => Ok(raw.clone()),
            Err(message) => Err(AiError::Unreachable(message.clone())),
        }
    }
}
