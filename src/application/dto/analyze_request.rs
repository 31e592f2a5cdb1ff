use crate::ports::outbound::ProviderKind;
use std::path::PathBuf;

/// AnalyzeRequest - Internal request DTO for the analysis pipeline
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// Path to the project directory containing the build descriptor
    pub project_path: PathBuf,
    /// Skip cache lookups and recompute every dependency
    pub force_refresh: bool,
    /// Whether to ask the AI advisor for narratives at all
    pub ai_enabled: bool,
    /// Which provider backend to use when AI is enabled
    pub provider: ProviderKind,
    /// Model override; the provider default applies when absent
    pub model: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(project_path: PathBuf, provider: ProviderKind) -> Self {
        Self {
            project_path,
            force_refresh: false,
            ai_enabled: true,
            provider,
            model: None,
        }
    }

    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }

    pub fn with_ai_enabled(mut self, ai_enabled: bool) -> Self {
        self.ai_enabled = ai_enabled;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// The model that will actually be used
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_model_defaults_per_provider() {
        let request = AnalyzeRequest::new(PathBuf::from("."), ProviderKind::OpenAi);
        assert_eq!(request.effective_model(), "gpt-4o-mini");

        let request = request.with_model(Some("gpt-4o".to_string()));
        assert_eq!(request.effective_model(), "gpt-4o");
    }
}
