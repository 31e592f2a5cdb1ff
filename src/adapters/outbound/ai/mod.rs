pub mod gemini;
pub mod ollama;
pub mod openai;

pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::ports::outbound::{AiProvider, ProviderKind};
use crate::shared::error::AiError;

/// Maps a non-success HTTP status to the provider error taxonomy
pub(crate) fn map_status_error(status: reqwest::StatusCode) -> AiError {
    match status.as_u16() {
        401 | 403 => AiError::Unauthorized(format!("status code {}", status)),
        429 => AiError::RateLimited(format!("status code {}", status)),
        _ => AiError::Unreachable(format!("status code {}", status)),
    }
}

/// Builds a provider for the given kind.
///
/// Hosted providers require a credential; Ollama runs locally and
/// takes none. The model falls back to the kind's default when not
/// given.
///
/// # Errors
/// Returns `AiError::Unauthorized` when a hosted provider is requested
/// without a credential.
pub fn build_provider(
    kind: ProviderKind,
    credential: Option<&str>,
    model: Option<&str>,
) -> Result<Box<dyn AiProvider>, AiError> {
    let model = model.unwrap_or_else(|| kind.default_model());

    let missing_credential =
        || AiError::Unauthorized(format!("no credential configured for provider '{}'", kind));

    match kind {
        ProviderKind::OpenAi => {
            let key = credential.ok_or_else(missing_credential)?;
            Ok(Box::new(OpenAiProvider::new(key, model)?))
        }
        ProviderKind::Gemini => {
            let key = credential.ok_or_else(missing_credential)?;
            Ok(Box::new(GeminiProvider::new(key, model)?))
        }
        ProviderKind::Ollama => Ok(Box::new(OllamaProvider::new(model)?)),
    }
}
