use crate::ports::outbound::AiProvider;
use crate::risk_analysis::domain::{DependencyCoordinate, EnrichmentRecord, RiskAssessment};
use crate::risk_analysis::services::ResponseParser;
use crate::shared::error::AiError;
use std::fmt::Write;
use std::sync::Arc;

/// RiskAdvisor - AI narrative generation for one enriched coordinate.
///
/// Builds the fixed prompt, sends it through the configured provider
/// and parses the structured reply. Every error here is recoverable:
/// the orchestrator falls back to the deterministic assessment.
pub struct RiskAdvisor {
    provider: Arc<dyn AiProvider>,
}

impl RiskAdvisor {
    pub fn new(provider: Arc<dyn AiProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn AiProvider> {
        &self.provider
    }

    /// Renders the fixed prompt template.
    ///
    /// Parameterized by coordinate identity and the vulnerability
    /// signal; repository statistics are included when present. The
    /// reply contract is strict JSON with fixed field names.
    fn build_prompt(coordinate: &DependencyCoordinate, enrichment: &EnrichmentRecord) -> String {
        let mut prompt = String::new();

        let _ = writeln!(
            prompt,
            "You are a dependency security analyst. Assess the risk of using this JVM library:"
        );
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "Dependency: {}", coordinate.identity());
        let _ = writeln!(
            prompt,
            "Known vulnerabilities: {}",
            match enrichment.vulnerability_count {
                Some(count) => count.to_string(),
                None => "unknown (lookup unavailable)".to_string(),
            }
        );
        if !enrichment.vulnerability_ids.is_empty() {
            let _ = writeln!(
                prompt,
                "Advisory identifiers: {}",
                enrichment.vulnerability_ids.join(", ")
            );
        }
        if let Some(stars) = enrichment.github_stars {
            let _ = writeln!(prompt, "Repository stars: {}", stars);
        }
        if let Some(open_issues) = enrichment.open_issues {
            let _ = writeln!(prompt, "Open issues: {}", open_issues);
        }
        if let Some(last_pushed_at) = enrichment.last_pushed_at {
            let _ = writeln!(prompt, "Last repository push: {}", last_pushed_at.to_rfc3339());
        }
        let _ = writeln!(prompt);
        let _ = writeln!(
            prompt,
            "Reply with a single JSON object and nothing else, using exactly these fields:"
        );
        let _ = writeln!(
            prompt,
            r#"{{"riskLevel": "CRITICAL|HIGH|MEDIUM|LOW", "riskScore": <0-100>, "explanation": "<2-3 sentences>", "recommendations": ["<action>", ...], "exploitationLikelihood": "high|medium|low"}}"#
        );

        prompt
    }

    /// Produces an AI assessment for the coordinate.
    ///
    /// # Errors
    /// Provider transport and auth failures propagate as their `AiError`
    /// variants; a reply that cannot be parsed into the required fields
    /// is `AiError::MalformedResponse`. A default level is never
    /// substituted silently.
    pub async fn advise(
        &self,
        coordinate: &DependencyCoordinate,
        enrichment: &EnrichmentRecord,
    ) -> Result<RiskAssessment, AiError> {
        let prompt = Self::build_prompt(coordinate, enrichment);
        let raw = self.provider.send_prompt(&prompt).await?;
        ResponseParser::parse_assessment(
            &raw,
            self.provider.kind().as_str(),
            self.provider.model(),
        )
    }

    /// Credential/connectivity probe for `test-credential`
    pub async fn test_connection(&self) -> Result<(), AiError> {
        self.provider.test_connection().await
    }
}
