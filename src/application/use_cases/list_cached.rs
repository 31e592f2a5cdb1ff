use crate::application::dto::{AnalysisReport, DependencyFinding};
use crate::ports::outbound::AnalysisCache;
use crate::risk_analysis::domain::{BuildTool, Confidence};
use chrono::Utc;
use std::sync::Arc;

/// ListCachedUseCase - read-only view over prior assessments.
///
/// Produces a report shaped like a fresh analysis so the same
/// formatters apply; every row is marked from_cache.
pub struct ListCachedUseCase {
    cache: Arc<dyn AnalysisCache>,
}

impl ListCachedUseCase {
    pub fn new(cache: Arc<dyn AnalysisCache>) -> Self {
        Self { cache }
    }

    pub fn execute(&self, provider: &str, model: &str) -> AnalysisReport {
        let findings: Vec<DependencyFinding> = self
            .cache
            .entries_for(provider, model)
            .into_iter()
            .map(|entry| {
                let mut assessment = entry.assessment;
                assessment.from_cache = true;
                DependencyFinding {
                    coordinate: entry.coordinate,
                    enrichment: entry.enrichment,
                    assessment: Some(assessment),
                    skipped_reason: None,
                }
            })
            .collect();

        let build_tool = findings
            .first()
            .map(|f| f.coordinate.build_tool)
            .unwrap_or(BuildTool::Maven);

        AnalysisReport {
            project_path: format!("(cached results for {}/{})", provider, model),
            build_tool,
            confidence: Confidence::High,
            best_effort: false,
            generated_at: Utc::now(),
            findings,
        }
    }
}
