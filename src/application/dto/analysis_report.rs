use crate::risk_analysis::domain::{
    BuildTool, Confidence, DependencyCoordinate, EnrichmentRecord, RiskAssessment, RiskLevel,
};
use crate::shared::error::ExitCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One dependency's outcome within a report.
///
/// `assessment` is absent only for dependencies the pipeline never got
/// to (cancellation); every dependency that ran to completion carries
/// at least a deterministic assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyFinding {
    pub coordinate: DependencyCoordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<RiskAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_reason: Option<String>,
}

impl DependencyFinding {
    pub fn analyzed(
        coordinate: DependencyCoordinate,
        enrichment: EnrichmentRecord,
        assessment: RiskAssessment,
    ) -> Self {
        Self {
            coordinate,
            enrichment: Some(enrichment),
            assessment: Some(assessment),
            skipped_reason: None,
        }
    }

    pub fn skipped(coordinate: DependencyCoordinate, reason: impl Into<String>) -> Self {
        Self {
            coordinate,
            enrichment: None,
            assessment: None,
            skipped_reason: Some(reason.into()),
        }
    }

    pub fn is_analyzed(&self) -> bool {
        self.assessment.is_some()
    }
}

/// AnalysisReport - the ordered result of one analysis run.
///
/// Findings appear in the same order the scanner produced the
/// coordinates, regardless of how the concurrent workers finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub project_path: String,
    pub build_tool: BuildTool,
    pub confidence: Confidence,
    pub best_effort: bool,
    pub generated_at: DateTime<Utc>,
    pub findings: Vec<DependencyFinding>,
}

impl AnalysisReport {
    /// The highest risk level across analyzed findings
    pub fn highest_level(&self) -> Option<RiskLevel> {
        self.findings
            .iter()
            .filter_map(|f| f.assessment.as_ref())
            .map(|a| a.level)
            .max()
    }

    pub fn has_critical(&self) -> bool {
        self.highest_level() == Some(RiskLevel::Critical)
    }

    /// Exit code for CI: non-zero when a critical finding exists
    pub fn exit_code(&self) -> ExitCode {
        if self.has_critical() {
            ExitCode::CriticalRiskDetected
        } else {
            ExitCode::Success
        }
    }

    pub fn analyzed_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_analyzed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.findings.len() - self.analyzed_count()
    }
}
