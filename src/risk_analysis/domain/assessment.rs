use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk level assigned to a single dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classifies a single dependency from its known vulnerability count.
    ///
    /// count >= 10 -> Critical, 5-9 -> High, 2-4 -> Medium, 0-1 -> Low
    pub fn from_vulnerability_count(count: u32) -> Self {
        match count {
            c if c >= 10 => RiskLevel::Critical,
            5..=9 => RiskLevel::High,
            2..=4 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    /// Parses the level string an AI provider returns; case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CRITICAL" => Some(RiskLevel::Critical),
            "HIGH" => Some(RiskLevel::High),
            "MEDIUM" | "MODERATE" => Some(RiskLevel::Medium),
            "LOW" => Some(RiskLevel::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Critical => write!(f, "CRITICAL"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::Low => write!(f, "LOW"),
        }
    }
}

/// Risk assessment for one (coordinate, provider, model) tuple.
///
/// Either produced by an AI provider (explanation and recommendations
/// populated) or deterministically (empty explanation marks the assessment
/// as AI-unavailable rather than omitting the row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Score in [0, 100]
    pub score: u8,
    pub explanation: String,
    pub recommendations: Vec<String>,
    pub provider: String,
    pub model: String,
    pub analyzed_at: DateTime<Utc>,
    pub from_cache: bool,
}

impl RiskAssessment {
    /// Builds a deterministic assessment from vulnerability signal alone.
    ///
    /// Used when AI is disabled or the provider call failed; the empty
    /// explanation is the explicit AI-unavailable marker.
    pub fn deterministic(
        vulnerability_count: u32,
        score: u8,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            level: RiskLevel::from_vulnerability_count(vulnerability_count),
            score,
            explanation: String::new(),
            recommendations: Vec::new(),
            provider: provider.into(),
            model: model.into(),
            analyzed_at: Utc::now(),
            from_cache: false,
        }
    }

    /// True when the assessment carries an AI narrative
    pub fn has_ai_narrative(&self) -> bool {
        !self.explanation.is_empty()
    }
}
