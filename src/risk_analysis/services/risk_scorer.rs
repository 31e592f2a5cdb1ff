use crate::risk_analysis::domain::RiskLevel;
use serde::{Deserialize, Serialize};

/// Severity counts fed into the deterministic scorer.
///
/// The scorer accepts only counts, never individual findings, so the same
/// function serves a single dependency and any externally filtered
/// aggregate view of the current results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

impl SeveritySummary {
    pub fn new(critical: u32, high: u32, medium: u32, low: u32) -> Self {
        Self {
            critical,
            high,
            medium,
            low,
        }
    }

    /// Counts findings per severity level
    pub fn tally<I: IntoIterator<Item = RiskLevel>>(levels: I) -> Self {
        let mut summary = Self::default();
        for level in levels {
            match level {
                RiskLevel::Critical => summary.critical += 1,
                RiskLevel::High => summary.high += 1,
                RiskLevel::Medium => summary.medium += 1,
                RiskLevel::Low => summary.low += 1,
            }
        }
        summary
    }
}

/// Per-severity weights for the base score
const WEIGHT_CRITICAL: u32 = 40;
const WEIGHT_HIGH: u32 = 30;
const WEIGHT_MEDIUM: u32 = 15;
const WEIGHT_LOW: u32 = 5;

/// Deterministic risk scorer. Pure function, O(1).
pub struct RiskScorer;

impl RiskScorer {
    /// Computes a risk score in [0, 100] from severity counts.
    ///
    /// Weighted base plus a critical-dominance floor: the floor is a
    /// monotonic guardrail so that even a single critical finding reads
    /// as urgent regardless of how little else was found.
    pub fn score(summary: SeveritySummary) -> u8 {
        let base = WEIGHT_CRITICAL * summary.critical
            + WEIGHT_HIGH * summary.high
            + WEIGHT_MEDIUM * summary.medium
            + WEIGHT_LOW * summary.low;

        let floor = match summary.critical {
            0 => 0,
            1 => 40,
            2 => 60,
            _ => 90,
        };

        base.max(floor).min(100) as u8
    }

    /// Fallback per-dependency score used when no AI narrative is
    /// available: a fixed representative value for the level its
    /// advisory count maps to.
    pub fn dependency_score(vulnerability_count: u32) -> u8 {
        match RiskLevel::from_vulnerability_count(vulnerability_count) {
            RiskLevel::Critical => 90,
            RiskLevel::High => 70,
            RiskLevel::Medium => 45,
            RiskLevel::Low => {
                if vulnerability_count > 0 {
                    10
                } else {
                    0
                }
            }
        }
    }
}
