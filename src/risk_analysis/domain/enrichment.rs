use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of vulnerability identifiers carried per record.
///
/// Bounds the payload handed to formatters and the AI prompt; OSV can
/// return dozens of advisories for old artifacts.
pub const MAX_VULNERABILITY_IDS: usize = 8;

/// Optional metadata attached to a coordinate from external sources.
///
/// Produced fresh per enrichment call and never mutated after construction.
/// Every enrichment field may be absent: absence is data, not error. A
/// record with only identity fields populated means every source degraded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    pub ecosystem: String,
    pub package_name: String,
    pub resolved_version: String,
    /// Number of known vulnerabilities; None when the lookup was skipped or failed
    pub vulnerability_count: Option<u32>,
    /// Advisory identifiers, truncated to MAX_VULNERABILITY_IDS
    pub vulnerability_ids: Vec<String>,
    pub scm_url: Option<String>,
    /// `owner/repo` slug when the SCM URL resolves to GitHub
    pub github_repo: Option<String>,
    pub github_stars: Option<u64>,
    pub open_issues: Option<u64>,
    pub last_pushed_at: Option<DateTime<Utc>>,
}

impl EnrichmentRecord {
    /// Creates a record with identity fields only; enrichment fields absent.
    ///
    /// This is both the starting point for aggregation and the final result
    /// for coordinates outside the Maven ecosystem.
    pub fn identity_only(
        ecosystem: impl Into<String>,
        package_name: impl Into<String>,
        resolved_version: impl Into<String>,
    ) -> Self {
        Self {
            ecosystem: ecosystem.into(),
            package_name: package_name.into(),
            resolved_version: resolved_version.into(),
            vulnerability_count: None,
            vulnerability_ids: Vec::new(),
            scm_url: None,
            github_repo: None,
            github_stars: None,
            open_issues: None,
            last_pushed_at: None,
        }
    }

    /// True when no external source contributed anything
    pub fn is_bare(&self) -> bool {
        self.vulnerability_count.is_none()
            && self.vulnerability_ids.is_empty()
            && self.scm_url.is_none()
            && self.github_repo.is_none()
            && self.github_stars.is_none()
            && self.open_issues.is_none()
            && self.last_pushed_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_only_record_is_bare() {
        let record = EnrichmentRecord::identity_only("Maven", "junit:junit", "4.13.2");
        assert!(record.is_bare());
        assert_eq!(record.package_name, "junit:junit");
        assert_eq!(record.resolved_version, "4.13.2");
        assert_eq!(record.vulnerability_count, None);
    }

    #[test]
    fn test_record_with_signal_is_not_bare() {
        let mut record = EnrichmentRecord::identity_only("Maven", "junit:junit", "4.13.2");
        record.vulnerability_count = Some(2);
        assert!(!record.is_bare());
    }
}
