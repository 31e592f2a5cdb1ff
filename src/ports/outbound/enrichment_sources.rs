use crate::risk_analysis::domain::DependencyCoordinate;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Vulnerability signal returned by a vulnerability database lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VulnerabilitySignal {
    pub count: u32,
    /// Advisory identifiers, already truncated by the source
    pub ids: Vec<String>,
}

/// Repository statistics from a hosting provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoStats {
    pub stars: Option<u64>,
    pub open_issues: Option<u64>,
    pub last_pushed_at: Option<DateTime<Utc>>,
}

/// VulnerabilitySource port - queries a vulnerability database by
/// ecosystem + name + version.
///
/// Errors from implementations are absorbed by the aggregator as
/// zero signal; they never fail an analysis.
#[async_trait]
pub trait VulnerabilitySource: Send + Sync {
    async fn query(&self, coordinate: &DependencyCoordinate) -> Result<VulnerabilitySignal>;
}

/// RegistrySource port - fetches the package descriptor from the central
/// registry to recover the source-control URL.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Returns the SCM URL declared in the package descriptor, if any
    async fn fetch_scm_url(&self, coordinate: &DependencyCoordinate) -> Result<Option<String>>;
}

/// RepoStatsSource port - fetches repository statistics from a recognized
/// hosting provider.
#[async_trait]
pub trait RepoStatsSource: Send + Sync {
    /// Resolves an SCM URL to an `owner/repo` slug this source recognizes
    fn recognize(&self, scm_url: &str) -> Option<String>;

    /// Fetches statistics for a recognized repository slug
    async fn fetch_stats(&self, repo: &str) -> Result<RepoStats>;
}
