use crate::ports::outbound::{RegistrySource, RepoStats, RepoStatsSource, VulnerabilitySource};
use crate::risk_analysis::domain::{DependencyCoordinate, EnrichmentRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Per-lookup deadline. Each sub-lookup gets its own budget so one slow
/// source cannot starve the others.
const LOOKUP_TIMEOUT_SECONDS: u64 = 20;

/// EnrichmentAggregator - best-effort metadata collection for one coordinate.
///
/// Composes three sub-lookups: vulnerability database, central registry
/// (for the SCM URL), and repository hosting statistics. The
/// vulnerability lookup runs concurrently with the registry→stats chain.
/// `enrich` is infallible: any source failing, timing out, or returning
/// nothing leaves its fields absent. Absence is data.
pub struct EnrichmentAggregator {
    vulnerability_source: Arc<dyn VulnerabilitySource>,
    registry_source: Arc<dyn RegistrySource>,
    repo_stats_source: Arc<dyn RepoStatsSource>,
    lookup_timeout: Duration,
}

impl EnrichmentAggregator {
    pub fn new(
        vulnerability_source: Arc<dyn VulnerabilitySource>,
        registry_source: Arc<dyn RegistrySource>,
        repo_stats_source: Arc<dyn RepoStatsSource>,
    ) -> Self {
        Self {
            vulnerability_source,
            registry_source,
            repo_stats_source,
            lookup_timeout: Duration::from_secs(LOOKUP_TIMEOUT_SECONDS),
        }
    }

    /// Overrides the per-lookup deadline; used by tests
    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Collects whatever the sources can provide for this coordinate.
    ///
    /// Both build tools resolve against the Maven ecosystem; the record
    /// is tagged accordingly.
    pub async fn enrich(&self, coordinate: &DependencyCoordinate) -> EnrichmentRecord {
        let mut record = EnrichmentRecord::identity_only(
            "Maven",
            coordinate.package_name(),
            coordinate.version.clone(),
        );

        let vulnerability_lookup = async {
            timeout(
                self.lookup_timeout,
                self.vulnerability_source.query(coordinate),
            )
            .await
            .ok()
            .and_then(|result| result.ok())
        };

        let scm_chain = async {
            let scm_url = timeout(
                self.lookup_timeout,
                self.registry_source.fetch_scm_url(coordinate),
            )
            .await
            .ok()
            .and_then(|result| result.ok())
            .flatten();

            let (repo, stats) = match scm_url.as_deref() {
                Some(url) => match self.repo_stats_source.recognize(url) {
                    Some(repo) => {
                        let stats: Option<RepoStats> = timeout(
                            self.lookup_timeout,
                            self.repo_stats_source.fetch_stats(&repo),
                        )
                        .await
                        .ok()
                        .and_then(|result| result.ok());
                        (Some(repo), stats)
                    }
                    None => (None, None),
                },
                None => (None, None),
            };

            (scm_url, repo, stats)
        };

        let (signal, (scm_url, repo, stats)) = tokio::join!(vulnerability_lookup, scm_chain);

        if let Some(signal) = signal {
            record.vulnerability_count = Some(signal.count);
            record.vulnerability_ids = signal.ids;
        }
        record.scm_url = scm_url;
        record.github_repo = repo;
        if let Some(stats) = stats {
            record.github_stars = stats.stars;
            record.open_issues = stats.open_issues;
            record.last_pushed_at = stats.last_pushed_at;
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::VulnerabilitySignal;
    use crate::risk_analysis::domain::BuildTool;
    use crate::shared::Result;
    use async_trait::async_trait;
    use chrono::Utc;

    struct StubVulnSource {
        signal: Option<VulnerabilitySignal>,
    }

    #[async_trait]
    impl VulnerabilitySource for StubVulnSource {
        async fn query(&self, _coordinate: &DependencyCoordinate) -> Result<VulnerabilitySignal> {
            match &self.signal {
                Some(signal) => Ok(signal.clone()),
                None => anyhow::bail!("vulnerability source down"),
            }
        }
    }

    struct StubRegistrySource {
        scm_url: Option<String>,
        fail: bool,
    }

    #[async_trait]
    impl RegistrySource for StubRegistrySource {
        async fn fetch_scm_url(
            &self,
            _coordinate: &DependencyCoordinate,
        ) -> Result<Option<String>> {
            if self.fail {
                anyhow::bail!("registry down");
            }
            Ok(self.scm_url.clone())
        }
    }

    struct StubRepoStatsSource {
        stats: Option<RepoStats>,
    }

    #[async_trait]
    impl RepoStatsSource for StubRepoStatsSource {
        fn recognize(&self, scm_url: &str) -> Option<String> {
            scm_url
                .strip_prefix("https://github.com/")
                .map(|s| s.to_string())
        }

        async fn fetch_stats(&self, _repo: &str) -> Result<RepoStats> {
            match &self.stats {
                Some(stats) => Ok(stats.clone()),
                None => anyhow::bail!("stats source down"),
            }
        }
    }

    fn coordinate() -> DependencyCoordinate {
        DependencyCoordinate::new("org.example", "lib-a", "1.0.0", BuildTool::Maven)
    }

    fn aggregator(
        signal: Option<VulnerabilitySignal>,
        scm_url: Option<String>,
        registry_fails: bool,
        stats: Option<RepoStats>,
    ) -> EnrichmentAggregator {
        EnrichmentAggregator::new(
            Arc::new(StubVulnSource { signal }),
            Arc::new(StubRegistrySource {
                scm_url,
                fail: registry_fails,
            }),
            Arc::new(StubRepoStatsSource { stats }),
        )
    }

    #[tokio::test]
    async fn test_all_sources_down_yields_bare_record() {
        let record = aggregator(None, None, true, None).enrich(&coordinate()).await;
        assert!(record.is_bare());
        assert_eq!(record.package_name, "org.example:lib-a");
        assert_eq!(record.resolved_version, "1.0.0");
    }

    #[tokio::test]
    async fn test_vulnerability_signal_survives_registry_failure() {
        let signal = VulnerabilitySignal {
            count: 3,
            ids: vec!["CVE-2024-0001".to_string()],
        };
        let record = aggregator(Some(signal), None, true, None)
            .enrich(&coordinate())
            .await;

        assert_eq!(record.vulnerability_count, Some(3));
        assert_eq!(record.vulnerability_ids.len(), 1);
        assert!(record.scm_url.is_none());
    }

    #[tokio::test]
    async fn test_full_chain() {
        let stats = RepoStats {
            stars: Some(1200),
            open_issues: Some(34),
            last_pushed_at: Some(Utc::now()),
        };
        let record = aggregator(
            Some(VulnerabilitySignal::default()),
            Some("https://github.com/example/lib-a".to_string()),
            false,
            Some(stats),
        )
        .enrich(&coordinate())
        .await;

        assert_eq!(record.vulnerability_count, Some(0));
        assert_eq!(record.scm_url.as_deref(), Some("https://github.com/example/lib-a"));
        assert_eq!(record.github_repo.as_deref(), Some("example/lib-a"));
        assert_eq!(record.github_stars, Some(1200));
    }

    #[tokio::test]
    async fn test_unrecognized_scm_url_skips_stats() {
        let record = aggregator(
            None,
            Some("https://gitlab.com/example/lib-a".to_string()),
            false,
            Some(RepoStats::default()),
        )
        .enrich(&coordinate())
        .await;

        assert_eq!(record.scm_url.as_deref(), Some("https://gitlab.com/example/lib-a"));
        assert!(record.github_repo.is_none());
        assert!(record.github_stars.is_none());
    }

    #[tokio::test]
    async fn test_stats_failure_keeps_scm_url_and_slug() {
        let record = aggregator(
            None,
            Some("https://github.com/example/lib-a".to_string()),
            false,
            None,
        )
        .enrich(&coordinate())
        .await;

        assert_eq!(record.github_repo.as_deref(), Some("example/lib-a"));
        assert!(record.github_stars.is_none());
        assert!(record.open_issues.is_none());
    }
}
