use async_trait::async_trait;
use depsentry::ports::outbound::{RepoStats, VulnerabilitySignal};
use depsentry::prelude::*;
use std::collections::HashMap;

/// Mock VulnerabilitySource keyed by coordinate identity
#[derive(Default)]
pub struct MockVulnerabilitySource {
    signals: HashMap<String, VulnerabilitySignal>,
    should_fail: bool,
}

impl MockVulnerabilitySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signal(mut self, identity: &str, count: u32, ids: &[&str]) -> Self {
        self.signals.insert(
            identity.to_string(),
            VulnerabilitySignal {
                count,
                ids: ids.iter().map(|id| id.to_string()).collect(),
            },
        );
        self
    }

    pub fn with_failure() -> Self {
        Self {
            signals: HashMap::new(),
            should_fail: true,
        }
    }
}

#[async_trait]
impl VulnerabilitySource for MockVulnerabilitySource {
    async fn query(&self, coordinate: &DependencyCoordinate) -> Result<VulnerabilitySignal> {
        if self.should_fail {
            anyhow::bail!("Mock vulnerability source failure");
        }
        Ok(self
            .signals
            .get(&coordinate.identity())
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock RegistrySource returning a fixed SCM URL per identity
#[derive(Default)]
pub struct MockRegistrySource {
    scm_urls: HashMap<String, String>,
}

impl MockRegistrySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scm_url(mut self, identity: &str, url: &str) -> Self {
        self.scm_urls.insert(identity.to_string(), url.to_string());
        self
    }
}

#[async_trait]
impl RegistrySource for MockRegistrySource {
    async fn fetch_scm_url(&self, coordinate: &DependencyCoordinate) -> Result<Option<String>> {
        Ok(self.scm_urls.get(&coordinate.identity()).cloned())
    }
}

/// Mock RepoStatsSource recognizing github.com URLs
#[derive(Default)]
pub struct MockRepoStatsSource {
    pub stats: RepoStats,
}

impl MockRepoStatsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stars(mut self, stars: u64) -> Self {
        self.stats.stars = Some(stars);
        self
    }
}

#[async_trait]
impl RepoStatsSource for MockRepoStatsSource {
    fn recognize(&self, scm_url: &str) -> Option<String> {
        scm_url
            .split_once("github.com/")
            .map(|(_, slug)| slug.trim_end_matches(".git").to_string())
    }

    async fn fetch_stats(&self, _repo: &str) -> Result<RepoStats> {
        Ok(self.stats.clone())
    }
}
