use crate::application::dto::{AnalysisReport, AnalyzeRequest, DependencyFinding};
use crate::application::use_cases::advise_risk::RiskAdvisor;
use crate::application::use_cases::enrich_coordinate::EnrichmentAggregator;
use crate::ports::outbound::{AnalysisCache, BuildScanner, CacheEntry, CacheKey, ProgressReporter};
use crate::risk_analysis::domain::{DependencyCoordinate, RiskAssessment};
use crate::risk_analysis::services::{RiskScorer, SeveritySummary};
use crate::shared::Result;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Default bound on concurrently analyzed coordinates
pub const MAX_CONCURRENT_ANALYSES: usize = 4;

/// Provider/model tag used for cache keys when AI is disabled
const NO_PROVIDER: &str = "none";

/// AnalyzeProjectUseCase - the full analysis pipeline.
///
/// Scan, then per coordinate: cache lookup, enrichment, AI narrative
/// (deterministic fallback), cache write. Coordinates fan out on a
/// bounded buffered stream; findings come back in scan order no matter
/// how the workers finish. A watch-channel cancellation signal turns
/// not-yet-started coordinates into skipped findings instead of
/// dropping them.
pub struct AnalyzeProjectUseCase {
    scanner: Arc<dyn BuildScanner>,
    aggregator: Arc<EnrichmentAggregator>,
    advisor: Option<Arc<RiskAdvisor>>,
    cache: Arc<dyn AnalysisCache>,
    progress_reporter: Arc<dyn ProgressReporter>,
    max_concurrent: usize,
}

impl AnalyzeProjectUseCase {
    pub fn new(
        scanner: Arc<dyn BuildScanner>,
        aggregator: Arc<EnrichmentAggregator>,
        advisor: Option<Arc<RiskAdvisor>>,
        cache: Arc<dyn AnalysisCache>,
        progress_reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            scanner,
            aggregator,
            advisor,
            cache,
            progress_reporter,
            max_concurrent: MAX_CONCURRENT_ANALYSES,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    fn cache_tags<'a>(&self, request: &'a AnalyzeRequest) -> (&'a str, &'a str) {
        if request.ai_enabled {
            (request.provider.as_str(), request.effective_model())
        } else {
            (NO_PROVIDER, NO_PROVIDER)
        }
    }

    /// Runs the pipeline for one project.
    ///
    /// # Errors
    /// Only scan failures abort the request; everything downstream
    /// degrades per finding.
    pub async fn execute(
        &self,
        request: AnalyzeRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<AnalysisReport> {
        let scan = self.scanner.scan(&request.project_path).await?;
        let total = scan.coordinates.len();

        self.progress_reporter.report(&format!(
            "🔍 Found {} dependency coordinate(s) via {} ({} confidence{})",
            total,
            scan.build_tool,
            scan.confidence,
            if scan.best_effort { ", best effort" } else { "" },
        ));

        let completed = Arc::new(AtomicUsize::new(0));
        let findings: Vec<DependencyFinding> = stream::iter(scan.coordinates)
            .map(|coordinate| {
                let cancel = cancel.clone();
                let completed = completed.clone();
                let request = &request;
                async move {
                    let finding = self.analyze_one(request, coordinate, cancel).await;
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    self.progress_reporter.report_progress(
                        done,
                        total,
                        Some(&finding.coordinate.identity()),
                    );
                    finding
                }
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let report = AnalysisReport {
            project_path: request.project_path.display().to_string(),
            build_tool: scan.build_tool,
            confidence: scan.confidence,
            best_effort: scan.best_effort,
            generated_at: Utc::now(),
            findings,
        };

        let summary = SeveritySummary::tally(
            report
                .findings
                .iter()
                .filter_map(|f| f.assessment.as_ref())
                .map(|a| a.level),
        );
        self.progress_reporter.report_completion(&format!(
            "✅ Analyzed {} of {} dependencies — project risk score {}/100",
            report.analyzed_count(),
            report.findings.len(),
            RiskScorer::score(summary),
        ));

        Ok(report)
    }

    async fn analyze_one(
        &self,
        request: &AnalyzeRequest,
        coordinate: DependencyCoordinate,
        cancel: watch::Receiver<bool>,
    ) -> DependencyFinding {
        if *cancel.borrow() {
            return DependencyFinding::skipped(coordinate, "analysis cancelled");
        }

        let (provider_tag, model) = self.cache_tags(request);
        let key = CacheKey::new(&coordinate, provider_tag, model);

        if !request.force_refresh {
            if let Some(entry) = self.cache.get(&key) {
                let mut assessment = entry.assessment;
                assessment.from_cache = true;
                return DependencyFinding {
                    coordinate,
                    enrichment: entry.enrichment,
                    assessment: Some(assessment),
                    skipped_reason: None,
                };
            }
        }

        let enrichment = self.aggregator.enrich(&coordinate).await;

        // Cancellation between enrichment and the provider call: the
        // expensive AI roundtrip is the part worth skipping.
        if *cancel.borrow() {
            return DependencyFinding::skipped(coordinate, "analysis cancelled");
        }

        let vulnerability_count = enrichment.vulnerability_count.unwrap_or(0);
        let assessment = match (&self.advisor, request.ai_enabled) {
            (Some(advisor), true) => match advisor.advise(&coordinate, &enrichment).await {
                Ok(assessment) => assessment,
                Err(err) => {
                    self.progress_reporter.report_error(&format!(
                        "⚠️  AI assessment failed for {}: {}",
                        coordinate.identity(),
                        err
                    ));
                    RiskAssessment::deterministic(
                        vulnerability_count,
                        RiskScorer::dependency_score(vulnerability_count),
                        provider_tag,
                        model,
                    )
                }
            },
            _ => RiskAssessment::deterministic(
                vulnerability_count,
                RiskScorer::dependency_score(vulnerability_count),
                provider_tag,
                model,
            ),
        };

        let entry = CacheEntry {
            coordinate: coordinate.clone(),
            enrichment: Some(enrichment.clone()),
            assessment: assessment.clone(),
            stored_at: Utc::now(),
        };
        if let Err(err) = self.cache.put(key, entry) {
            self.progress_reporter
                .report_error(&format!("⚠️  Cache write failed: {}", err));
        }

        DependencyFinding::analyzed(coordinate, enrichment, assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::console::SilentProgressReporter;
    use crate::ports::outbound::{
        AiProvider, ProviderKind, RegistrySource, RepoStats, RepoStatsSource, VulnerabilitySignal,
        VulnerabilitySource,
    };
    use crate::risk_analysis::domain::{BuildTool, Confidence, ScanReport};
    use crate::shared::error::{AiError, CacheError, ScanError};
    use async_trait::async_trait;
    use dashmap::DashMap;
    use std::path::{Path, PathBuf};

    struct FixedScanner {
        coordinates: Vec<DependencyCoordinate>,
    }

    #[async_trait]
    impl BuildScanner for FixedScanner {
        async fn scan(&self, _path: &Path) -> std::result::Result<ScanReport, ScanError> {
            Ok(ScanReport {
                coordinates: self.coordinates.clone(),
                build_tool: BuildTool::Maven,
                confidence: Confidence::High,
                best_effort: false,
            })
        }
    }

    struct CountingVulnSource;

    #[async_trait]
    impl VulnerabilitySource for CountingVulnSource {
        async fn query(&self, coordinate: &DependencyCoordinate) -> Result<VulnerabilitySignal> {
            // artifact names encode the desired count: "vulns-N"
            let count = coordinate
                .artifact_id
                .rsplit('-')
                .next()
                .and_then(|n| n.parse().ok())
                .unwrap_or(0);
            Ok(VulnerabilitySignal { count, ids: vec![] })
        }
    }

    struct NoRegistry;

    #[async_trait]
    impl RegistrySource for NoRegistry {
        async fn fetch_scm_url(&self, _c: &DependencyCoordinate) -> Result<Option<String>> {
            Ok(None)
        }
    }

    struct NoRepoStats;

    #[async_trait]
    impl RepoStatsSource for NoRepoStats {
        fn recognize(&self, _scm_url: &str) -> Option<String> {
            None
        }
        async fn fetch_stats(&self, _repo: &str) -> Result<RepoStats> {
            anyhow::bail!("unused")
        }
    }

    #[derive(Default)]
    struct MemoryCache {
        entries: DashMap<CacheKey, CacheEntry>,
    }

    impl AnalysisCache for MemoryCache {
        fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
            self.entries.get(key).map(|e| e.value().clone())
        }
        fn put(&self, key: CacheKey, entry: CacheEntry) -> std::result::Result<(), CacheError> {
            self.entries.insert(key, entry);
            Ok(())
        }
        fn evict_expired(&self) -> std::result::Result<usize, CacheError> {
            Ok(0)
        }
        fn entries_for(&self, provider: &str, model: &str) -> Vec<CacheEntry> {
            self.entries
                .iter()
                .filter(|e| e.key().provider == provider && e.key().model == model)
                .map(|e| e.value().clone())
                .collect()
        }
    }

    struct ScriptedProvider {
        reply: String,
    }

    #[async_trait]
    impl AiProvider for ScriptedProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }
        fn model(&self) -> &str {
            "gpt-4o-mini"
        }
        async fn send_prompt(&self, _prompt: &str) -> std::result::Result<String, AiError> {
            Ok(self.reply.clone())
        }
    }

    fn coordinates(artifacts: &[&str]) -> Vec<DependencyCoordinate> {
        artifacts
            .iter()
            .map(|a| DependencyCoordinate::new("org.example", *a, "1.0.0", BuildTool::Maven))
            .collect()
    }

    fn aggregator() -> Arc<EnrichmentAggregator> {
        Arc::new(EnrichmentAggregator::new(
            Arc::new(CountingVulnSource),
            Arc::new(NoRegistry),
            Arc::new(NoRepoStats),
        ))
    }

    fn use_case(
        artifacts: &[&str],
        advisor: Option<Arc<RiskAdvisor>>,
        cache: Arc<dyn AnalysisCache>,
    ) -> AnalyzeProjectUseCase {
        AnalyzeProjectUseCase::new(
            Arc::new(FixedScanner {
                coordinates: coordinates(artifacts),
            }),
            aggregator(),
            advisor,
            cache,
            Arc::new(SilentProgressReporter),
        )
    }

    fn request() -> AnalyzeRequest {
        AnalyzeRequest::new(PathBuf::from("/project"), ProviderKind::OpenAi)
            .with_ai_enabled(false)
    }

    fn not_cancelled() -> watch::Receiver<bool> {
        watch::channel(false).1
    }

    #[tokio::test]
    async fn test_findings_keep_scan_order() {
        let uc = use_case(
            &["zeta-0", "alpha-0", "mid-0"],
            None,
            Arc::new(MemoryCache::default()),
        );
        let report = uc.execute(request(), not_cancelled()).await.unwrap();

        let names: Vec<&str> = report
            .findings
            .iter()
            .map(|f| f.coordinate.artifact_id.as_str())
            .collect();
        assert_eq!(names, vec!["zeta-0", "alpha-0", "mid-0"]);
    }

    #[tokio::test]
    async fn test_second_run_hits_cache() {
        let cache: Arc<dyn AnalysisCache> = Arc::new(MemoryCache::default());
        let uc = use_case(&["vulns-3"], None, cache.clone());

        let first = uc.execute(request(), not_cancelled()).await.unwrap();
        assert!(!first.findings[0].assessment.as_ref().unwrap().from_cache);

        let second = uc.execute(request(), not_cancelled()).await.unwrap();
        let assessment = second.findings[0].assessment.as_ref().unwrap();
        assert!(assessment.from_cache);
        assert_eq!(assessment.score, first.findings[0].assessment.as_ref().unwrap().score);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_get_but_writes() {
        let cache = Arc::new(MemoryCache::default());
        let uc = use_case(&["vulns-3"], None, cache.clone());

        uc.execute(request(), not_cancelled()).await.unwrap();
        let report = uc
            .execute(request().with_force_refresh(true), not_cancelled())
            .await
            .unwrap();

        assert!(!report.findings[0].assessment.as_ref().unwrap().from_cache);
        assert_eq!(cache.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_deterministic_assessment_without_ai() {
        let uc = use_case(&["vulns-12"], None, Arc::new(MemoryCache::default()));
        let report = uc.execute(request(), not_cancelled()).await.unwrap();

        let assessment = report.findings[0].assessment.as_ref().unwrap();
        assert_eq!(assessment.score, 90);
        assert!(!assessment.has_ai_narrative());
        assert_eq!(assessment.provider, "none");
    }

    #[tokio::test]
    async fn test_malformed_ai_reply_falls_back_deterministically() {
        let advisor = Arc::new(RiskAdvisor::new(Arc::new(ScriptedProvider {
            reply: "I refuse to answer in JSON.".to_string(),
        })));
        let uc = use_case(&["vulns-3"], Some(advisor), Arc::new(MemoryCache::default()));

        let report = uc
            .execute(
                AnalyzeRequest::new(PathBuf::from("/project"), ProviderKind::OpenAi),
                not_cancelled(),
            )
            .await
            .unwrap();

        let assessment = report.findings[0].assessment.as_ref().unwrap();
        assert!(!assessment.has_ai_narrative());
        assert_eq!(assessment.score, 45);
        assert_eq!(assessment.provider, "openai");
    }

    #[tokio::test]
    async fn test_valid_ai_reply_is_used_and_cached() {
        let advisor = Arc::new(RiskAdvisor::new(Arc::new(ScriptedProvider {
            reply: r#"{"riskLevel": "HIGH", "riskScore": 71, "explanation": "Known advisories.", "recommendations": ["Upgrade"]}"#.to_string(),
        })));
        let cache = Arc::new(MemoryCache::default());
        let uc = use_case(&["vulns-5"], Some(advisor), cache.clone());

        let report = uc
            .execute(
                AnalyzeRequest::new(PathBuf::from("/project"), ProviderKind::OpenAi),
                not_cancelled(),
            )
            .await
            .unwrap();

        let assessment = report.findings[0].assessment.as_ref().unwrap();
        assert_eq!(assessment.score, 71);
        assert!(assessment.has_ai_narrative());
        assert_eq!(cache.entries_for("openai", "gpt-4o-mini").len(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_reports_skipped_findings() {
        let (tx, rx) = watch::channel(true);
        let uc = use_case(&["a-0", "b-0"], None, Arc::new(MemoryCache::default()));

        let report = uc.execute(request(), rx).await.unwrap();
        drop(tx);

        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.analyzed_count(), 0);
        assert!(report
            .findings
            .iter()
            .all(|f| f.skipped_reason.as_deref() == Some("analysis cancelled")));
    }
}
