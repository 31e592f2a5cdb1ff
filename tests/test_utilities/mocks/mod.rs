/// Mock implementations for testing
mod mock_ai_provider;
mod mock_build_scanner;
mod mock_enrichment_sources;
mod mock_progress_reporter;

pub use mock_ai_provider::MockAiProvider;
pub use mock_build_scanner::MockBuildScanner;
pub use mock_enrichment_sources::{
    MockRegistrySource, MockRepoStatsSource, MockVulnerabilitySource,
};
pub use mock_progress_reporter::MockProgressReporter;
