/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, network, console, etc.).
pub mod ai_provider;
pub mod analysis_cache;
pub mod build_scanner;
pub mod descriptor_source;
pub mod enrichment_sources;
pub mod formatter;
pub mod output_presenter;
pub mod progress_reporter;

pub use ai_provider::{AiProvider, ProviderKind};
pub use analysis_cache::{AnalysisCache, CacheEntry, CacheKey};
pub use build_scanner::BuildScanner;
pub use descriptor_source::DescriptorSource;
pub use enrichment_sources::{
    RegistrySource, RepoStats, RepoStatsSource, VulnerabilitySignal, VulnerabilitySource,
};
pub use formatter::ReportFormatter;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
