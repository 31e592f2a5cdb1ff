//! depsentry - dependency risk analysis for Maven and Gradle projects
//!
//! This library scans a project's build descriptor, enriches every dependency
//! coordinate with vulnerability and registry data, and assesses the risk of
//! each one, following hexagonal architecture and Domain-Driven Design
//! principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`risk_analysis`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use depsentry::prelude::*;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use tokio::sync::watch;
//!
//! # async fn example() -> Result<()> {
//! // Create adapters; the registry client doubles as the descriptor
//! // source for transitive Maven resolution
//! let registry = Arc::new(MavenCentralClient::new()?);
//! let scanner = Arc::new(ProjectScanner::new().with_resolver(registry.clone()));
//! let aggregator = Arc::new(EnrichmentAggregator::new(
//!     Arc::new(OsvClient::new()?),
//!     registry,
//!     Arc::new(GitHubClient::new()?),
//! ));
//! let cache = Arc::new(FileCache::open("cache.json", FileCache::DEFAULT_TTL_HOURS));
//! let progress_reporter = Arc::new(StderrProgressReporter::new());
//!
//! // Create use case (no AI advisor: deterministic scoring only)
//! let use_case = AnalyzeProjectUseCase::new(scanner, aggregator, None, cache, progress_reporter);
//!
//! // Execute
//! let request = AnalyzeRequest::new(PathBuf::from("."), ProviderKind::Ollama)
//!     .with_ai_enabled(false);
//! let (_cancel_tx, cancel_rx) = watch::channel(false);
//! let report = use_case.execute(request, cancel_rx).await?;
//!
//! // Format output
//! let formatter = JsonFormatter::new();
//! println!("{}", formatter.format(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod risk_analysis;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::ai::{
        build_provider, GeminiProvider, OllamaProvider, OpenAiProvider,
    };
    pub use crate::adapters::outbound::cache::FileCache;
    pub use crate::adapters::outbound::console::{SilentProgressReporter, StderrProgressReporter};
    pub use crate::adapters::outbound::filesystem::{FileSystemWriter, StdoutPresenter};
    pub use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
    pub use crate::adapters::outbound::network::{GitHubClient, MavenCentralClient, OsvClient};
    pub use crate::adapters::outbound::scanner::ProjectScanner;
    pub use crate::adapters::outbound::vault::{CredentialStore, SecretVault};
    pub use crate::application::dto::{
        AnalysisReport, AnalyzeRequest, DependencyFinding, OutputFormat,
    };
    pub use crate::application::factories::{FormatterFactory, PresenterFactory};
    pub use crate::application::use_cases::{
        AnalyzeProjectUseCase, CredentialManager, EnrichmentAggregator, ListCachedUseCase,
        RiskAdvisor, ScanProjectUseCase,
    };
    pub use crate::ports::outbound::{
        AiProvider, AnalysisCache, BuildScanner, DescriptorSource, OutputPresenter,
        ProgressReporter, ProviderKind, RegistrySource, ReportFormatter, RepoStatsSource,
        VulnerabilitySource,
    };
    pub use crate::risk_analysis::domain::{
        BuildTool, Confidence, DependencyCoordinate, EnrichmentRecord, RiskAssessment, RiskLevel,
        ScanReport,
    };
    pub use crate::risk_analysis::services::{ResponseParser, RiskScorer, SeveritySummary};
    pub use crate::shared::Result;
}
