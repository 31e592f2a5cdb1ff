/// Use cases - Application layer orchestration
pub mod advise_risk;
pub mod analyze_project;
pub mod enrich_coordinate;
pub mod list_cached;
pub mod manage_credentials;
pub mod scan_project;

pub use advise_risk::RiskAdvisor;
pub use analyze_project::{AnalyzeProjectUseCase, MAX_CONCURRENT_ANALYSES};
pub use enrich_coordinate::EnrichmentAggregator;
pub use list_cached::ListCachedUseCase;
pub use manage_credentials::CredentialManager;
pub use scan_project::ScanProjectUseCase;
