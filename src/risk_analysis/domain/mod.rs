/// Domain models for dependency risk analysis
pub mod assessment;
pub mod coordinate;
pub mod enrichment;

pub use assessment::{RiskAssessment, RiskLevel};
pub use coordinate::{BuildTool, Confidence, DependencyCoordinate, ScanReport};
pub use enrichment::{EnrichmentRecord, MAX_VULNERABILITY_IDS};
