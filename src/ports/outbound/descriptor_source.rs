use crate::risk_analysis::domain::DependencyCoordinate;
use crate::shared::Result;
use async_trait::async_trait;

/// DescriptorSource port for fetching a dependency's published build
/// descriptor from the configured repository.
///
/// The Maven resolution engine walks these descriptors to compute the
/// transitive dependency graph; the registry lookup reuses the same
/// fetch for SCM metadata.
#[async_trait]
pub trait DescriptorSource: Send + Sync {
    /// Fetches the descriptor content for a coordinate.
    ///
    /// `Ok(None)` means the repository does not publish a descriptor
    /// for this coordinate; transport failures are errors.
    async fn fetch_descriptor(&self, coordinate: &DependencyCoordinate) -> Result<Option<String>>;
}
