use crate::risk_analysis::domain::ScanReport;
use crate::shared::error::ScanError;
use async_trait::async_trait;
use std::path::Path;

/// BuildScanner port for extracting dependency coordinates from a project.
///
/// Implementations detect the build system from descriptor presence and
/// produce an ordered coordinate list plus a confidence label. Scanning
/// never executes build-tool code; the Maven path may consult the remote
/// repository to resolve the transitive graph, which is why the
/// operation is asynchronous.
#[async_trait]
pub trait BuildScanner: Send + Sync {
    /// Scans the project directory for a build descriptor
    ///
    /// # Arguments
    /// * `project_path` - Path to the project directory
    ///
    /// # Errors
    /// * `ScanError::NotFound` - no readable descriptor in the directory
    /// * `ScanError::ParseFailure` - descriptor present but malformed;
    ///   no partial coordinate set is returned
    async fn scan(&self, project_path: &Path) -> Result<ScanReport, ScanError>;
}
