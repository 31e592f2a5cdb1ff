use crate::ports::outbound::{BuildScanner, ProgressReporter};
use crate::risk_analysis::domain::ScanReport;
use crate::shared::Result;
use std::path::Path;

/// ScanProjectUseCase - coordinate extraction without analysis
///
/// Thin orchestration over the scanner port: run the scan, narrate the
/// outcome. The `scan` subcommand uses this directly; the analysis
/// pipeline embeds the same scanner behind its own orchestration.
///
/// # Type Parameters
/// * `S` - BuildScanner implementation
/// * `PR` - ProgressReporter implementation
pub struct ScanProjectUseCase<S, PR> {
    scanner: S,
    progress_reporter: PR,
}

impl<S, PR> ScanProjectUseCase<S, PR>
where
    S: BuildScanner,
    PR: ProgressReporter,
{
    pub fn new(scanner: S, progress_reporter: PR) -> Self {
        Self {
            scanner,
            progress_reporter,
        }
    }

    /// Executes the scan.
    ///
    /// # Errors
    /// Propagates `ScanError` untouched: no descriptor or a malformed
    /// one aborts the request, partial coordinate lists are never
    /// returned.
    pub async fn execute(&self, project_path: &Path) -> Result<ScanReport> {
        self.progress_reporter.report(&format!(
            "🔍 Scanning build descriptor in: {}",
            project_path.display()
        ));

        let report = self.scanner.scan(project_path).await?;

        self.progress_reporter.report(&format!(
            "✅ Extracted {} coordinate(s) via {} ({} confidence{})",
            report.coordinates.len(),
            report.build_tool,
            report.confidence,
            if report.best_effort {
                ", best effort"
            } else {
                ""
            },
        ));

        Ok(report)
    }
}
