use crate::application::dto::AnalysisReport;
use crate::shared::Result;

/// ReportFormatter port for rendering an analysis report
///
/// Implementations produce a complete output document (table, JSON, ...)
/// from the ordered per-dependency results.
pub trait ReportFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String>;
}
