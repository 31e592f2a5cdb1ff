/// Data Transfer Objects for application layer
///
/// DTOs carry data between the application layer and adapters, keeping
/// the domain layer isolated.
mod analysis_report;
mod analyze_request;
mod output_format;

pub use analysis_report::{AnalysisReport, DependencyFinding};
pub use analyze_request::AnalyzeRequest;
pub use output_format::OutputFormat;
