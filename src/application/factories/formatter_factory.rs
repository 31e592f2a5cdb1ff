use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ReportFormatter;

/// FormatterFactory - maps an output format to its formatter adapter
pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(format: OutputFormat, use_color: bool) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Table => Box::new(TableFormatter::new(use_color)),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
        }
    }
}
