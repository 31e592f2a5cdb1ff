pub mod response_parser;
pub mod risk_scorer;

pub use response_parser::ResponseParser;
pub use risk_scorer::{RiskScorer, SeveritySummary};
