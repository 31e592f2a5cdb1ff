//! Core risk-analysis domain: coordinate identity, enrichment metadata,
//! assessments, and the deterministic scorer.
pub mod domain;
pub mod services;
