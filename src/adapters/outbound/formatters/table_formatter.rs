use crate::application::dto::{AnalysisReport, DependencyFinding};
use crate::ports::outbound::ReportFormatter;
use crate::risk_analysis::domain::RiskLevel;
use crate::shared::Result;
use owo_colors::OwoColorize;
use std::fmt::Write;

/// TableFormatter adapter for human-readable report output
///
/// Renders one row per dependency in scan order, risk levels colored
/// by severity, followed by narrative detail for anything above Low.
pub struct TableFormatter {
    use_color: bool,
}

impl TableFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn level_cell(&self, level: RiskLevel) -> String {
        let tag = format!("{:8}", format!("{}", level));
        if !self.use_color {
            return tag;
        }
        match level {
            RiskLevel::Critical => tag.red().bold().to_string(),
            RiskLevel::High => tag.red().to_string(),
            RiskLevel::Medium => tag.yellow().to_string(),
            RiskLevel::Low => tag.green().to_string(),
        }
    }

    fn summary_row(&self, finding: &DependencyFinding, name_width: usize) -> String {
        let name = finding.coordinate.package_name();
        let version = &finding.coordinate.version;

        match &finding.assessment {
            Some(assessment) => {
                let vulns = finding
                    .enrichment
                    .as_ref()
                    .and_then(|e| e.vulnerability_count)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "?".to_string());
                let source = if assessment.from_cache {
                    "cache"
                } else if assessment.has_ai_narrative() {
                    assessment.provider.as_str()
                } else {
                    "heuristic"
                };
                format!(
                    "{:name_width$}  {:12}  {}  {:>5}  {:>5}  {}",
                    name,
                    version,
                    self.level_cell(assessment.level),
                    assessment.score,
                    vulns,
                    source,
                )
            }
            None => {
                let reason = finding.skipped_reason.as_deref().unwrap_or("skipped");
                format!(
                    "{:name_width$}  {:12}  {:8}  {:>5}  {:>5}  {}",
                    name, version, "-", "-", "-", reason,
                )
            }
        }
    }

    fn detail_block(finding: &DependencyFinding) -> Option<String> {
        let assessment = finding.assessment.as_ref()?;
        if assessment.level < RiskLevel::Medium || !assessment.has_ai_narrative() {
            return None;
        }

        let mut block = String::new();
        let _ = writeln!(
            block,
            "\n▶ {} ({})",
            finding.coordinate.identity(),
            assessment.level
        );
        let _ = writeln!(block, "  {}", assessment.explanation);
        for recommendation in &assessment.recommendations {
            let _ = writeln!(block, "  - {}", recommendation);
        }
        if let Some(enrichment) = &finding.enrichment {
            if !enrichment.vulnerability_ids.is_empty() {
                let _ = writeln!(
                    block,
                    "  Advisories: {}",
                    enrichment.vulnerability_ids.join(", ")
                );
            }
        }
        Some(block)
    }
}

impl ReportFormatter for TableFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String> {
        let mut out = String::new();

        writeln!(
            out,
            "Dependency risk report for {} ({} scan, {} confidence{})",
            report.project_path,
            report.build_tool,
            report.confidence,
            if report.best_effort { ", best effort" } else { "" },
        )?;
        writeln!(out)?;

        let name_width = report
            .findings
            .iter()
            .map(|f| f.coordinate.package_name().len())
            .max()
            .unwrap_or(10)
            .max("DEPENDENCY".len());

        writeln!(
            out,
            "{:name_width$}  {:12}  {:8}  {:>5}  {:>5}  {}",
            "DEPENDENCY", "VERSION", "RISK", "SCORE", "VULNS", "SOURCE",
        )?;

        for finding in &report.findings {
            writeln!(out, "{}", self.summary_row(finding, name_width))?;
        }

        for finding in &report.findings {
            if let Some(block) = Self::detail_block(finding) {
                out.push_str(&block);
            }
        }

        writeln!(
            out,
            "\n{} analyzed, {} skipped{}",
            report.analyzed_count(),
            report.skipped_count(),
            match report.highest_level() {
                Some(level) => format!(", highest risk: {}", level),
                None => String::new(),
            },
        )?;

        Ok(out)
    }
}
