use crate::risk_analysis::domain::{
    BuildTool, Confidence, DependencyCoordinate, ScanReport,
};
use crate::shared::error::ScanError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Scanner for Gradle build scripts.
///
/// Pattern-based extraction over the script text; build logic is never
/// executed. Only literal dependency declarations matching the recognized
/// notations are found, so dynamic expressions, property interpolation,
/// and script plugins are invisible to it. That necessarily under- or
/// over-approximates, which is why results report confidence Medium and
/// are labeled best-effort - never to be conflated with the Maven path.
///
/// Recognized notations:
/// - `implementation 'group:artifact:version'` (and the other
///   configuration keywords below, single or double quoted, with or
///   without parentheses)
/// - `implementation group: 'g', name: 'a', version: 'v'`
pub struct GradleScanner;

impl Default for GradleScanner {
    fn default() -> Self {
        Self::new()
    }
}

const CONFIGURATIONS: &str =
    "implementation|api|compile|compileOnly|runtimeOnly|testImplementation|testCompile";

static RE_COORD: Lazy<Regex> = Lazy::new(|| {
    // implementation 'group:artifact:version' / implementation("g:a:v")
    Regex::new(&format!(
        r#"(?m)^\s*(?:{CONFIGURATIONS})\s*\(?\s*['"]([^:'"\s]+):([^:'"\s]+):([^'"\s]+)['"]"#
    ))
    .expect("invalid Gradle coordinate pattern")
});

static RE_NAMED: Lazy<Regex> = Lazy::new(|| {
    // implementation group: 'g', name: 'a', version: 'v'
    Regex::new(&format!(
        r#"(?m)^\s*(?:{CONFIGURATIONS})\s*\(?\s*group:\s*['"]([^'"]+)['"]\s*,\s*name:\s*['"]([^'"]+)['"]\s*,\s*version:\s*['"]([^'"]+)['"]"#
    ))
    .expect("invalid Gradle named-argument pattern")
});

impl GradleScanner {
    pub fn new() -> Self {
        Self
    }

    /// Extracts literal dependency declarations from the script content
    pub fn parse(&self, content: &str, script_path: &Path) -> Result<ScanReport, ScanError> {
        // Matches from both notations, ordered by position in the script
        // so the report follows declaration order.
        let mut matches: Vec<(usize, &str, &str, &str)> = Vec::new();
        for pattern in [&*RE_COORD, &*RE_NAMED] {
            for captures in pattern.captures_iter(content) {
                let offset = captures.get(0).map(|m| m.start()).unwrap_or(0);
                let group_id = captures.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                let artifact_id = captures.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                let version = captures.get(3).map(|m| m.as_str().trim()).unwrap_or("");
                matches.push((offset, group_id, artifact_id, version));
            }
        }
        matches.sort_by_key(|(offset, ..)| *offset);

        let mut coordinates = Vec::new();
        let mut seen = HashSet::new();
        for (_, group_id, artifact_id, version) in matches {
            if group_id.is_empty() || artifact_id.is_empty() || version.is_empty() {
                continue;
            }
            // Interpolated versions are not evaluated; skip rather than guess
            if version.contains('$') {
                continue;
            }

            let identity = format!("{}:{}:{}", group_id, artifact_id, version);
            if seen.insert(identity) {
                coordinates.push(DependencyCoordinate::new(
                    group_id,
                    artifact_id,
                    version,
                    BuildTool::Gradle,
                ));
            }
        }

        if coordinates.is_empty() && !content.contains("dependencies") {
            return Err(ScanError::ParseFailure {
                path: script_path.to_path_buf(),
                details: "No dependencies block found in Gradle script".to_string(),
            });
        }

        Ok(ScanReport {
            coordinates,
            build_tool: BuildTool::Gradle,
            confidence: Confidence::Medium,
            best_effort: true,
        })
    }
}
