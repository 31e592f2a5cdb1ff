use serde::{Deserialize, Serialize};

/// Build system that produced a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    Maven,
    Gradle,
}

impl std::fmt::Display for BuildTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildTool::Maven => write!(f, "maven"),
            BuildTool::Gradle => write!(f, "gradle"),
        }
    }
}

/// Qualitative reliability label for how a coordinate list was obtained.
///
/// The Maven path reads a declared descriptor and reports High (80-100);
/// the Gradle path is pattern-based text extraction and reports Medium
/// (50-79), labeled best-effort. The two must never be conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Numeric range reported alongside the label
    pub fn score(&self) -> u8 {
        match self {
            Confidence::High => 90,
            Confidence::Medium => 65,
            Confidence::Low => 30,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// Identity of one dependency extracted from a build descriptor.
///
/// Immutable once produced by the scanner. Uniquely identified by
/// (group_id, artifact_id, version, build_tool) within one scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub build_tool: BuildTool,
    /// Whether the dependency is declared directly in the descriptor
    pub direct: bool,
    /// Ordered coordinate ids from the project root to this dependency
    pub path: Vec<String>,
}

impl DependencyCoordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        build_tool: BuildTool,
    ) -> Self {
        let group_id = group_id.into();
        let artifact_id = artifact_id.into();
        let id = format!("{}:{}", group_id, artifact_id);
        Self {
            group_id,
            artifact_id,
            version: version.into(),
            build_tool,
            direct: true,
            path: vec![id],
        }
    }

    pub fn with_path(mut self, path: Vec<String>, direct: bool) -> Self {
        self.path = path;
        self.direct = direct;
        self
    }

    /// The `group:artifact` name used by OSV and the central registry
    pub fn package_name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Full `group:artifact:version` identity string
    pub fn identity(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl std::fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identity())
    }
}

/// Result of scanning a project's build descriptor: the ordered coordinate
/// list plus how it was obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub coordinates: Vec<DependencyCoordinate>,
    pub build_tool: BuildTool,
    pub confidence: Confidence,
    /// True when the extraction may under- or over-approximate (Gradle path)
    pub best_effort: bool,
}
