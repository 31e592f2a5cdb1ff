use super::{GradleScanner, MavenResolver, MavenScanner};
use crate::ports::outbound::{BuildScanner, DescriptorSource};
use crate::risk_analysis::domain::ScanReport;
use crate::shared::error::ScanError;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Descriptor filenames in detection order; Maven takes precedence when
/// both build systems are present.
const MAVEN_DESCRIPTOR: &str = "pom.xml";
const GRADLE_DESCRIPTORS: [&str; 2] = ["build.gradle", "build.gradle.kts"];

/// ProjectScanner adapter - detects the build system from descriptor
/// presence and dispatches to the matching scanner.
///
/// With a descriptor source attached, the Maven path additionally runs
/// the resolution engine to compute the transitive dependency graph;
/// without one (or when the repository is unreachable) the report holds
/// the declared coordinates only.
pub struct ProjectScanner {
    maven: MavenScanner,
    gradle: GradleScanner,
    resolver: Option<MavenResolver>,
}

impl Default for ProjectScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectScanner {
    pub fn new() -> Self {
        Self {
            maven: MavenScanner::new(),
            gradle: GradleScanner::new(),
            resolver: None,
        }
    }

    /// Attaches the repository used to resolve transitive Maven
    /// dependencies
    pub fn with_resolver(mut self, descriptor_source: Arc<dyn DescriptorSource>) -> Self {
        self.resolver = Some(MavenResolver::new(descriptor_source));
        self
    }

    fn read_descriptor(path: &Path) -> Result<String, ScanError> {
        std::fs::read_to_string(path).map_err(|_| ScanError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

#[async_trait]
impl BuildScanner for ProjectScanner {
    async fn scan(&self, project_path: &Path) -> Result<ScanReport, ScanError> {
        let pom = project_path.join(MAVEN_DESCRIPTOR);
        if pom.exists() {
            let content = Self::read_descriptor(&pom)?;
            let mut report = self.maven.parse(&content, &pom)?;
            if let Some(resolver) = &self.resolver {
                resolver.expand(&mut report).await;
            }
            return Ok(report);
        }

        for name in GRADLE_DESCRIPTORS {
            let script = project_path.join(name);
            if script.exists() {
                let content = Self::read_descriptor(&script)?;
                return self.gradle.parse(&content, &script);
            }
        }

        Err(ScanError::NotFound {
            path: project_path.to_path_buf(),
        })
    }
}
