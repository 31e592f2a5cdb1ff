use async_trait::async_trait;
use depsentry::prelude::*;
use depsentry::shared::error::ScanError;
use std::path::Path;

/// Mock BuildScanner returning a fixed coordinate list
pub struct MockBuildScanner {
    report: Option<ScanReport>,
}

impl MockBuildScanner {
    pub fn with_coordinates(coordinates: Vec<DependencyCoordinate>) -> Self {
        Self {
            report: Some(ScanReport {
                coordinates,
                build_tool: BuildTool::Maven,
                confidence: Confidence::High,
                best_effort: false,
            }),
        }
    }

    pub fn with_failure() -> Self {
        Self { report: None }
    }
}

#[async_trait]
impl BuildScanner for MockBuildScanner {
    async fn scan(&self, project_path: &Path) -> std::result::Result<ScanReport, ScanError> {
        match &self.report {
            Some(report) => Ok(report.clone()),
            None => Err(ScanError::NotFound {
                path: project_path.to_path_buf(),
            }),
        }
    }
}
