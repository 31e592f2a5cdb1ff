use super::maven_scanner::{DeclaredDependency, MavenScanner, UNRESOLVED_VERSION};
use crate::ports::outbound::DescriptorSource;
use crate::risk_analysis::domain::{BuildTool, DependencyCoordinate, ScanReport};
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::Arc;

/// Maximum number of coordinate ids on a path from the root, the root
/// project included. Published graphs rarely run deeper, and the bound
/// keeps a pathological repository from stalling a scan.
const MAX_PATH_LENGTH: usize = 6;

/// Dependency-resolution engine for the Maven path.
///
/// Walks the published descriptor of every declared dependency
/// breadth-first and appends the runtime-relevant transitive closure to
/// the scan report. The first declaration of a `group:artifact` wins
/// (nearest the root), which also terminates cycles. A descriptor that
/// cannot be fetched or parsed leaves its subtree unresolved; resolution
/// never fails a scan.
pub struct MavenResolver {
    descriptor_source: Arc<dyn DescriptorSource>,
    scanner: MavenScanner,
    max_path_length: usize,
}

impl MavenResolver {
    pub fn new(descriptor_source: Arc<dyn DescriptorSource>) -> Self {
        Self {
            descriptor_source,
            scanner: MavenScanner::new(),
            max_path_length: MAX_PATH_LENGTH,
        }
    }

    /// Overrides the depth bound; used by tests
    pub fn with_max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length.max(2);
        self
    }

    /// Expands a direct-dependency report into the full graph.
    ///
    /// Transitive coordinates are appended after the direct ones in
    /// discovery order, each carrying `direct = false` and the full path
    /// of coordinate ids that reached it.
    pub async fn expand(&self, report: &mut ScanReport) {
        let mut seen: HashSet<String> = report
            .coordinates
            .iter()
            .map(|c| c.package_name())
            .collect();
        let mut queue: VecDeque<DependencyCoordinate> =
            report.coordinates.iter().cloned().collect();

        while let Some(parent) = queue.pop_front() {
            if parent.path.len() >= self.max_path_length {
                continue;
            }
            let content = match self.descriptor_source.fetch_descriptor(&parent).await {
                Ok(Some(content)) => content,
                Ok(None) | Err(_) => continue,
            };
            let declared = match self
                .scanner
                .declared_dependencies(&content, Path::new("remote.pom"))
            {
                Ok(declared) => declared,
                Err(_) => continue,
            };

            for dependency in declared {
                if !Self::reaches_consumers(&dependency) {
                    continue;
                }
                let id = format!("{}:{}", dependency.group_id, dependency.artifact_id);
                if !seen.insert(id.clone()) {
                    continue;
                }

                let mut path = parent.path.clone();
                path.push(id);
                let coordinate = DependencyCoordinate::new(
                    dependency.group_id,
                    dependency.artifact_id,
                    dependency.version,
                    BuildTool::Maven,
                )
                .with_path(path, false);

                queue.push_back(coordinate.clone());
                report.coordinates.push(coordinate);
            }
        }
    }

    /// Test and provided scopes, optional entries, and versions the
    /// single descriptor could not resolve do not reach consumers of
    /// the artifact.
    fn reaches_consumers(dependency: &DeclaredDependency) -> bool {
        if dependency.optional || dependency.version == UNRESOLVED_VERSION {
            return false;
        }
        matches!(
            dependency.scope.as_deref(),
            None | Some("compile") | Some("runtime")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk_analysis::domain::Confidence;
    use crate::shared::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubDescriptorSource {
        descriptors: HashMap<String, String>,
        fail: bool,
    }

    impl StubDescriptorSource {
        fn new() -> Self {
            Self {
                descriptors: HashMap::new(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                descriptors: HashMap::new(),
                fail: true,
            }
        }

        fn with_descriptor(mut self, identity: &str, pom: &str) -> Self {
            self.descriptors.insert(identity.to_string(), pom.to_string());
            self
        }
    }

    #[async_trait]
    impl DescriptorSource for StubDescriptorSource {
        async fn fetch_descriptor(
            &self,
            coordinate: &DependencyCoordinate,
        ) -> Result<Option<String>> {
            if self.fail {
                anyhow::bail!("repository unreachable");
            }
            Ok(self.descriptors.get(&coordinate.identity()).cloned())
        }
    }

    fn pom(group: &str, artifact: &str, version: &str, dependencies: &str) -> String {
        format!(
            r#"<project>
    <groupId>{group}</groupId>
    <artifactId>{artifact}</artifactId>
    <version>{version}</version>
    <dependencies>
{dependencies}
    </dependencies>
</project>"#
        )
    }

    fn dependency(group: &str, artifact: &str, version: &str, extra: &str) -> String {
        format!(
            "        <dependency><groupId>{group}</groupId><artifactId>{artifact}</artifactId><version>{version}</version>{extra}</dependency>\n"
        )
    }

    fn direct_report(artifacts: &[(&str, &str, &str)]) -> ScanReport {
        ScanReport {
            coordinates: artifacts
                .iter()
                .map(|(g, a, v)| {
                    DependencyCoordinate::new(*g, *a, *v, BuildTool::Maven).with_path(
                        vec!["com.example:root".to_string(), format!("{}:{}", g, a)],
                        true,
                    )
                })
                .collect(),
            build_tool: BuildTool::Maven,
            confidence: Confidence::High,
            best_effort: false,
        }
    }

    #[tokio::test]
    async fn test_expands_runtime_dependencies_with_paths() {
        let source = StubDescriptorSource::new().with_descriptor(
            "org.example:lib-a:1.0.0",
            &pom(
                "org.example",
                "lib-a",
                "1.0.0",
                &(dependency("org.example", "lib-b", "2.0.0", "")
                    + &dependency(
                        "junit",
                        "junit",
                        "4.13.2",
                        "<scope>test</scope>",
                    )),
            ),
        );

        let mut report = direct_report(&[("org.example", "lib-a", "1.0.0")]);
        MavenResolver::new(Arc::new(source)).expand(&mut report).await;

        assert_eq!(report.coordinates.len(), 2);
        let transitive = &report.coordinates[1];
        assert!(!transitive.direct);
        assert_eq!(transitive.identity(), "org.example:lib-b:2.0.0");
        assert_eq!(
            transitive.path,
            vec![
                "com.example:root",
                "org.example:lib-a",
                "org.example:lib-b"
            ]
        );
        // The test-scoped entry never reaches consumers
        assert!(!report.coordinates.iter().any(|c| c.artifact_id == "junit"));
    }

    #[tokio::test]
    async fn test_walks_multiple_levels() {
        let source = StubDescriptorSource::new()
            .with_descriptor(
                "org.example:lib-a:1.0.0",
                &pom(
                    "org.example",
                    "lib-a",
                    "1.0.0",
                    &dependency("org.example", "lib-b", "2.0.0", ""),
                ),
            )
            .with_descriptor(
                "org.example:lib-b:2.0.0",
                &pom(
                    "org.example",
                    "lib-b",
                    "2.0.0",
                    &dependency("org.example", "lib-c", "3.0.0", ""),
                ),
            );

        let mut report = direct_report(&[("org.example", "lib-a", "1.0.0")]);
        MavenResolver::new(Arc::new(source)).expand(&mut report).await;

        let identities: Vec<String> =
            report.coordinates.iter().map(|c| c.identity()).collect();
        assert_eq!(
            identities,
            vec![
                "org.example:lib-a:1.0.0",
                "org.example:lib-b:2.0.0",
                "org.example:lib-c:3.0.0"
            ]
        );
        assert_eq!(report.coordinates[2].path.len(), 4);
    }

    #[tokio::test]
    async fn test_cycles_terminate_and_nearest_declaration_wins() {
        let source = StubDescriptorSource::new()
            .with_descriptor(
                "org.example:lib-a:1.0.0",
                &pom(
                    "org.example",
                    "lib-a",
                    "1.0.0",
                    &dependency("org.example", "lib-b", "2.0.0", ""),
                ),
            )
            .with_descriptor(
                "org.example:lib-b:2.0.0",
                &pom(
                    "org.example",
                    "lib-b",
                    "2.0.0",
                    // Cycle back plus a deeper redeclaration of lib-b itself
                    &(dependency("org.example", "lib-a", "1.0.0", "")
                        + &dependency("org.example", "lib-b", "9.9.9", "")),
                ),
            );

        let mut report = direct_report(&[("org.example", "lib-a", "1.0.0")]);
        MavenResolver::new(Arc::new(source)).expand(&mut report).await;

        assert_eq!(report.coordinates.len(), 2);
        assert_eq!(report.coordinates[1].version, "2.0.0");
    }

    #[tokio::test]
    async fn test_shared_transitive_appears_once() {
        let shared = dependency("org.example", "shared", "1.0.0", "");
        let source = StubDescriptorSource::new()
            .with_descriptor(
                "org.example:lib-a:1.0.0",
                &pom("org.example", "lib-a", "1.0.0", &shared),
            )
            .with_descriptor(
                "org.example:lib-b:2.0.0",
                &pom("org.example", "lib-b", "2.0.0", &shared),
            );

        let mut report = direct_report(&[
            ("org.example", "lib-a", "1.0.0"),
            ("org.example", "lib-b", "2.0.0"),
        ]);
        MavenResolver::new(Arc::new(source)).expand(&mut report).await;

        assert_eq!(report.coordinates.len(), 3);
        // Reached through lib-a, the earlier declaration
        assert_eq!(
            report.coordinates[2].path,
            vec![
                "com.example:root",
                "org.example:lib-a",
                "org.example:shared"
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_direct_coordinates() {
        let mut report = direct_report(&[("org.example", "lib-a", "1.0.0")]);
        MavenResolver::new(Arc::new(StubDescriptorSource::failing()))
            .expand(&mut report)
            .await;

        assert_eq!(report.coordinates.len(), 1);
        assert!(report.coordinates[0].direct);
    }

    #[tokio::test]
    async fn test_depth_bound_stops_the_walk() {
        let source = StubDescriptorSource::new()
            .with_descriptor(
                "org.example:lib-a:1.0.0",
                &pom(
                    "org.example",
                    "lib-a",
                    "1.0.0",
                    &dependency("org.example", "lib-b", "2.0.0", ""),
                ),
            )
            .with_descriptor(
                "org.example:lib-b:2.0.0",
                &pom(
                    "org.example",
                    "lib-b",
                    "2.0.0",
                    &dependency("org.example", "lib-c", "3.0.0", ""),
                ),
            );

        let mut report = direct_report(&[("org.example", "lib-a", "1.0.0")]);
        MavenResolver::new(Arc::new(source))
            .with_max_path_length(3)
            .expand(&mut report)
            .await;

        // lib-b is reached (path length 3); its children are not walked
        assert_eq!(report.coordinates.len(), 2);
    }

    #[tokio::test]
    async fn test_unresolved_versions_are_not_followed() {
        let source = StubDescriptorSource::new().with_descriptor(
            "org.example:lib-a:1.0.0",
            &pom(
                "org.example",
                "lib-a",
                "1.0.0",
                &dependency("org.example", "lib-b", "${managed.elsewhere}", ""),
            ),
        );

        let mut report = direct_report(&[("org.example", "lib-a", "1.0.0")]);
        MavenResolver::new(Arc::new(source)).expand(&mut report).await;

        assert_eq!(report.coordinates.len(), 1);
    }
}
