use crate::risk_analysis::domain::{
    BuildTool, Confidence, DependencyCoordinate, ScanReport,
};
use crate::shared::error::ScanError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;

/// Scanner for Maven pom.xml descriptors.
///
/// Reads the declared descriptor in "safe mode": the XML is parsed
/// event-by-event and no build-tool code is ever executed. Property
/// placeholders are resolved against the descriptor's own `<properties>`
/// block and missing versions against `<dependencyManagement>`, which is
/// what the effective single-file descriptor can answer. Reports
/// confidence High.
pub struct MavenScanner;

impl Default for MavenScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Fallback version when neither the declaration, a property, nor
/// dependencyManagement resolves one.
pub(crate) const UNRESOLVED_VERSION: &str = "0.0.0";

/// One `<dependency>` entry as written in a descriptor, before it is
/// turned into a coordinate. Scope and the optional flag matter to the
/// resolution engine: test/provided/optional entries never reach
/// consumers of the artifact.
#[derive(Debug, Clone)]
pub(crate) struct DeclaredDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub scope: Option<String>,
    pub optional: bool,
}

#[derive(Default)]
struct DescriptorIndex {
    /// `<properties>` entries plus the implicit project.* properties
    properties: HashMap<String, String>,
    /// `group:artifact` -> version from `<dependencyManagement>`
    managed_versions: HashMap<String, String>,
    root_group: Option<String>,
    root_artifact: Option<String>,
}

impl MavenScanner {
    pub fn new() -> Self {
        Self
    }

    /// Parses the descriptor content into an ordered coordinate list
    pub fn parse(&self, content: &str, descriptor_path: &Path) -> Result<ScanReport, ScanError> {
        let index = self.index_descriptor(content, descriptor_path)?;
        let declared = self.extract_dependencies(content, &index, descriptor_path)?;

        let root_id = format!(
            "{}:{}",
            index.root_group.as_deref().unwrap_or("unknown"),
            index.root_artifact.as_deref().unwrap_or("root"),
        );

        let coordinates = declared
            .into_iter()
            .map(|d| {
                let id = format!("{}:{}", d.group_id, d.artifact_id);
                DependencyCoordinate::new(d.group_id, d.artifact_id, d.version, BuildTool::Maven)
                    .with_path(vec![root_id.clone(), id], true)
            })
            .collect();

        Ok(ScanReport {
            coordinates,
            build_tool: BuildTool::Maven,
            confidence: Confidence::High,
            best_effort: false,
        })
    }

    /// The declared `<dependencies>` entries of a descriptor, versions
    /// resolved as far as the single descriptor allows. Used by the
    /// resolution engine on fetched dependency descriptors.
    pub(crate) fn declared_dependencies(
        &self,
        content: &str,
        descriptor_path: &Path,
    ) -> Result<Vec<DeclaredDependency>, ScanError> {
        let index = self.index_descriptor(content, descriptor_path)?;
        self.extract_dependencies(content, &index, descriptor_path)
    }

    /// First pass: collect properties, the project identity, and managed
    /// versions so the dependency pass can resolve placeholders.
    fn index_descriptor(
        &self,
        content: &str,
        descriptor_path: &Path,
    ) -> Result<DescriptorIndex, ScanError> {
        let mut reader = Reader::from_str(content);
        let mut buf = Vec::new();
        let mut index = DescriptorIndex::default();

        let mut stack: Vec<String> = Vec::new();
        let mut dm_group: Option<String> = None;
        let mut dm_artifact: Option<String> = None;
        let mut dm_version: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if name == "dependency"
                        && stack.ends_with(&["dependencyManagement".into(), "dependencies".into()])
                    {
                        dm_group = None;
                        dm_artifact = None;
                        dm_version = None;
                    }
                    stack.push(name);
                }
                Ok(Event::End(_)) => {
                    if stack.last().map(String::as_str) == Some("dependency")
                        && stack.len() >= 3
                        && stack[stack.len() - 3] == "dependencyManagement"
                    {
                        if let (Some(g), Some(a), Some(v)) =
                            (dm_group.take(), dm_artifact.take(), dm_version.take())
                        {
                            index.managed_versions.insert(format!("{}:{}", g, a), v);
                        }
                    }
                    stack.pop();
                }
                Ok(Event::Text(t)) => {
                    let txt = reader
                        .decoder()
                        .decode(t.as_ref())
                        .unwrap_or_default()
                        .trim()
                        .to_string();
                    if txt.is_empty() {
                        continue;
                    }
                    match stack.as_slice() {
                        [p, tag] if p == "project" => match tag.as_str() {
                            "groupId" => index.root_group = Some(txt),
                            "artifactId" => index.root_artifact = Some(txt),
                            "version" => {
                                index.properties.insert("project.version".into(), txt);
                            }
                            _ => {}
                        },
                        [p, parent, tag] if p == "project" && parent == "parent" => {
                            // Parent supplies identity/version when the module omits them
                            match tag.as_str() {
                                "groupId" if index.root_group.is_none() => {
                                    index.root_group = Some(txt)
                                }
                                "version"
                                    if !index.properties.contains_key("project.version") =>
                                {
                                    index.properties.insert("project.version".into(), txt);
                                }
                                _ => {}
                            }
                        }
                        [p, props, key] if p == "project" && props == "properties" => {
                            index.properties.insert(key.clone(), txt);
                        }
                        [.., dm, deps, dep, tag]
                            if dm == "dependencyManagement"
                                && deps == "dependencies"
                                && dep == "dependency" =>
                        {
                            match tag.as_str() {
                                "groupId" => dm_group = Some(txt),
                                "artifactId" => dm_artifact = Some(txt),
                                "version" => dm_version = Some(txt),
                                _ => {}
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ScanError::ParseFailure {
                        path: descriptor_path.to_path_buf(),
                        details: format!("XML parse error: {}", e),
                    });
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(index)
    }

    /// Second pass: collect `<dependencies>` entries outside
    /// `<dependencyManagement>`, resolving versions through the index.
    fn extract_dependencies(
        &self,
        content: &str,
        index: &DescriptorIndex,
        descriptor_path: &Path,
    ) -> Result<Vec<DeclaredDependency>, ScanError> {
        let mut reader = Reader::from_str(content);
        let mut buf = Vec::new();
        let mut declared = Vec::new();

        let mut stack: Vec<String> = Vec::new();
        let mut group_id: Option<String> = None;
        let mut artifact_id: Option<String> = None;
        let mut version: Option<String> = None;
        let mut scope: Option<String> = None;
        let mut optional = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if name == "dependency" && Self::in_project_dependencies(&stack) {
                        group_id = None;
                        artifact_id = None;
                        version = None;
                        scope = None;
                        optional = false;
                    }
                    stack.push(name);
                }
                Ok(Event::End(_)) => {
                    let closing = stack.pop();
                    if closing.as_deref() == Some("dependency")
                        && Self::in_project_dependencies(&stack)
                    {
                        if let (Some(g), Some(a)) = (group_id.take(), artifact_id.take()) {
                            let v = self.resolve_version(&g, &a, version.take(), index);
                            declared.push(DeclaredDependency {
                                group_id: g,
                                artifact_id: a,
                                version: v,
                                scope: scope.take(),
                                optional,
                            });
                        }
                    }
                }
                Ok(Event::Text(t)) => {
                    if stack.len() >= 2
                        && stack[stack.len() - 2] == "dependency"
                        && Self::in_project_dependencies(&stack[..stack.len() - 2])
                    {
                        let txt = reader
                            .decoder()
                            .decode(t.as_ref())
                            .unwrap_or_default()
                            .trim()
                            .to_string();
                        if txt.is_empty() {
                            continue;
                        }
                        match stack.last().map(String::as_str) {
                            Some("groupId") => group_id = Some(txt),
                            Some("artifactId") => artifact_id = Some(txt),
                            Some("version") => version = Some(txt),
                            Some("scope") => scope = Some(txt),
                            Some("optional") => optional = txt == "true",
                            _ => {}
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ScanError::ParseFailure {
                        path: descriptor_path.to_path_buf(),
                        details: format!("XML parse error: {}", e),
                    });
                }
                _ => {}
            }
            buf.clear();
        }

        Ok(declared)
    }

    /// True when the element path is `project > dependencies`, i.e. not a
    /// dependencyManagement or profile-nested block.
    fn in_project_dependencies(stack: &[String]) -> bool {
        stack.len() == 2 && stack[0] == "project" && stack[1] == "dependencies"
    }

    /// Resolves a declared version through properties and dependencyManagement
    fn resolve_version(
        &self,
        group_id: &str,
        artifact_id: &str,
        declared: Option<String>,
        index: &DescriptorIndex,
    ) -> String {
        match declared {
            Some(v) if v.starts_with("${") && v.ends_with('}') => {
                let property = &v[2..v.len() - 1];
                index
                    .properties
                    .get(property)
                    .cloned()
                    .unwrap_or_else(|| UNRESOLVED_VERSION.to_string())
            }
            Some(v) => v,
            None => index
                .managed_versions
                .get(&format!("{}:{}", group_id, artifact_id))
                .cloned()
                .unwrap_or_else(|| UNRESOLVED_VERSION.to_string()),
        }
    }
}
