use crate::ports::outbound::{DescriptorSource, RegistrySource};
use crate::risk_analysis::domain::DependencyCoordinate;
use crate::shared::Result;
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;

/// Maven Central client for fetching package descriptors
///
/// Downloads the published `.pom` for a coordinate and recovers the
/// source-control URL from its `<scm>` block: the explicit `<url>`
/// element is preferred, falling back to `<connection>`.
pub struct MavenCentralClient {
    client: reqwest::Client,
    base_url: String,
}

impl MavenCentralClient {
    const BASE_URL: &'static str = "https://repo1.maven.org/maven2";
    const TIMEOUT_SECONDS: u64 = 10;

    /// Creates a new Maven Central client with default configuration
    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("depsentry/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: Self::BASE_URL.to_string(),
        })
    }

    /// Overrides the repository root; used by tests against a local server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builds the descriptor URL:
    /// `<base>/<group/as/path>/<artifact>/<version>/<artifact>-<version>.pom`
    fn pom_url(&self, coordinate: &DependencyCoordinate) -> String {
        let group_path = coordinate.group_id.replace('.', "/");
        let artifact = urlencoding::encode(&coordinate.artifact_id);
        let version = urlencoding::encode(&coordinate.version);
        format!(
            "{}/{}/{}/{}/{}-{}.pom",
            self.base_url, group_path, artifact, version, artifact, version
        )
    }

    /// Extracts the SCM URL from descriptor XML.
    ///
    /// Checks `<scm><url>` first and falls back to `<scm><connection>`,
    /// stripping the `scm:git:` style prefix from connection strings.
    fn extract_scm_url(content: &str) -> Option<String> {
        let mut reader = Reader::from_str(content);
        let mut buf = Vec::new();

        let mut in_scm = false;
        let mut current_tag: Option<String> = None;
        let mut url: Option<String> = None;
        let mut connection: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if name == "scm" {
                        in_scm = true;
                    } else if in_scm {
                        current_tag = Some(name);
                    }
                }
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if name == "scm" {
                        in_scm = false;
                    }
                    current_tag = None;
                }
                Ok(Event::Text(t)) => {
                    if in_scm {
                        if let Some(tag) = current_tag.as_deref() {
                            let txt = reader
                                .decoder()
                                .decode(t.as_ref())
                                .unwrap_or_default()
                                .trim()
                                .to_string();
                            if txt.is_empty() {
                                continue;
                            }
                            match tag {
                                "url" if url.is_none() => url = Some(txt),
                                "connection" if connection.is_none() => connection = Some(txt),
                                _ => {}
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(_) => return None,
                _ => {}
            }
            buf.clear();
        }

        url.or_else(|| connection.map(|c| Self::strip_connection_prefix(&c)))
    }

    /// `scm:git:https://github.com/x/y.git` -> `https://github.com/x/y.git`
    fn strip_connection_prefix(connection: &str) -> String {
        connection
            .strip_prefix("scm:")
            .map(|rest| match rest.split_once(':') {
                Some((_, url)) if url.contains("://") => url.to_string(),
                _ => rest.to_string(),
            })
            .unwrap_or_else(|| connection.to_string())
    }
}

#[async_trait]
impl DescriptorSource for MavenCentralClient {
    async fn fetch_descriptor(&self, coordinate: &DependencyCoordinate) -> Result<Option<String>> {
        let url = self.pom_url(coordinate);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!(
                "Maven Central returned status code {} for {}",
                response.status(),
                coordinate.identity()
            );
        }

        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl RegistrySource for MavenCentralClient {
    async fn fetch_scm_url(&self, coordinate: &DependencyCoordinate) -> Result<Option<String>> {
        match self.fetch_descriptor(coordinate).await? {
            Some(content) => Ok(Self::extract_scm_url(&content)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk_analysis::domain::BuildTool;

    #[test]
    fn test_pom_url_layout() {
        let client = MavenCentralClient::new().unwrap();
        let coord = DependencyCoordinate::new(
            "org.apache.commons",
            "commons-lang3",
            "3.12.0",
            BuildTool::Maven,
        );
        assert_eq!(
            client.pom_url(&coord),
            "https://repo1.maven.org/maven2/org/apache/commons/commons-lang3/3.12.0/commons-lang3-3.12.0.pom"
        );
    }

    #[test]
    fn test_extract_scm_url_prefers_url_element() {
        let pom = r#"<project>
    <scm>
        <connection>scm:git:git://github.com/apache/commons-lang.git</connection>
        <url>https://github.com/apache/commons-lang</url>
    </scm>
</project>"#;
        assert_eq!(
            MavenCentralClient::extract_scm_url(pom),
            Some("https://github.com/apache/commons-lang".to_string())
        );
    }

    #[test]
    fn test_extract_scm_url_falls_back_to_connection() {
        let pom = r#"<project>
    <scm>
        <connection>scm:git:https://github.com/junit-team/junit4.git</connection>
    </scm>
</project>"#;
        assert_eq!(
            MavenCentralClient::extract_scm_url(pom),
            Some("https://github.com/junit-team/junit4.git".to_string())
        );
    }

    #[test]
    fn test_extract_scm_url_absent() {
        let pom = "<project><url>https://example.org</url></project>";
        assert_eq!(MavenCentralClient::extract_scm_url(pom), None);
    }

    #[test]
    fn test_strip_connection_prefix() {
        assert_eq!(
            MavenCentralClient::strip_connection_prefix(
                "scm:git:https://github.com/x/y.git"
            ),
            "https://github.com/x/y.git"
        );
        assert_eq!(
            MavenCentralClient::strip_connection_prefix("https://github.com/x/y.git"),
            "https://github.com/x/y.git"
        );
    }
}
