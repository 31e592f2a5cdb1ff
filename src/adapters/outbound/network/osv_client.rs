use crate::ports::outbound::{VulnerabilitySignal, VulnerabilitySource};
use crate::risk_analysis::domain::{DependencyCoordinate, MAX_VULNERABILITY_IDS};
use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OSV API client for fetching vulnerability data
///
/// Queries the OSV.dev single-package endpoint by ecosystem + name +
/// version. Returned advisory identifiers are truncated to
/// MAX_VULNERABILITY_IDS to bound payload size.
///
/// Callers treat any error from this client as zero signal; the
/// aggregator never fails an analysis because OSV was down.
pub struct OsvClient {
    client: reqwest::Client,
    api_url: String,
}

impl OsvClient {
    const API_ENDPOINT: &'static str = "https://api.osv.dev/v1/query";
    const TIMEOUT_SECONDS: u64 = 15;

    /// Creates a new OSV API client with default configuration
    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("depsentry/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_url: Self::API_ENDPOINT.to_string(),
        })
    }

    /// Overrides the endpoint; used by tests against a local server
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[async_trait]
impl VulnerabilitySource for OsvClient {
    async fn query(&self, coordinate: &DependencyCoordinate) -> Result<VulnerabilitySignal> {
        let query = OsvQuery {
            package: OsvPackage {
                name: coordinate.package_name(),
                ecosystem: "Maven".to_string(),
            },
            version: coordinate.version.clone(),
        };

        let response = self.client.post(&self.api_url).json(&query).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("OSV API returned status code {}", response.status());
        }

        let osv_response: OsvResponse = response.json().await?;

        let count = osv_response.vulns.len() as u32;
        let ids = osv_response
            .vulns
            .into_iter()
            .take(MAX_VULNERABILITY_IDS)
            .map(|v| v.id)
            .collect();

        Ok(VulnerabilitySignal { count, ids })
    }
}

// OSV API request/response structures

#[derive(Debug, Serialize)]
struct OsvQuery {
    package: OsvPackage,
    version: String,
}

#[derive(Debug, Serialize)]
struct OsvPackage {
    name: String,
    ecosystem: String, // "Maven"
}

#[derive(Debug, Deserialize)]
struct OsvResponse {
    #[serde(default)]
    vulns: Vec<OsvVulnerability>,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerability {
    id: String,
}
