use crate::ports::outbound::{RepoStats, RepoStatsSource};
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// GitHub API client for repository statistics
///
/// Fetches stars, open issues, and last-push time for repositories that
/// a package's SCM URL resolves to. Unauthenticated by default; an
/// optional token raises the rate limit.
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    const API_URL: &'static str = "https://api.github.com";
    const TIMEOUT_SECONDS: u64 = 10;

    /// Creates a new GitHub client with default configuration
    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("depsentry/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_url: Self::API_URL.to_string(),
            token: std::env::var("DEPSENTRY_GITHUB_TOKEN").ok(),
        })
    }

    /// Overrides the API root; used by tests against a local server
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRepoResponse {
    #[serde(default)]
    stargazers_count: Option<u64>,
    #[serde(default)]
    open_issues_count: Option<u64>,
    #[serde(default)]
    pushed_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl RepoStatsSource for GitHubClient {
    /// Resolves an SCM URL to an `owner/repo` slug when it points at
    /// github.com; anything else is unrecognized and skipped.
    fn recognize(&self, scm_url: &str) -> Option<String> {
        let after_host = scm_url
            .split_once("github.com")
            .map(|(_, rest)| rest.trim_start_matches([':', '/']))?;

        let mut segments = after_host.split('/');
        let owner = segments.next().filter(|s| !s.is_empty())?;
        let repo = segments.next().filter(|s| !s.is_empty())?;
        let repo = repo.trim_end_matches(".git");
        if repo.is_empty() {
            return None;
        }

        Some(format!("{}/{}", owner, repo))
    }

    async fn fetch_stats(&self, repo: &str) -> Result<RepoStats> {
        let url = format!("{}/repos/{}", self.api_url, repo);
        let mut request = self.client.get(&url).header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "GitHub API returned status code {} for {}",
                response.status(),
                repo
            );
        }

        let body: GitHubRepoResponse = response.json().await?;
        Ok(RepoStats {
            stars: body.stargazers_count,
            open_issues: body.open_issues_count,
            last_pushed_at: body.pushed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new().unwrap()
    }

    #[test]
    fn test_recognize_https_url() {
        assert_eq!(
            client().recognize("https://github.com/apache/commons-lang"),
            Some("apache/commons-lang".to_string())
        );
    }

    #[test]
    fn test_recognize_strips_git_suffix_and_extra_segments() {
        assert_eq!(
            client().recognize("https://github.com/junit-team/junit4.git"),
            Some("junit-team/junit4".to_string())
        );
        assert_eq!(
            client().recognize("https://github.com/apache/commons-lang/tree/master"),
            Some("apache/commons-lang".to_string())
        );
    }

    #[test]
    fn test_recognize_scm_git_url() {
        assert_eq!(
            client().recognize("git://github.com/square/okhttp.git"),
            Some("square/okhttp".to_string())
        );
        assert_eq!(
            client().recognize("git@github.com:square/okhttp.git"),
            Some("square/okhttp".to_string())
        );
    }

    #[test]
    fn test_recognize_rejects_other_hosts() {
        assert_eq!(client().recognize("https://gitlab.com/group/project"), None);
        assert_eq!(client().recognize("https://svn.example.org/repo"), None);
    }

    #[test]
    fn test_repo_response_deserialize() {
        let json = r#"{
            "stargazers_count": 45312,
            "open_issues_count": 187,
            "pushed_at": "2024-06-01T12:00:00Z",
            "full_name": "square/okhttp"
        }"#;
        let body: GitHubRepoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.stargazers_count, Some(45312));
        assert_eq!(body.open_issues_count, Some(187));
        assert!(body.pushed_at.is_some());
    }
}
