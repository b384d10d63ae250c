use std::time::Duration;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, header};
use serde::Deserialize;
use log::debug;

use crate::errors::RepositoryError;
use super::DocumentRepository;

/// Environment variable holding the GitHub access token
pub const AUTH_ENV_VAR: &str = "GITHUB_AUTH_KEY";

const API_BASE: &str = "https://api.github.com";

/// GitHub REST client scoped to a single repository
#[derive(Debug)]
pub struct GithubClient {
    /// HTTP client for API requests
    client: Client,
    /// Repository identifier ("owner/name")
    repo: String,
    /// Access token
    token: String,
    /// API base URL, overridable for tests
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct BranchInfo {
    commit: BranchCommit,
}

#[derive(Debug, Deserialize)]
struct BranchCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    encoding: String,
}

impl GithubClient {
    /// Create a client for `repo`, reading the access token from the
    /// process environment
    pub fn from_env(repo: impl Into<String>) -> Result<Self, RepositoryError> {
        let token = std::env::var(AUTH_ENV_VAR)
            .map_err(|_| RepositoryError::MissingCredential(AUTH_ENV_VAR.to_string()))?;
        Ok(Self::new(repo, token, API_BASE))
    }

    /// Create a client with an explicit token and API base URL
    pub fn new(repo: impl Into<String>, token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            repo: repo.into(),
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, RepositoryError> {
        let response = self.client.get(url)
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::USER_AGENT, concat!("doctrans/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| RepositoryError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(RepositoryError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await
            .map_err(|e| RepositoryError::RequestFailed(format!("Failed to parse response: {}", e)))
    }

    async fn default_branch_sha(&self) -> Result<String, RepositoryError> {
        let repo_info: RepoInfo = self
            .get_json(&format!("{}/repos/{}", self.api_base, self.repo))
            .await?;

        let branch: BranchInfo = self
            .get_json(&format!("{}/repos/{}/branches/{}", self.api_base, self.repo, repo_info.default_branch))
            .await?;

        Ok(branch.commit.sha)
    }
}

#[async_trait]
impl DocumentRepository for GithubClient {
    /// List every blob under `root` on the default branch, using the
    /// recursive git tree API
    async fn list_documents(&self, root: &str) -> Result<Vec<String>, RepositoryError> {
        let sha = self.default_branch_sha().await?;

        let tree: TreeResponse = self
            .get_json(&format!("{}/repos/{}/git/trees/{}?recursive=1", self.api_base, self.repo, sha))
            .await?;

        let prefix = format!("{}/", root.trim_end_matches('/'));
        let paths: Vec<String> = tree.tree.into_iter()
            .filter(|entry| entry.entry_type == "blob" && entry.path.starts_with(&prefix))
            .map(|entry| entry.path)
            .collect();

        debug!("Listed {} blobs under {} in {}", paths.len(), root, self.repo);
        Ok(paths)
    }

    /// Fetch file content through the contents API and decode it
    async fn fetch_content(&self, path: &str) -> Result<String, RepositoryError> {
        let content: ContentResponse = self
            .get_json(&format!("{}/repos/{}/contents/{}", self.api_base, self.repo, path))
            .await?;

        if content.encoding != "base64" {
            return Err(RepositoryError::Decode {
                path: path.to_string(),
                reason: format!("unexpected encoding '{}'", content.encoding),
            });
        }

        // The contents API wraps base64 payloads with newlines
        let compact: String = content.content.split_whitespace().collect();
        let bytes = BASE64.decode(compact.as_bytes())
            .map_err(|e| RepositoryError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        String::from_utf8(bytes).map_err(|e| RepositoryError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}
