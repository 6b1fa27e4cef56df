//! Thin client for the GitHub REST API.
//!
//! Endpoint coverage is deliberately small: repository metadata, one
//! recursive tree listing, and single-file content (used only for
//! `.gitmodules`). Retry and backoff for transient failures live here;
//! status-code translation happens once, at this boundary.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{
    ACCEPT, ETAG, HeaderMap, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::cache::Validators;
use crate::config::Config;
use crate::{log_debug, trace_debug, trace_warn};

use super::error::GitHubError;
use super::types::{RepoCoordinate, Repository, TreeItem};

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("repo-atlas/", env!("CARGO_PKG_VERSION"));

/// Outcome of a (possibly conditional) metadata request.
#[derive(Debug)]
pub enum MetadataResponse {
    /// Validators matched; the cached copy is still current.
    NotModified,
    /// Fresh metadata plus the validators to cache alongside it.
    Fresh {
        repository: Repository,
        validators: Validators,
    },
}

/// The remote repository API as the pipeline consumes it.
///
/// The orchestrator only talks to this trait, so tests can drive it with a
/// programmable fake.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Repository metadata, optionally revalidated against cached validators.
    async fn repository(
        &self,
        coordinate: &RepoCoordinate,
        validators: Option<&Validators>,
    ) -> Result<MetadataResponse, GitHubError>;

    /// Flat recursive tree listing for a commit or branch reference.
    async fn tree(
        &self,
        coordinate: &RepoCoordinate,
        reference: &str,
    ) -> Result<Vec<TreeItem>, GitHubError>;

    /// Decoded UTF-8 content of a single file at a reference.
    async fn file_content(
        &self,
        coordinate: &RepoCoordinate,
        path: &str,
        reference: &str,
    ) -> Result<String, GitHubError>;
}

/// Shape of `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`.
#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeItem>,
}

/// Shape of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

/// Represents the GitHub REST API client
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl GitHubClient {
    /// Creates a client configured from the application config: API base
    /// URL, per-request timeout, and retry budget.
    pub fn new(config: &Config) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    /// Sends a GET, retrying transport and server errors with exponential
    /// backoff. The returned response may still carry a client error
    /// status; callers translate it.
    async fn get_with_retry(
        &self,
        url: &str,
        validators: Option<&Validators>,
    ) -> Result<Response, GitHubError> {
        let strategy = ExponentialBackoff::from_millis(250)
            .map(jitter)
            .take(self.max_retries as usize);

        Retry::spawn(strategy, || async {
            let mut request = self.http.get(url);
            if let Some(validators) = validators {
                if let Some(etag) = &validators.etag {
                    request = request.header(IF_NONE_MATCH, etag.as_str());
                }
                if let Some(last_modified) = &validators.last_modified {
                    request = request.header(IF_MODIFIED_SINCE, last_modified.as_str());
                }
            }

            let response = request.send().await.map_err(GitHubError::from)?;
            if response.status().is_server_error() {
                trace_warn!(target: "repo_atlas::http", "GET {} -> {}", url, response.status());
                return Err(GitHubError::Unknown {
                    status: response.status().as_u16(),
                    message: "server error".to_string(),
                });
            }
            trace_debug!(target: "repo_atlas::http", "GET {} -> {}", url, response.status());
            Ok(response)
        })
        .await
    }

    /// Translates a non-success response into the closed error set.
    async fn response_error(response: Response) -> GitHubError {
        let status = response.status();
        let rate_limit_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|value| value.to_str().ok())
            .is_some_and(|remaining| remaining.trim() == "0");
        let message = response.text().await.unwrap_or_default();
        GitHubError::from_status(status, rate_limit_exhausted, message)
    }

    fn extract_validators(headers: &HeaderMap) -> Validators {
        Validators {
            etag: headers
                .get(ETAG)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            last_modified: headers
                .get(LAST_MODIFIED)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
        }
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn repository(
        &self,
        coordinate: &RepoCoordinate,
        validators: Option<&Validators>,
    ) -> Result<MetadataResponse, GitHubError> {
        let url = format!("{}/repos/{}", self.base_url, coordinate);
        log_debug!("Fetching repository metadata: {}", url);

        let response = self.get_with_retry(&url, validators).await?;
        if response.status() == StatusCode::NOT_MODIFIED {
            log_debug!("Repository {} not modified", coordinate);
            return Ok(MetadataResponse::NotModified);
        }
        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        let validators = Self::extract_validators(response.headers());
        let repository = response.json::<Repository>().await?;
        Ok(MetadataResponse::Fresh {
            repository,
            validators,
        })
    }

    async fn tree(
        &self,
        coordinate: &RepoCoordinate,
        reference: &str,
    ) -> Result<Vec<TreeItem>, GitHubError> {
        let url = format!(
            "{}/repos/{}/git/trees/{}?recursive=1",
            self.base_url, coordinate, reference
        );
        log_debug!("Fetching recursive tree: {}", url);

        let response = self.get_with_retry(&url, None).await?;
        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        let body = response.json::<TreeResponse>().await?;
        Ok(body.tree)
    }

    async fn file_content(
        &self,
        coordinate: &RepoCoordinate,
        path: &str,
        reference: &str,
    ) -> Result<String, GitHubError> {
        let url = format!(
            "{}/repos/{}/contents/{}?ref={}",
            self.base_url, coordinate, path, reference
        );
        log_debug!("Fetching file content: {}", url);

        let response = self.get_with_retry(&url, None).await?;
        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        let body = response.json::<ContentResponse>().await?;
        if !body.encoding.is_empty() && body.encoding != "base64" {
            return Err(GitHubError::Decode(format!(
                "unsupported encoding '{}'",
                body.encoding
            )));
        }

        // The API wraps base64 payloads at 60 columns
        let compact: String = body
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| GitHubError::Decode(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| GitHubError::Decode(e.to_string()))
    }
}
