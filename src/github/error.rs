//! Error taxonomy for the GitHub pipeline.

use reqwest::StatusCode;

/// Failures surfaced by the fetch pipeline.
///
/// HTTP statuses are translated exactly once, in [`GitHubError::from_status`];
/// nothing else in the pipeline inspects status codes. The `#[error]`
/// messages are the user-facing text.
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    #[error("Repository not found. Please check if the repository URL is correct.")]
    NotFound,

    #[error("Access forbidden. This might be due to rate limiting or the repository being private.")]
    Forbidden,

    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Authentication required. This repository might be private.")]
    Unauthorized,

    #[error("Repository is empty or the default branch is not available.")]
    Conflict,

    #[error("This repository is private. Please make sure the repository is public.")]
    PrivateRepository,

    #[error("No valid tree items found. The repository appears to be empty.")]
    EmptyTree,

    #[error(
        "'{0}' is not a GitHub repository. Expected 'owner/repo' or https://github.com/owner/repo."
    )]
    InvalidRepository(String),

    #[error("Failed to decode file content: {0}")]
    Decode(String),

    #[error("Failed to fetch repository structure: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API request failed with status {status}: {message}")]
    Unknown { status: u16, message: String },
}

impl GitHubError {
    /// Maps a non-success HTTP status to an error kind.
    ///
    /// A 403 counts as rate limiting only when the response said the quota
    /// is exhausted; otherwise it is a plain access failure.
    pub fn from_status(status: StatusCode, rate_limit_exhausted: bool, message: String) -> Self {
        match status.as_u16() {
            404 => Self::NotFound,
            401 => Self::Unauthorized,
            409 => Self::Conflict,
            403 if rate_limit_exhausted => Self::RateLimited,
            403 => Self::Forbidden,
            other => Self::Unknown {
                status: other,
                message,
            },
        }
    }
}
