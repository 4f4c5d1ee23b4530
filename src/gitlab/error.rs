//! GitLab API error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitLabError {
    #[error("GitLab URL not configured (set gitlab.url in the config file)")]
    MissingUrl,

    #[error("GitLab token not configured (set gitlab.token or GITLAB_TOKEN)")]
    MissingToken,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitLab API returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl GitLabError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitLabError::Status { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, GitLabError>;
