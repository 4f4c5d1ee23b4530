//! GitLab workflow commands: issues, merge requests, members.
//!
//! Every command resolves the project from the `origin` remote of the
//! repository containing the current directory.

pub mod issue;
pub mod members;
pub mod missing;
pub mod mr;

use thiserror::Error;

use crate::git::{GitError, Repo};
use crate::gitlab::{GitLabClient, GitLabError, Project};

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Api(#[from] GitLabError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlowError>;

/// Parse a user-supplied numeric identifier.
/// Malformed input is a validation failure: reported, nothing attempted.
pub fn parse_id(raw: &str, what: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| FlowError::Validation(format!("{what} must be an integer, got '{raw}'")))
}

/// Extract the `namespace/project` path from an `origin` remote URL.
///
/// Supports scp-like (`git@host:group/proj.git`) and URL
/// (`https://host/group/proj.git`, `ssh://git@host/group/proj.git`) forms.
pub fn project_path_from_remote_url(url: &str) -> Option<String> {
    let url = url.trim();

    let path = if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("ssh://"))
    {
        let rest = rest.split_once('@').map_or(rest, |(_, r)| r);
        rest.split_once('/')?.1
    } else if let Some((_, path)) = url.split_once(':') {
        path
    } else {
        return None;
    };

    let path = path.trim_start_matches('/').trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() || !path.contains('/') {
        return None;
    }
    Some(path.to_string())
}

/// Look up the project behind this repository's `origin` remote.
pub async fn resolve_project(repo: &Repo, client: &GitLabClient) -> Result<Project> {
    let url = repo.run(&["config", "--get", "remote.origin.url"])?;
    let path = project_path_from_remote_url(&url).ok_or_else(|| {
        FlowError::Validation(format!("origin URL '{}' is not a project URL", url.trim()))
    })?;
    Ok(client.project(&path).await?)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::scp("git@gitlab.example.com:ops/infra.git", "ops/infra")]
    #[case::scp_no_git("git@gitlab.example.com:ops/infra", "ops/infra")]
    #[case::https("https://gitlab.example.com/ops/infra.git", "ops/infra")]
    #[case::https_no_git("https://gitlab.example.com/ops/infra", "ops/infra")]
    #[case::ssh_url("ssh://git@gitlab.example.com/ops/infra.git", "ops/infra")]
    #[case::nested_group("git@gitlab.example.com:ops/fleet/infra.git", "ops/fleet/infra")]
    #[case::trailing_newline("git@gitlab.example.com:ops/infra.git\n", "ops/infra")]
    fn project_path_is_extracted(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(project_path_from_remote_url(url).as_deref(), Some(expected));
    }

    #[rstest]
    #[case::local_path("/srv/git/repo")]
    #[case::no_namespace("https://gitlab.example.com/infra.git")]
    #[case::empty("")]
    fn unrecognized_urls_yield_none(#[case] url: &str) {
        assert_eq!(project_path_from_remote_url(url), None);
    }

    #[rstest]
    #[case("12", 12)]
    #[case(" 7 ", 7)]
    fn parse_id_accepts_integers(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(parse_id(raw, "Issue ID").unwrap(), expected);
    }

    #[rstest]
    #[case::word("twelve")]
    #[case::negative("-3")]
    #[case::empty("")]
    fn parse_id_rejects_non_integers(#[case] raw: &str) {
        let err = parse_id(raw, "Issue ID").unwrap_err();
        match err {
            FlowError::Validation(message) => assert!(message.contains("Issue ID")),
            other => panic!("expected Validation, got: {other:?}"),
        }
    }
}
