//! Serde models for the subset of the GitLab v4 API this tool consumes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    pub path_with_namespace: String,
    pub web_url: String,
    pub description: Option<String>,
    pub ssh_url_to_repo: Option<String>,
    pub http_url_to_repo: Option<String>,
}

impl Project {
    /// Remote URLs a local clone of this project may carry as `origin`.
    pub fn remote_urls(&self) -> impl Iterator<Item = &str> {
        self.ssh_url_to_repo
            .iter()
            .chain(self.http_url_to_repo.iter())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub state: String,
    pub author: Option<User>,
    pub assignee: Option<User>,
}

impl Issue {
    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }

    pub fn author_name(&self) -> &str {
        self.author.as_ref().map(|a| a.name.as_str()).unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequest {
    pub iid: u64,
    pub title: String,
    pub state: String,
    pub source_branch: String,
    pub created_at: DateTime<Utc>,
    pub assignee: Option<User>,
}

impl MergeRequest {
    /// Closed or merged requests drop out of the default listing.
    pub fn is_settled(&self) -> bool {
        self.state == "closed" || self.state == "merged"
    }
}

/// The `changes` endpoint: merge request attributes plus its diffs.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequestChanges {
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub author: Option<User>,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    pub old_path: String,
    pub new_path: String,
    pub diff: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Note {
    pub body: String,
    pub author: User,
    #[serde(default)]
    pub system: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub id: u64,
    pub name: String,
}
