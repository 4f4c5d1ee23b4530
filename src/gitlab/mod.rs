//! GitLab v4 REST API access.

mod client;
mod error;
mod models;

pub use client::GitLabClient;
pub use error::GitLabError;
pub use models::{Change, Issue, Member, MergeRequest, MergeRequestChanges, Note, Project, User};
