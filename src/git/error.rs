//! Git error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("`git {command}` failed: {stderr}")]
    Process { command: String, stderr: String },

    #[error("Fast-forward merge not possible: {0}")]
    NonFastForward(String),

    #[error("Failed to run git: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GitError>;
