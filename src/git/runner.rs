//! Process-level access to the `git` command-line interface.
//!
//! Every operation in this crate goes through [`Repo::run`]: a discrete
//! `git` invocation against an explicit working directory, returning stdout
//! on success and the command's stderr wrapped in a [`GitError`] otherwise.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::error::{GitError, Result};

/// Handle to a single local repository clone.
///
/// The handle carries the working directory and the environment additions
/// (an optional HTTPS proxy) so callers never rely on the process-wide
/// current directory.
#[derive(Debug, Clone)]
pub struct Repo {
    workdir: PathBuf,
    proxy: Option<String>,
}

impl Repo {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            proxy: None,
        }
    }

    /// Set the HTTPS proxy passed to every git invocation as `https_proxy`.
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Open the repository containing the current directory.
    /// Fails when the current directory is not a checkout root.
    pub fn open_current(proxy: Option<String>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let repo = Self::new(cwd).with_proxy(proxy);
        if !repo.is_repository() {
            return Err(GitError::NotARepository(repo.workdir));
        }
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.workdir
    }

    /// Whether the working directory contains a `.git` entry.
    pub fn is_repository(&self) -> bool {
        self.workdir.join(".git").exists()
    }

    /// Run `git <args>` in this repository and return its stdout.
    ///
    /// A non-zero exit surfaces as [`GitError::Process`] carrying the
    /// command's stderr.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        debug!(dir = %self.workdir.display(), args = ?args, "git");

        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.workdir);
        if let Some(proxy) = &self.proxy {
            cmd.env("https_proxy", proxy);
        }

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(GitError::Process {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::TestRepo;

    use super::*;

    #[test]
    fn run_returns_stdout_of_successful_command() {
        let fixture = TestRepo::new();
        let repo = fixture.repo();

        let out = repo.run(&["rev-parse", "--abbrev-ref", "HEAD"]).unwrap();
        assert_eq!(out.trim(), "master");
    }

    #[test]
    fn run_maps_nonzero_exit_to_process_error() {
        let fixture = TestRepo::new();
        let repo = fixture.repo();

        let err = repo.run(&["rev-parse", "no-such-ref"]).unwrap_err();
        match err {
            GitError::Process { command, stderr } => {
                assert_eq!(command, "rev-parse no-such-ref");
                assert!(!stderr.is_empty());
            }
            other => panic!("expected Process error, got: {other:?}"),
        }
    }

    #[test]
    fn is_repository_detects_checkouts() {
        let fixture = TestRepo::new();
        assert!(fixture.repo().is_repository());

        let plain = tempfile::tempdir().unwrap();
        assert!(!Repo::new(plain.path()).is_repository());
    }

}
