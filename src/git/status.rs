//! Synchronization-state classification.
//!
//! The classifier compares three resolved commits — the local branch tip,
//! the remote branch tip, and their merge base — and produces exactly one
//! [`SyncState`]. All remote-tracking data is refreshed before comparison;
//! a failing refresh is an error, never a silent `UpToDate`.

use super::error::Result;
use super::runner::Repo;

/// An opaque, comparable commit identifier.
///
/// Two ids are equal iff they denote the same commit. Built from trimmed
/// `rev-parse` / `merge-base` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Relationship between a local branch and its remote counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    UpToDate,
    NeedsPull,
    NeedsPush,
    Diverged,
}

impl SyncState {
    /// Classify from the resolved (local, remote, merge-base) triple.
    ///
    /// Strict partition, checked in priority order. The fully-degenerate
    /// case (all three equal) lands on `UpToDate` because the equality
    /// check runs first.
    pub fn classify(local: &CommitId, remote: &CommitId, base: &CommitId) -> Self {
        if local == remote {
            // merge-base of two equal commits is that commit
            debug_assert!(local == base);
            return SyncState::UpToDate;
        }
        if local == base {
            return SyncState::NeedsPull;
        }
        if remote == base {
            return SyncState::NeedsPush;
        }
        SyncState::Diverged
    }

    pub fn label(&self) -> &'static str {
        match self {
            SyncState::UpToDate => "Up-to-date",
            SyncState::NeedsPull => "Need to pull",
            SyncState::NeedsPush => "Need to push",
            SyncState::Diverged => "Diverged",
        }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Refresh all remote-tracking refs.
pub fn update_remote(repo: &Repo) -> Result<()> {
    repo.run(&["remote", "update"])?;
    Ok(())
}

/// Resolve a revision expression to a commit id.
pub fn rev_parse(repo: &Repo, rev: &str) -> Result<CommitId> {
    Ok(CommitId::new(repo.run(&["rev-parse", rev])?))
}

/// Most recent common ancestor of two revisions.
pub fn merge_base(repo: &Repo, a: &str, b: &str) -> Result<CommitId> {
    Ok(CommitId::new(repo.run(&["merge-base", a, b])?))
}

/// Name of the currently checked-out branch (`HEAD` when detached).
pub fn current_branch(repo: &Repo) -> Result<String> {
    Ok(repo
        .run(&["rev-parse", "--abbrev-ref", "HEAD"])?
        .trim()
        .to_string())
}

/// A repository is clean iff the working tree has no changes against HEAD.
pub fn is_clean(repo: &Repo) -> Result<bool> {
    Ok(repo.run(&["diff", "--name-only", "HEAD"])?.trim().is_empty())
}

/// Short working-tree status (`git status -s`), for display.
pub fn short_status(repo: &Repo) -> Result<String> {
    Ok(repo.run(&["status", "-s"])?.trim_end().to_string())
}

/// Detect the default branch: `main` if `origin/main` exists, then
/// `master` if `origin/master` exists, falling back to `master`.
pub fn default_branch(repo: &Repo) -> String {
    for candidate in ["main", "master"] {
        let remote_ref = format!("origin/{candidate}");
        if repo
            .run(&["rev-parse", "--verify", "--quiet", &remote_ref])
            .is_ok()
        {
            return candidate.to_string();
        }
    }
    "master".to_string()
}

/// Classify the synchronization state of `local_branch` against
/// `origin/<remote_branch>`.
///
/// Refreshes remote-tracking data first; the refresh failing (no remote,
/// no network) aborts classification with the process error.
pub fn sync_state(repo: &Repo, local_branch: &str, remote_branch: &str) -> Result<SyncState> {
    update_remote(repo)?;

    let remote_ref = format!("origin/{remote_branch}");
    let local = rev_parse(repo, local_branch)?;
    let remote = rev_parse(repo, &remote_ref)?;
    let base = merge_base(repo, local_branch, &remote_ref)?;

    Ok(SyncState::classify(&local, &remote, &base))
}

/// Whether the current HEAD has already landed on `origin/<default_branch>`.
pub fn is_merged(repo: &Repo, default_branch: &str) -> Result<bool> {
    update_remote(repo)?;

    let local = rev_parse(repo, "HEAD")?;
    let base = merge_base(repo, local.as_str(), &format!("origin/{default_branch}"))?;
    Ok(local == base)
}

/// Whether `sha` is already contained in `origin/<branch>`.
/// Resolution failures (unknown sha, missing remote ref) count as "no".
pub fn is_commit_on_remote(repo: &Repo, sha: &CommitId, branch: &str) -> bool {
    match merge_base(repo, sha.as_str(), &format!("origin/{branch}")) {
        Ok(base) => &base == sha,
        Err(_) => false,
    }
}
