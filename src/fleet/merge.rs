//! Merge orchestration: fast-forward the local default branch from its
//! remote counterpart without losing the caller's branch context.

use clap::Args;
use tracing::warn;

use crate::config::{Config, resolve_repos_root};
use crate::git::{self, GitError, Repo, SyncState};
use crate::output::{Renderer, StatusKind};

use super::scan::discover_repos;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct MergeallArgs {}

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Uncommitted changes; the repository was left untouched and its
    /// sync state was never computed.
    SkippedDirty,
    /// No fast-forward was needed or possible for this verdict. Only
    /// `NeedsPull` is ever auto-merged.
    NothingToDo(SyncState),
    /// The default branch was fast-forwarded to the remote tip.
    Merged { branch: String },
}

/// Run the per-repository merge protocol.
///
/// The branch checked out at entry is restored on every exit path —
/// after a merge, after a skip, and after a failure.
pub fn merge_repo(repo: &Repo) -> git::Result<MergeOutcome> {
    let original_branch = git::current_branch(repo)?;

    if !git::is_clean(repo)? {
        return Ok(MergeOutcome::SkippedDirty);
    }

    let default = git::default_branch(repo);
    let switched = original_branch != default;
    if switched {
        git::checkout(repo, &default)?;
    }

    let result = fast_forward_default(repo, &default);

    if switched
        && let Err(restore_err) = git::checkout(repo, &original_branch)
    {
        warn!(
            repo = %repo.path().display(),
            error = %restore_err,
            "failed to restore original branch"
        );
        if result.is_ok() {
            return Err(restore_err);
        }
    }

    result
}

fn fast_forward_default(repo: &Repo, default: &str) -> git::Result<MergeOutcome> {
    match git::sync_state(repo, default, default)? {
        SyncState::NeedsPull => {
            repo.run(&["fetch"])?;
            let remote_ref = format!("origin/{default}");
            repo.run(&["merge", "--ff-only", &remote_ref])
                .map_err(|e| match e {
                    GitError::Process { stderr, .. } => GitError::NonFastForward(stderr),
                    other => other,
                })?;
            Ok(MergeOutcome::Merged {
                branch: default.to_string(),
            })
        }
        state => Ok(MergeOutcome::NothingToDo(state)),
    }
}

pub fn run(_args: &MergeallArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let root = resolve_repos_root(config.repos_root.as_deref())?;
    let renderer = Renderer::auto();

    for path in discover_repos(&root) {
        let repo = Repo::new(&path).with_proxy(config.proxy.clone());
        renderer.line(
            StatusKind::Info,
            &format!("Checking: {}", path.display()),
        );

        // One failing repository never aborts the batch.
        match merge_repo(&repo) {
            Ok(outcome) => report_outcome(&renderer, &outcome),
            Err(e) => {
                warn!(repo = %path.display(), error = %e, "merge failed");
                renderer.error_line(&format!("{}: {e}", path.display()));
            }
        }
    }

    Ok(())
}

fn report_outcome(renderer: &Renderer, outcome: &MergeOutcome) {
    match outcome {
        MergeOutcome::SkippedDirty => {
            renderer.line(StatusKind::Info, "Uncommitted changes, skipping...");
        }
        MergeOutcome::NothingToDo(state) => {
            renderer.line(StatusKind::Info, &format!("Nothing to do ({state})"));
        }
        MergeOutcome::Merged { branch } => {
            renderer.line(StatusKind::Good, &format!("Fast-forwarded {branch}"));
        }
    }
}
