use std::path::Path;

use clap::Args;
use tracing::warn;

use crate::config::{Config, resolve_repos_root};
use crate::git::{self, Repo, SyncState};
use crate::output::{Renderer, StatusKind};

use super::scan::discover_repos;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct ListArgs {}

/// One repository's row in the fleet listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    pub path: String,
    pub branch: String,
    pub default_branch: String,
    /// `None` on the default branch (the marker column stays empty there).
    pub merged: Option<bool>,
    pub clean: bool,
    /// First line of `git status -s` for dirty trees.
    pub dirty_hint: String,
    pub sync: SyncState,
    pub branches: Vec<String>,
}

impl RepoReport {
    /// Column cells with their display kinds, already padded.
    /// Layout: directory, branch, merged marker, status, sync, branches.
    pub fn cells(&self) -> Vec<(StatusKind, String)> {
        let merged = match self.merged {
            Some(true) => "(merged)",
            Some(false) => "(unmerged)",
            None => "",
        };
        let merged_kind = if self.merged == Some(false) {
            StatusKind::Fail
        } else {
            StatusKind::Info
        };

        let (status_kind, status) = if self.clean {
            (StatusKind::Good, "Clean".to_string())
        } else {
            (StatusKind::Fail, self.dirty_hint.clone())
        };

        let branch_kind = if self.branch == self.default_branch {
            StatusKind::Info
        } else {
            StatusKind::Good
        };

        let sync_kind = match self.sync {
            SyncState::UpToDate => StatusKind::Info,
            SyncState::NeedsPull => StatusKind::Fail,
            SyncState::NeedsPush => StatusKind::Accent,
            SyncState::Diverged => StatusKind::Warn,
        };

        vec![
            (StatusKind::Warn, format!("{:<50}", self.path)),
            (branch_kind, format!("{:<15}", self.branch)),
            (merged_kind, format!("{merged:<11}")),
            (status_kind, format!("{status:<15}")),
            (sync_kind, format!("{:<14}", self.sync.label())),
            (StatusKind::Muted, self.branches.join(", ")),
        ]
    }

    /// Plain (uncolored) row.
    pub fn format_line(&self) -> String {
        self.cells()
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    }
}

pub fn header() -> String {
    format!(
        "{:<50} {:<15} {:<11} {:<15} {:<14} {}\n{}",
        "Directory",
        "Branch",
        "Merged",
        "Status",
        "Sync",
        "All Branches",
        "=".repeat(120)
    )
}

/// Gather the report for one repository.
pub fn collect_report(repo: &Repo) -> git::Result<RepoReport> {
    let branch = git::current_branch(repo)?;
    let default = git::default_branch(repo);
    let clean = git::is_clean(repo)?;
    let dirty_hint = if clean {
        String::new()
    } else {
        let status = git::short_status(repo)?;
        status.lines().next().unwrap_or("").trim().to_string()
    };
    let sync = git::sync_state(repo, &default, &default)?;
    let merged = if branch == default {
        None
    } else {
        Some(git::is_merged(repo, &default)?)
    };
    let branches = git::local_branches(repo)?;

    Ok(RepoReport {
        path: repo.path().display().to_string(),
        branch,
        default_branch: default,
        merged,
        clean,
        dirty_hint,
        sync,
        branches,
    })
}

pub fn run(_args: &ListArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let root = resolve_repos_root(config.repos_root.as_deref())?;
    let renderer = Renderer::auto();
    println!("{}", header());

    run_for_root(&root, config, &renderer);
    Ok(())
}

/// List every repository under `root`; a failing repository reports its
/// error inline and never stops the walk.
fn run_for_root(root: &Path, config: &Config, renderer: &Renderer) {
    for path in discover_repos(root) {
        let repo = Repo::new(&path).with_proxy(config.proxy.clone());
        match collect_report(&repo) {
            Ok(report) => {
                let row = report
                    .cells()
                    .into_iter()
                    .map(|(kind, text)| renderer.paint(kind, &text))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{}", row.trim_end());
            }
            Err(e) => {
                warn!(repo = %path.display(), error = %e, "skipping unreadable repository");
                renderer.error_line(&format!("{}: {e}", path.display()));
            }
        }
    }
}
