use clap::Args;

use crate::config::Config;
use crate::git::{self, Repo};
use crate::output::{Renderer, StatusKind};

#[derive(Args, Clone, PartialEq, Eq)]
pub struct BranchArgs {
    /// Branch to create (tracking the remote default branch) or switch to.
    /// Without a name, lists local branches.
    pub name: Option<String>,
}

pub fn run(args: &BranchArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repo::open_current(config.proxy.clone())?;
    let renderer = Renderer::auto();
    ensure_branch(&repo, args.name.as_deref(), &renderer)?;
    Ok(())
}

/// Either create (and switch into) a branch, or list branches.
///
/// A missing branch is created tracking `origin/<default>`; an existing
/// one is simply checked out (a no-op when already current).
pub fn ensure_branch(repo: &Repo, name: Option<&str>, renderer: &Renderer) -> git::Result<()> {
    let Some(name) = name else {
        for branch in git::local_branches(repo)? {
            renderer.line(StatusKind::Info, &branch);
        }
        return Ok(());
    };

    if git::branch_exists(repo, name)? {
        renderer.line(StatusKind::Info, &format!("Branch exists. Change into {name}"));
        git::checkout(repo, name)?;
        return Ok(());
    }

    renderer.line(StatusKind::Info, &format!("Creating branch: {name}"));
    let default = git::default_branch(repo);
    git::create_tracking_branch(repo, name, &default)?;
    git::checkout(repo, name)?;
    renderer.line(
        StatusKind::Info,
        &format!("Switch into: {}", git::current_branch(repo)?),
    );
    Ok(())
}
