//! Branch lifecycle operations: listing, tracking-branch creation, and
//! idempotent checkout.

use super::error::Result;
use super::runner::Repo;
use super::status::current_branch;

/// All local branch names, in `for-each-ref` order.
pub fn local_branches(repo: &Repo) -> Result<Vec<String>> {
    let out = repo.run(&["for-each-ref", "--format=%(refname:short)", "refs/heads/"])?;
    Ok(out.split_whitespace().map(str::to_string).collect())
}

pub fn branch_exists(repo: &Repo, name: &str) -> Result<bool> {
    Ok(local_branches(repo)?.iter().any(|b| b == name))
}

/// Create `name` tracking `origin/<remote_branch>`.
/// Future pulls and pushes on the branch default to that counterpart.
pub fn create_tracking_branch(repo: &Repo, name: &str, remote_branch: &str) -> Result<()> {
    let upstream = format!("origin/{remote_branch}");
    repo.run(&["branch", "--track", name, &upstream])?;
    Ok(())
}

/// Outcome of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The requested branch was already checked out; nothing was done.
    AlreadyOn(String),
    /// Switched to the requested branch.
    Switched(String),
}

/// Switch to `name`, reporting a no-op when it is already current.
///
/// The repository always stays on some branch: a failing switch leaves the
/// current branch in place and surfaces the process error.
pub fn checkout(repo: &Repo, name: &str) -> Result<CheckoutOutcome> {
    if current_branch(repo)? == name {
        return Ok(CheckoutOutcome::AlreadyOn(name.to_string()));
    }
    repo.run(&["checkout", name])?;
    Ok(CheckoutOutcome::Switched(name.to_string()))
}
