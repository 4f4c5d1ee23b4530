use clap::Args;

use crate::config::Config;
use crate::git::{self, Repo};
use crate::output::{Renderer, StatusKind};

#[derive(Args, Clone, PartialEq, Eq)]
pub struct DiffArgs {}

/// Show what the remote default branch has that the local one does not.
pub fn run(_args: &DiffArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repo::open_current(config.proxy.clone())?;
    let renderer = Renderer::auto();

    if !git::is_clean(&repo)? {
        renderer.line(StatusKind::Warn, "Uncommitted changes.");
    }

    repo.run(&["fetch"])?;
    let default = git::default_branch(&repo);
    let remote_ref = format!("origin/{default}");
    let diff = repo.run(&["diff", &default, &remote_ref])?;

    if diff.trim().is_empty() {
        renderer.line(StatusKind::Info, "No diffs found");
    } else {
        print!("{diff}");
    }

    Ok(())
}
