use clap::Args;

use crate::config::Config;
use crate::git::{self, CheckoutOutcome, Repo};
use crate::output::{Renderer, StatusKind};

#[derive(Args, Clone, PartialEq, Eq)]
pub struct CheckoutArgs {
    /// Branch to switch to. Without a name, switches to the default branch.
    pub name: Option<String>,
}

pub fn run(args: &CheckoutArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repo::open_current(config.proxy.clone())?;
    let renderer = Renderer::auto();

    let target = match &args.name {
        Some(name) => name.clone(),
        None => git::default_branch(&repo),
    };

    // A failing switch is reported, not fatal: callers iterating several
    // repositories keep going, and the repository stays on its branch.
    match git::checkout(&repo, &target) {
        Ok(CheckoutOutcome::AlreadyOn(branch)) => {
            renderer.line(StatusKind::Info, &format!("Already on {branch}"));
        }
        Ok(CheckoutOutcome::Switched(branch)) => {
            renderer.line(StatusKind::Info, &format!("Branch: {branch}"));
        }
        Err(e) => {
            renderer.error_line(&format!("Unable to checkout {target}: {e}"));
        }
    }

    Ok(())
}
