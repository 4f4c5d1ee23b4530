use clap::Args;

use crate::config::Config;
use crate::git::Repo;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct PruneArgs {}

/// Remove remote-tracking refs that no longer exist on the remote
/// (old feature branches merged and deleted there).
pub fn run(_args: &PruneArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let repo = Repo::open_current(config.proxy.clone())?;
    let output = repo.run(&["remote", "prune", "origin"])?;
    print!("{output}");
    Ok(())
}
