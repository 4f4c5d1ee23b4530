use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::fleet::list::ListArgs;
use crate::fleet::merge::MergeallArgs;
use crate::flow::issue::IssueCommands;
use crate::flow::members::MembersArgs;
use crate::flow::missing::MissingArgs;
use crate::flow::mr::MrCommands;
use crate::repo::branch::BranchArgs;
use crate::repo::checkout::CheckoutArgs;
use crate::repo::diff::DiffArgs;
use crate::repo::prune::PruneArgs;

#[derive(Parser)]
#[command(
    name = "flotilla",
    bin_name = "flo",
    version,
    about,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List every repository under the fleet root with its status
    List(ListArgs),

    /// Show local branches, or create BRANCH tracking the remote default
    Branch(BranchArgs),

    /// Switch to the default branch, or to BRANCH
    Checkout(CheckoutArgs),

    /// Fast-forward the default branch of every clean repository
    Mergeall(MergeallArgs),

    /// Remove stale remote-tracking refs
    Prune(PruneArgs),

    /// Show the diff between the local and remote default branch
    Diff(DiffArgs),

    /// Issue workflow
    #[command(subcommand)]
    Issue(IssueCommands),

    /// Merge request workflow
    #[command(subcommand)]
    Mr(MrCommands),

    /// List the configured group's members
    Members(MembersArgs),

    /// Show remote projects with no local clone
    Missing(MissingArgs),

    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration management commands.
#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print JSON Schema for the configuration file
    Schema,
}

impl ConfigCommands {
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Schema => {
                let schema = crate::config::generate_schema();
                let json = serde_json::to_string_pretty(&schema)?;
                println!("{json}");
                Ok(())
            }
        }
    }
}
