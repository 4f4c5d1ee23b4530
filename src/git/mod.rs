//! Git operations over the external `git` command-line interface.
//!
//! The crate never touches repository internals itself: state is read and
//! mutated exclusively through discrete `git` invocations (see [`Repo`]).

mod branch;
mod error;
mod runner;
mod status;

pub use branch::{CheckoutOutcome, branch_exists, checkout, create_tracking_branch, local_branches};
pub use error::GitError;
pub use runner::Repo;
pub use status::{
    CommitId, SyncState, current_branch, default_branch, is_clean, is_commit_on_remote, is_merged,
    merge_base, rev_parse, short_status, sync_state, update_remote,
};

pub type Result<T> = std::result::Result<T, GitError>;
