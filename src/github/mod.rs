//! GitHub integration for release operations

mod gh_cli;
mod release_manager;

pub use gh_cli::GhCli;
pub use release_manager::{CreateRelease, PublishOutcome, PublishState, Publisher, ReleaseHost};
