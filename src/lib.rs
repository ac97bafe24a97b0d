//! # gop
//!
//! Packaging and release helper for single-binary Go modules.
//!
//! gop reads the module path from `go.mod` and the newest entry of
//! `CHANGELOG.md`, cross-compiles the module with `gox`, zips every binary
//! together with a generated readme and all vendored licenses, and publishes
//! the entry as a GitHub release through the `gh` CLI.
//!
//! ## Usage
//!
//! ```bash
//! gop -p          # cross-compile and package into dist/
//! gop -r          # tag and release the newest changelog entry
//! gop -p -r --pre # package, release as pre-release and upload dist/
//! ```
//!
//! A failed asset upload deletes the release and its remote tag again.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod bundler;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod metadata;
pub mod toolchain;

// Re-export main types for public API
pub use bundler::{Archive, BuildArtifact, LicenseSet, PackageReport, package_artifacts};
pub use changelog::ReleaseInfo;
pub use cli::Args;
pub use config::{ProjectLayout, ReleaseContext, RunFlags};
pub use error::{CliError, ConfigError, PublishError, ReleaseError, Result, ToolError};
pub use github::{GhCli, PublishOutcome, PublishState, Publisher, ReleaseHost};
pub use metadata::ProjectInfo;
