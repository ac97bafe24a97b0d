//! [`ReleaseHost`] backed by the `gh` and `git` command line tools.
//!
//! Authentication is whatever session `gh auth login` left behind.

use super::release_manager::{CreateRelease, ReleaseHost};
use crate::error::{CliError, ReleaseError, Result, ToolError};
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::process::Command;

/// Release host driving the GitHub CLI from the project root
#[derive(Debug, Clone)]
pub struct GhCli {
    root: PathBuf,
    remote: String,
}

impl GhCli {
    /// Run `gh`/`git` inside `root`, deleting tags from `remote` on rollback
    pub fn new(root: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            remote: remote.into(),
        }
    }

    /// `gh release create` arguments
    pub fn create_args(release: &CreateRelease<'_>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "release".into(),
            "create".into(),
            release.version.into(),
            "-t".into(),
            release.version.into(),
            "-F".into(),
            release.notes_file.into(),
        ];
        if release.prerelease {
            args.push("-p".into());
        }
        args
    }

    /// `gh release upload` arguments
    pub fn upload_args(version: &str, assets: &[PathBuf]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["release".into(), "upload".into(), version.into()];
        args.extend(assets.iter().map(|a| a.as_os_str().to_owned()));
        args
    }

    async fn run(&self, program: &str, args: Vec<OsString>) -> Result<()> {
        let command_line = format!(
            "{} {}",
            program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        log::debug!("Running {}", command_line);

        let status = Command::new(program)
            .args(&args)
            .current_dir(&self.root)
            .status()
            .await
            .map_err(|e| {
                ReleaseError::Cli(CliError::ExecutionFailed {
                    command: command_line.clone(),
                    reason: e.to_string(),
                })
            })?;

        if !status.success() {
            return Err(ReleaseError::Cli(CliError::ExecutionFailed {
                command: command_line,
                reason: format!("exited with {status}"),
            }));
        }
        Ok(())
    }
}

/// Tools a release needs; `git` is only used to roll back an upload
fn required_tools(with_assets: bool) -> &'static [&'static str] {
    if with_assets { &["gh", "git"] } else { &["gh"] }
}

fn require(tool: &str) -> Result<()> {
    which::which(tool).map(|_| ()).map_err(|_| {
        ToolError::ToolMissing {
            tool: tool.to_string(),
        }
        .into()
    })
}

impl ReleaseHost for GhCli {
    fn preflight(&self, with_assets: bool) -> Result<()> {
        required_tools(with_assets).iter().try_for_each(|tool| require(tool))
    }

    async fn create_release(&self, release: &CreateRelease<'_>) -> Result<()> {
        self.run("gh", Self::create_args(release)).await
    }

    async fn upload_assets(&self, version: &str, assets: &[PathBuf]) -> Result<()> {
        self.run("gh", Self::upload_args(version, assets)).await
    }

    async fn delete_release(&self, version: &str) -> Result<()> {
        self.run(
            "gh",
            vec!["release".into(), "delete".into(), version.into(), "--yes".into()],
        )
        .await
    }

    async fn delete_remote_tag(&self, version: &str) -> Result<()> {
        self.run(
            "git",
            vec![
                "push".into(),
                "--delete".into(),
                self.remote.as_str().into(),
                version.into(),
            ],
        )
        .await
    }
}
