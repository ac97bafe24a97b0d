//! GitHub release publishing with best-effort rollback.
//!
//! ```text
//! Idle ──create──▶ Created ──upload──▶ Uploaded ──▶ Done
//!                     │
//!                     └──upload fails──▶ Failed ──▶ delete release ──▶ delete tag
//! ```
//!
//! Asset upload only happens when packaging was requested. A failed upload is
//! compensated by deleting the release and then its remote tag; the first
//! compensating step that fails ends the rollback.

use crate::bundler::utils::fs::list_files;
use crate::cli::RuntimeConfig;
use crate::config::ReleaseContext;
use crate::error::{PublishError, ReleaseError, Result, RollbackStep};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Parameters of `create release`
#[derive(Debug, Clone, Copy)]
pub struct CreateRelease<'a> {
    /// Tag and title of the release
    pub version: &'a str,
    /// File holding the release notes
    pub notes_file: &'a Path,
    /// Mark as pre-release
    pub prerelease: bool,
}

/// Remote side of a release: the hosting service plus the tag remote.
#[allow(async_fn_in_trait)]
pub trait ReleaseHost {
    /// Check the host can be reached before anything is created.
    ///
    /// `with_assets` is set when assets will be uploaded, which is the only
    /// case where a rollback can happen.
    fn preflight(&self, with_assets: bool) -> Result<()>;

    /// Create a tagged release
    async fn create_release(&self, release: &CreateRelease<'_>) -> Result<()>;

    /// Upload all assets to an existing release in one call
    async fn upload_assets(&self, version: &str, assets: &[PathBuf]) -> Result<()>;

    /// Delete a release
    async fn delete_release(&self, version: &str) -> Result<()>;

    /// Delete the release tag from the remote
    async fn delete_remote_tag(&self, version: &str) -> Result<()>;
}

/// Where a publish run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    /// Nothing created yet
    Idle,
    /// Release exists, assets not uploaded
    Created,
    /// Assets uploaded
    Uploaded,
    /// Asset upload failed, rollback attempted
    Failed,
    /// Release complete
    Done,
}

/// Successful end of a publish run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Packaging was requested but the distribution directory was empty;
    /// nothing was created
    NoAssets {
        /// The empty directory
        dir: PathBuf,
    },
    /// The release exists with the listed assets
    Published {
        /// Release version
        version: String,
        /// Uploaded assets
        assets: Vec<PathBuf>,
    },
}

/// Drives a single release through [`PublishState`]
pub struct Publisher<'a, H: ReleaseHost> {
    ctx: &'a ReleaseContext,
    host: &'a H,
    config: &'a RuntimeConfig,
    state: PublishState,
}

impl<'a, H: ReleaseHost> Publisher<'a, H> {
    /// New publisher in [`PublishState::Idle`]
    pub fn new(ctx: &'a ReleaseContext, host: &'a H, config: &'a RuntimeConfig) -> Self {
        Self {
            ctx,
            host,
            config,
            state: PublishState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> PublishState {
        self.state
    }

    /// Create the release and, when packaging was requested, upload the archives.
    pub async fn publish(&mut self) -> Result<PublishOutcome> {
        let version = self.ctx.release.version.as_str();
        let dist_dir = self.ctx.layout.dist_dir();

        let assets = if self.ctx.flags.package {
            let assets = list_files(&dist_dir).await?;
            if assets.is_empty() {
                log::info!("No assets in {}, skipping release", dist_dir.display());
                return Ok(PublishOutcome::NoAssets { dir: dist_dir });
            }
            assets
        } else {
            Vec::new()
        };

        self.host.preflight(self.ctx.flags.package)?;

        self.config.section("Releasing");
        self.create(version).await?;

        if self.ctx.flags.package {
            self.config.section("Uploading assets");
            for asset in &assets {
                if let Some(name) = asset.file_name() {
                    self.config.println(&format!("📬 {}", name.to_string_lossy()));
                }
            }

            if let Err(e) = self.host.upload_assets(version, &assets).await {
                self.state = PublishState::Failed;
                self.config
                    .warning_println(&format!("Could not upload assets: {version}"));
                self.rollback(version).await?;
                return Err(PublishError::UploadFailed {
                    version: version.to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
            self.state = PublishState::Uploaded;
        }

        self.state = PublishState::Done;
        Ok(PublishOutcome::Published {
            version: version.to_string(),
            assets,
        })
    }

    /// Idle → Created. The notes file is removed again on every path.
    async fn create(&mut self, version: &str) -> Result<()> {
        let mut notes = tempfile::Builder::new()
            .prefix("temp")
            .suffix(".md")
            .tempfile_in(self.ctx.layout.root())?;
        notes.write_all(self.ctx.release.notes.as_bytes())?;
        notes.flush()?;

        self.config.println(&format!("🏷 {version}"));
        let request = CreateRelease {
            version,
            notes_file: notes.path(),
            prerelease: self.ctx.flags.prerelease,
        };
        let created = self.host.create_release(&request).await;
        notes.close()?;

        created.map_err(|e| -> ReleaseError {
            PublishError::CreateFailed {
                version: version.to_string(),
                reason: e.to_string(),
            }
            .into()
        })?;

        self.state = PublishState::Created;
        Ok(())
    }

    /// Compensate a failed upload: delete the release, then its remote tag
    async fn rollback(&self, version: &str) -> Result<()> {
        let rollback_failed = |step: RollbackStep, e: ReleaseError| -> ReleaseError {
            PublishError::RollbackFailed {
                version: version.to_string(),
                step,
                reason: e.to_string(),
            }
            .into()
        };

        self.config.println("Deleting release...");
        self.host
            .delete_release(version)
            .await
            .map_err(|e| rollback_failed(RollbackStep::DeleteRelease, e))?;
        self.config.success_println("Release deleted");

        self.config.println("Deleting remote tag...");
        self.host
            .delete_remote_tag(version)
            .await
            .map_err(|e| rollback_failed(RollbackStep::DeleteRemoteTag, e))?;
        self.config.success_println("Remote tag deleted");

        Ok(())
    }
}
