//! Release command: publish the newest changelog entry.

use crate::cli::RuntimeConfig;
use crate::config::{DIST_DIR, ReleaseContext, TAG_REMOTE};
use crate::error::Result;
use crate::github::{GhCli, PublishOutcome, Publisher};

/// Publish through the GitHub CLI
pub(super) async fn execute_release(ctx: &ReleaseContext, config: &RuntimeConfig) -> Result<i32> {
    let host = GhCli::new(ctx.layout.root(), TAG_REMOTE);
    let mut publisher = Publisher::new(ctx, &host, config);

    match publisher.publish().await? {
        PublishOutcome::NoAssets { .. } => {
            config.warning_println(&format!("No assets in {DIST_DIR} directory"));
        }
        PublishOutcome::Published { version, assets } => {
            if assets.is_empty() {
                config.success_println(&format!("Released {version}"));
            } else {
                config.success_println(&format!(
                    "Released {version} with {} asset(s)",
                    assets.len()
                ));
            }
        }
    }

    Ok(0)
}
