//! Command execution coordinating packaging and release.
//!
//! Both metadata readers always run first, so a broken `go.mod` or changelog
//! is reported even when no action was requested.

mod package;
mod release;

use crate::cli::{Args, RuntimeConfig};
use crate::config::{ProjectLayout, ReleaseContext};
use crate::error::Result;
use std::path::Path;

use package::execute_package;
use release::execute_release;

/// Execute the requested actions in the current directory
pub async fn execute_command(args: Args) -> Result<i32> {
    let config = RuntimeConfig::from(&args);
    let root = std::env::current_dir()?;

    match execute_in(&root, &config).await {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            config.error_println(&e.to_string());

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.indent(&suggestion);
                }
            }

            Ok(1)
        }
    }
}

/// Execute the requested actions for the module rooted at `root`
pub async fn execute_in(root: &Path, config: &RuntimeConfig) -> Result<i32> {
    let flags = config.flags();
    let ctx = ReleaseContext::load(ProjectLayout::new(root), flags)?;
    log::info!(
        "{} {} ({})",
        ctx.project.project_name,
        ctx.release.version,
        ctx.project.module_path
    );

    if !flags.package && !flags.release {
        config.println("Nothing to do, pass -p to package and/or -r to release");
        return Ok(0);
    }

    if flags.package {
        execute_package(&ctx, config).await?;
    }

    if flags.release {
        return execute_release(&ctx, config).await;
    }

    Ok(0)
}
