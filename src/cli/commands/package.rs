//! Package command: cross-compile, vendor and zip.

use crate::bundler::utils::fs::create_dir;
use crate::bundler::{discover_artifacts, package_artifacts};
use crate::cli::RuntimeConfig;
use crate::config::{BIN_DIR, ReleaseContext};
use crate::error::Result;
use crate::toolchain::{self, CrossCompileStatus};

/// Rebuild `dist/` from scratch
pub(super) async fn execute_package(ctx: &ReleaseContext, config: &RuntimeConfig) -> Result<()> {
    let layout = &ctx.layout;
    let project_name = &ctx.project.project_name;

    config.section("Packaging");

    // Both directories must exist and be empty before any archive task starts.
    create_dir(&layout.dist_dir(), true).await?;
    create_dir(&layout.bin_dir(), true).await?;

    config.println("🔨 Cross-compiling...");
    if let CrossCompileStatus::Partial(code) =
        toolchain::cross_compile(layout.root(), &layout.bin_dir()).await?
    {
        let code = code.map_or_else(|| "a signal".to_string(), |c| c.to_string());
        config.warning_println(&format!(
            "gox exited with {code}, packaging the targets that built"
        ));
    }

    let artifacts = discover_artifacts(&layout.bin_dir()).await?;
    if artifacts.is_empty() {
        log::warn!("No binaries in {}", layout.bin_dir().display());
        config.warning_println(&format!("No binaries in {BIN_DIR}, nothing to package"));
    } else {
        log::debug!("Found {} binaries", artifacts.len());
    }

    config.println("📚 Vendoring dependencies...");
    toolchain::vendor_dependencies(layout.root()).await?;

    let report = package_artifacts(ctx, &artifacts).await?;

    if !report.has_project_license {
        config.warning_println(&format!("Packaging {project_name} without license"));
    }
    for name in &report.collisions {
        config.warning_println(&format!("More than one license maps to {name}, kept the last"));
    }

    for archive in &report.archives {
        config.println(&format!("📦 {}", archive.file_name()));
    }
    config.success_println(&format!(
        "Packaged {} archive(s) with {} license file(s)",
        report.archives.len(),
        report.license_count
    ));

    Ok(())
}
