//! Zip packaging of cross-compiled binaries.
//!
//! Each binary in `bin/` becomes `dist/<binary base name>.zip` containing:
//!
//! | Entry | Source |
//! |-------|--------|
//! | `readme.txt` | generated from the module path |
//! | `<project><ext>` | the binary, platform suffix dropped |
//! | `licenses-and-notices/<name>` | every vendored license and the project license |
//!
//! Licenses are collected completely before the first archive task starts and
//! are then shared read-only between all tasks.

#![warn(missing_docs)]

pub mod archive;
mod error;
pub mod licenses;
pub mod readme;
pub mod utils;

pub use archive::{Archive, ArchiveInputs, BuildArtifact, build_archives, discover_artifacts};
pub use error::{Context, Error, ErrorExt, Result};
pub use licenses::{LicenseCollector, LicenseSet};

use crate::config::ReleaseContext;

/// Outcome of packaging a set of binaries
#[derive(Debug, Clone)]
pub struct PackageReport {
    /// Archives written to the distribution directory
    pub archives: Vec<Archive>,
    /// Number of license files shipped in each archive
    pub license_count: usize,
    /// False when the project root has no license file
    pub has_project_license: bool,
    /// License names that more than one source file mapped to
    pub collisions: Vec<String>,
}

/// Collect licenses, render the readme and zip every artifact.
pub async fn package_artifacts(
    ctx: &ReleaseContext,
    artifacts: &[BuildArtifact],
) -> Result<PackageReport> {
    let project_name = &ctx.project.project_name;

    let mut collector = LicenseCollector::new();
    collector.collect_vendor(&ctx.layout.vendor_dir())?;

    let project_license = licenses::find_project_license(ctx.layout.root())?;
    match &project_license {
        Some(path) => collector.add_project_license(project_name, path),
        None => log::warn!("Packaging {} without license", project_name),
    }

    let collisions = collector.collisions().to_vec();
    let licenses = collector.finish();
    let license_count = licenses.len();
    log::debug!("Shipping {} license file(s)", license_count);

    let inputs = ArchiveInputs {
        project_name: project_name.clone(),
        readme: readme::render(&ctx.project),
        licenses,
        out_dir: ctx.layout.dist_dir(),
    };
    let archives = build_archives(artifacts, inputs).await?;

    Ok(PackageReport {
        archives,
        license_count,
        has_project_license: project_license.is_some(),
        collisions,
    })
}
