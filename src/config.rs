//! Fixed project layout and the immutable per-run context.

use crate::changelog::ReleaseInfo;
use crate::metadata::ProjectInfo;
use std::path::{Path, PathBuf};

/// Module manifest file name
pub const MANIFEST_NAME: &str = "go.mod";
/// Changelog file name
pub const CHANGELOG_NAME: &str = "CHANGELOG.md";
/// Distribution directory (final archives, release asset source)
pub const DIST_DIR: &str = "dist";
/// Raw cross-compiled binaries directory
pub const BIN_DIR: &str = "bin";
/// Vendored dependency tree
pub const VENDOR_DIR: &str = "vendor";
/// Sub-path holding licenses inside each archive
pub const PACKAGED_LICENSE_DIR: &str = "licenses-and-notices";
/// Readme entry name inside each archive
pub const PACKAGED_README_NAME: &str = "readme.txt";
/// Protocol prefixed to the module path to form the source URL
pub const SOURCE_PROTOCOL: &str = "https://";
/// Remote the release tag is pushed to
pub const TAG_REMOTE: &str = "origin";

/// Filesystem layout of the project being released, rooted at one directory
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the module manifest
    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_NAME)
    }

    /// Path of the changelog
    pub fn changelog(&self) -> PathBuf {
        self.root.join(CHANGELOG_NAME)
    }

    /// Path of the distribution directory
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(DIST_DIR)
    }

    /// Path of the binaries directory
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// Path of the vendor tree
    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join(VENDOR_DIR)
    }
}

/// What the user asked this run to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// Build and zip binaries
    pub package: bool,
    /// Publish a release
    pub release: bool,
    /// Mark the release as a pre-release
    pub prerelease: bool,
}

/// Everything a run knows after the readers have finished.
///
/// Built exactly once and only ever borrowed afterwards.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    /// Module path and project name
    pub project: ProjectInfo,
    /// Newest changelog entry
    pub release: ReleaseInfo,
    /// Requested actions
    pub flags: RunFlags,
    /// Where everything lives on disk
    pub layout: ProjectLayout,
}

impl ReleaseContext {
    /// Read project metadata and the changelog from `layout`
    pub fn load(layout: ProjectLayout, flags: RunFlags) -> crate::Result<Self> {
        let project = crate::metadata::read_project_info(&layout.manifest())?;
        let release = crate::changelog::read_release_info(&layout.changelog())?;
        Ok(Self {
            project,
            release,
            flags,
            layout,
        })
    }
}
