//! License discovery in the vendor tree and the project root.
//!
//! Vendored licenses are renamed `<grandparent>-<parent>-<file name>` so that
//! e.g. `vendor/github.com/pkg/errors/LICENSE` becomes `pkg-errors-license`.
//! The walk is sorted by file name; when two files map to the same target
//! name the later one in that order wins.

use crate::bundler::error::{ErrorExt, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Base names (extension stripped, case-insensitive) treated as licenses
pub const LICENSE_NAMES: [&str; 3] = ["license", "copying", "notice"];

/// Entry names and extensions never descended into or collected
const SKIPPED_ENTRIES: [&str; 6] = ["examples", "assets", "dist", "bin", "src", ".go"];

/// Whether `file_name` names a license file
pub fn is_license(file_name: &str) -> bool {
    let stem = match file_name.rfind('.') {
        Some(idx) => &file_name[..idx],
        None => file_name,
    };
    LICENSE_NAMES.contains(&stem.to_lowercase().as_str())
}

fn extension(file_name: &str) -> Option<&str> {
    file_name.rfind('.').map(|idx| &file_name[idx..])
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    SKIPPED_ENTRIES.contains(&name.as_ref())
        || extension(&name).is_some_and(|ext| SKIPPED_ENTRIES.contains(&ext))
}

/// Target name of a vendored license: `<grandparent>-<parent>-<lowercased file name>`
pub fn vendor_target_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    let parent = path.parent()?;
    let parent_name = parent.file_name()?.to_string_lossy();
    let grandparent_name = parent
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    Some([grandparent_name.as_ref(), parent_name.as_ref(), &name].join("-"))
}

/// Target name of the project's own license: `<project>-<lowercased file name>`
pub fn project_target_name(project_name: &str, path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    Some(format!("{project_name}-{name}"))
}

/// Finished, read-only mapping from in-archive license name to source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseSet {
    entries: BTreeMap<String, PathBuf>,
}

impl LicenseSet {
    /// Number of licenses
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no license was found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source path of a target name
    pub fn get(&self, target_name: &str) -> Option<&Path> {
        self.entries.get(target_name).map(PathBuf::as_path)
    }

    /// `(target name, source path)` pairs in target name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

/// Accumulates licenses before archives are built
#[derive(Debug, Default)]
pub struct LicenseCollector {
    entries: BTreeMap<String, PathBuf>,
    collisions: Vec<String>,
}

impl LicenseCollector {
    /// Empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a license under `target_name`; a previous entry is replaced
    pub fn insert(&mut self, target_name: String, source: PathBuf) {
        if let Some(previous) = self.entries.get(&target_name) {
            if previous != &source {
                log::warn!(
                    "License name collision on {}: {} replaces {}",
                    target_name,
                    source.display(),
                    previous.display()
                );
                self.collisions.push(target_name.clone());
            }
        }
        self.entries.insert(target_name, source);
    }

    /// Walk the vendor tree at `root` and record every license file in it.
    ///
    /// A missing root is not an error: projects without dependencies have no
    /// vendor tree.
    pub fn collect_vendor(&mut self, root: &Path) -> Result<()> {
        if !root.exists() {
            log::debug!("No vendor tree at {}", root.display());
            return Ok(());
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if !is_license(&entry.file_name().to_string_lossy()) {
                continue;
            }
            if let Some(target) = vendor_target_name(entry.path()) {
                log::debug!("License {} -> {}", entry.path().display(), target);
                self.insert(target, entry.into_path());
            }
        }

        Ok(())
    }

    /// Record the project's own license, named after the project
    pub fn add_project_license(&mut self, project_name: &str, path: &Path) {
        if let Some(target) = project_target_name(project_name, path) {
            self.insert(target, path.to_path_buf());
        }
    }

    /// Target names that were written more than once
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    /// Freeze the mapping
    pub fn finish(self) -> LicenseSet {
        LicenseSet {
            entries: self.entries,
        }
    }
}

/// First license file directly inside `root`, in file name order
pub fn find_project_license(root: &Path) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(root).fs_context("reading directory", root)? {
        let entry = entry.fs_context("reading directory", root)?;
        let is_file = entry
            .file_type()
            .fs_context("reading file type", entry.path())?
            .is_file();
        if is_file && is_license(&entry.file_name().to_string_lossy()) {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"license text").unwrap();
    }

    #[test]
    fn test_is_license() {
        for name in ["LICENSE", "license.md", "COPYING", "Notice.txt", "LICENSE.APACHE"] {
            assert!(is_license(name), "{name}");
        }
        for name in ["LICENSE-MIT", "licenses", "README.md", "license.go.bak", ""] {
            assert!(!is_license(name), "{name}");
        }
    }

    #[test]
    fn test_vendor_target_name() {
        assert_eq!(
            vendor_target_name(Path::new("vendor/a/b/LICENSE")).as_deref(),
            Some("a-b-license")
        );
        assert_eq!(
            vendor_target_name(Path::new("vendor/github.com/pkg/errors/COPYING.txt")).as_deref(),
            Some("pkg-errors-copying.txt")
        );
    }

    #[test]
    fn test_collect_vendor_tree() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let vendor = temp_dir.path().join("vendor");
        touch(&vendor.join("github.com/pkg/errors/LICENSE"));
        touch(&vendor.join("golang.org/x/sys/LICENSE"));
        touch(&vendor.join("golang.org/x/sys/PATENTS"));
        touch(&vendor.join("golang.org/x/text/NOTICE.md"));
        // Skipped directories and extensions
        touch(&vendor.join("github.com/foo/bar/examples/LICENSE"));
        touch(&vendor.join("github.com/foo/bar/src/inner/LICENSE"));
        touch(&vendor.join("github.com/foo/bar/license.go"));

        let mut collector = LicenseCollector::new();
        collector.collect_vendor(&vendor).unwrap();
        let licenses = collector.finish();

        let names: Vec<_> = licenses.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["pkg-errors-license", "x-sys-license", "x-text-notice.md"]);
        assert_eq!(
            licenses.get("x-sys-license"),
            Some(vendor.join("golang.org/x/sys/LICENSE").as_path())
        );
    }

    #[test]
    fn test_missing_vendor_tree_is_not_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut collector = LicenseCollector::new();
        collector.collect_vendor(&temp_dir.path().join("vendor")).unwrap();
        assert!(collector.finish().is_empty());
    }

    #[test]
    fn test_collection_is_repeatable() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let vendor = temp_dir.path().join("vendor");
        touch(&vendor.join("a/b/LICENSE"));
        touch(&vendor.join("c/d/COPYING"));
        touch(&vendor.join("e/f/g/NOTICE"));

        let collect = || {
            let mut collector = LicenseCollector::new();
            collector.collect_vendor(&vendor).unwrap();
            collector.finish()
        };
        assert_eq!(collect(), collect());
    }

    #[test]
    fn test_collision_last_in_walk_order_wins() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let vendor = temp_dir.path().join("vendor");
        touch(&vendor.join("one/a/b/LICENSE"));
        touch(&vendor.join("two/a/b/LICENSE"));

        let mut collector = LicenseCollector::new();
        collector.collect_vendor(&vendor).unwrap();
        assert_eq!(collector.collisions(), ["a-b-license"]);
        let licenses = collector.finish();

        assert_eq!(licenses.len(), 1);
        assert_eq!(
            licenses.get("a-b-license"),
            Some(vendor.join("two/a/b/LICENSE").as_path())
        );
    }

    #[test]
    fn test_find_project_license() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        assert_eq!(find_project_license(temp_dir.path()).unwrap(), None);

        touch(&temp_dir.path().join("main.go"));
        touch(&temp_dir.path().join("NOTICE"));
        touch(&temp_dir.path().join("LICENSE"));
        fs::create_dir(temp_dir.path().join("COPYING")).unwrap();

        let found = find_project_license(temp_dir.path()).unwrap().unwrap();
        assert_eq!(found, temp_dir.path().join("LICENSE"));

        let mut collector = LicenseCollector::new();
        collector.add_project_license("repo", &found);
        let licenses = collector.finish();
        assert_eq!(licenses.get("repo-license"), Some(found.as_path()));
    }
}
