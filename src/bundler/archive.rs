//! Per-platform zip archives.
//!
//! Every cross-compiled binary gets its own archive, written by its own
//! blocking task. All tasks read the same frozen readme and license set.
//! The first failure cancels the remaining tasks and, once every task has
//! returned, all archives of the run are removed again.

use crate::bail;
use crate::bundler::error::{Context, Error, ErrorExt, Result};
use crate::bundler::licenses::LicenseSet;
use crate::bundler::utils::fs::{list_files, remove_file_if_exists};
use crate::config::{PACKAGED_LICENSE_DIR, PACKAGED_README_NAME};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// One cross-compiled binary, e.g. `bin/repo-windows-amd64.exe`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    path: PathBuf,
}

impl BuildArtifact {
    /// Wrap a binary path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the binary
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension, e.g. `repo-windows-amd64`
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Extension including the dot, e.g. `.exe`, or empty
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Name of the archive built from this binary
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.base_name())
    }
}

/// Read-only inputs shared by every archive task
#[derive(Debug)]
pub struct ArchiveInputs {
    /// Name the binary gets inside the archive (plus its extension)
    pub project_name: String,
    /// Generated readme text
    pub readme: String,
    /// Licenses to ship
    pub licenses: LicenseSet,
    /// Directory archives are written to
    pub out_dir: PathBuf,
}

/// A finished archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Location of the zip file
    pub path: PathBuf,
    /// Number of entries written
    pub entries: usize,
}

impl Archive {
    /// File name of the archive
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Binaries in `bin_dir`, sorted by file name
pub async fn discover_artifacts(bin_dir: &Path) -> Result<Vec<BuildArtifact>> {
    Ok(list_files(bin_dir)
        .await?
        .into_iter()
        .map(BuildArtifact::new)
        .collect())
}

/// Build one archive per artifact concurrently and wait for all of them.
///
/// Returns the archives sorted by path. On error no archive of this run is
/// left in `out_dir`.
pub async fn build_archives(
    artifacts: &[BuildArtifact],
    inputs: ArchiveInputs,
) -> Result<Vec<Archive>> {
    let mut outputs: HashMap<String, &BuildArtifact> = HashMap::new();
    for artifact in artifacts {
        if let Some(other) = outputs.insert(artifact.archive_name(), artifact) {
            bail!(
                "{} and {} would both be packaged as {}",
                other.path().display(),
                artifact.path().display(),
                artifact.archive_name()
            );
        }
    }

    let inputs = Arc::new(inputs);
    let token = CancellationToken::new();
    let mut tasks = JoinSet::new();
    let mut planned = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        let out_path = inputs.out_dir.join(artifact.archive_name());
        planned.push(out_path.clone());

        let artifact = artifact.clone();
        let inputs = Arc::clone(&inputs);
        let token = token.clone();
        tasks.spawn_blocking(move || {
            write_archive(&artifact, &inputs, &out_path, &token).map(|entries| Archive {
                path: out_path,
                entries,
            })
        });
    }

    let mut archives = Vec::with_capacity(artifacts.len());
    let mut failure: Option<Error> = None;

    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap_or_else(|e| Err(Error::TaskFailed(e.to_string())));
        match result {
            Ok(archive) => {
                log::info!("Packaged {} ({} entries)", archive.path.display(), archive.entries);
                archives.push(archive);
            }
            Err(err) => {
                token.cancel();
                let replace = match &failure {
                    None => true,
                    Some(Error::Cancelled(_)) => !matches!(err, Error::Cancelled(_)),
                    Some(_) => false,
                };
                if replace {
                    failure = Some(err);
                }
            }
        }
    }

    if let Some(err) = failure {
        log::warn!("Packaging failed, removing archives written by this run");
        for path in &planned {
            if let Err(e) = remove_file_if_exists(path) {
                log::warn!("{e}");
            }
        }
        return Err(err);
    }

    archives.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(archives)
}

fn check_cancelled(token: &CancellationToken, out_path: &Path) -> Result<()> {
    if token.is_cancelled() {
        return Err(Error::Cancelled(out_path.display().to_string()));
    }
    Ok(())
}

/// Write a single archive; returns the number of entries
fn write_archive(
    artifact: &BuildArtifact,
    inputs: &ArchiveInputs,
    out_path: &Path,
    token: &CancellationToken,
) -> Result<usize> {
    check_cancelled(token, out_path)?;

    let file = File::create(out_path).fs_context("creating archive", out_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let text = entry_options(0o644);
    let executable = entry_options(0o755);

    zip.start_file(PACKAGED_README_NAME, text)?;
    zip.write_all(inputs.readme.as_bytes())
        .fs_context("writing readme into", out_path)?;

    check_cancelled(token, out_path)?;
    let binary_name = format!("{}{}", inputs.project_name, artifact.extension());
    zip.start_file(binary_name.as_str(), executable)?;
    copy_into(&mut zip, artifact.path())
        .with_context(|| format!("packaging {} into {}", binary_name, out_path.display()))?;

    for (target_name, source) in inputs.licenses.iter() {
        check_cancelled(token, out_path)?;
        let entry = format!("{PACKAGED_LICENSE_DIR}/{target_name}");
        zip.start_file(entry.as_str(), text)?;
        copy_into(&mut zip, source)
            .with_context(|| format!("packaging {} into {}", entry, out_path.display()))?;
    }

    let mut writer = zip.finish()?;
    writer.flush().fs_context("writing archive", out_path)?;

    Ok(2 + inputs.licenses.len())
}

fn entry_options(mode: u32) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(mode)
}

fn copy_into<W: Write>(to: &mut W, from: &Path) -> Result<()> {
    let mut file = File::open(from).fs_context("opening", from)?;
    io::copy(&mut file, to).fs_context("copying", from)?;
    Ok(())
}
