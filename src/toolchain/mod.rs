//! External Go tooling used while packaging: the `gox` cross-compiler and
//! `go mod vendor`.

use crate::error::{CliError, ReleaseError, Result, ToolError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Output template handed to gox, relative to the binaries directory
pub const OUTPUT_TEMPLATE: &str = "{{.Dir}}-{{.OS}}-{{.Arch}}";

#[cfg(windows)]
const GOX_BINARY: &str = "gox.exe";
#[cfg(not(windows))]
const GOX_BINARY: &str = "gox";

/// Outcome of a cross-compilation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossCompileStatus {
    /// gox exited successfully
    Success,
    /// gox exited non-zero; some targets may be missing
    Partial(Option<i32>),
}

/// `$GOPATH/bin`, falling back to `~/go/bin` when `GOPATH` is unset
pub fn gopath_bin() -> Option<PathBuf> {
    let gopath = std::env::var_os("GOPATH")
        .filter(|v| !v.is_empty())
        .and_then(|v| std::env::split_paths(&v).next())
        .or_else(|| dirs::home_dir().map(|home| home.join("go")))?;
    Some(gopath.join("bin"))
}

/// Locate gox in `$GOPATH/bin`, then on `PATH`
pub fn find_gox() -> Result<PathBuf> {
    if let Some(candidate) = gopath_bin().map(|dir| dir.join(GOX_BINARY)) {
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    which::which("gox").map_err(|e| {
        log::debug!("gox not on PATH: {}", e);
        ToolError::CrossCompilerMissing.into()
    })
}

/// Cross-compile the module at `project_root` into `bin_dir`.
///
/// Build output is streamed to the terminal. A non-zero exit is reported
/// through the returned status instead of an error so packaging can go on
/// with whatever targets did build.
pub async fn cross_compile(project_root: &Path, bin_dir: &Path) -> Result<CrossCompileStatus> {
    let gox = find_gox()?;
    let output = format!("-output={}", bin_dir.join(OUTPUT_TEMPLATE).display());
    log::info!("Running {} {}", gox.display(), output);

    let status = Command::new(&gox)
        .arg(&output)
        .current_dir(project_root)
        .stdin(Stdio::null())
        .status()
        .await
        .map_err(|e| {
            ReleaseError::Cli(CliError::ExecutionFailed {
                command: format!("{} {}", gox.display(), output),
                reason: e.to_string(),
            })
        })?;

    if status.success() {
        Ok(CrossCompileStatus::Success)
    } else {
        log::warn!("gox exited with {}", status);
        Ok(CrossCompileStatus::Partial(status.code()))
    }
}

/// Materialize dependencies into `vendor/` with `go mod vendor`
pub async fn vendor_dependencies(project_root: &Path) -> Result<()> {
    let go = which::which("go").map_err(|_| ToolError::ToolMissing {
        tool: "go".to_string(),
    })?;

    let output = Command::new(go)
        .args(["mod", "vendor"])
        .current_dir(project_root)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            ReleaseError::Cli(CliError::ExecutionFailed {
                command: "go mod vendor".to_string(),
                reason: e.to_string(),
            })
        })?;

    if !output.status.success() {
        return Err(ToolError::VendorFailed {
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_template_shape() {
        let flag = format!("-output={}", Path::new("bin").join(OUTPUT_TEMPLATE).display());
        assert!(flag.starts_with("-output=bin"));
        assert!(flag.ends_with("{{.Dir}}-{{.OS}}-{{.Arch}}"));
    }

    #[test]
    fn test_gopath_bin_ends_in_bin() {
        if let Some(dir) = gopath_bin() {
            assert_eq!(dir.file_name().unwrap(), "bin");
        }
    }
}
