//! Project metadata from the Go module manifest

use crate::error::{ConfigError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Module path and the project name derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Full module path, e.g. `github.com/owner/repo`
    pub module_path: String,

    /// Last `/` segment of the module path
    pub project_name: String,
}

impl ProjectInfo {
    /// Build from a module path
    pub fn from_module_path(module_path: &str) -> Self {
        let project_name = module_path
            .rsplit('/')
            .next()
            .unwrap_or(module_path)
            .to_string();
        Self {
            module_path: module_path.to_string(),
            project_name,
        }
    }
}

/// Extract the module path from a `go.mod` file
pub fn read_project_info(manifest_path: &Path) -> Result<ProjectInfo> {
    let file = File::open(manifest_path).map_err(|e| {
        log::debug!("Failed to open {}: {}", manifest_path.display(), e);
        ConfigError::ManifestMissing {
            path: manifest_path.to_path_buf(),
        }
    })?;

    for line in BufReader::new(file).lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        if fields.next() != Some("module") {
            continue;
        }

        let Some(path) = fields.next().map(|p| p.trim_matches('"')).filter(|p| !p.is_empty())
        else {
            break;
        };

        let info = ProjectInfo::from_module_path(path);
        log::debug!("Module {} (project {})", info.module_path, info.project_name);
        return Ok(info);
    }

    Err(ConfigError::ManifestMalformed {
        path: manifest_path.to_path_buf(),
    }
    .into())
}
