//! Error types for gop operations.
//!
//! Every component returns these instead of terminating the process; only
//! `main` turns an error into an exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gop operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all gop operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Missing or malformed project files
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// External tool errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Release publishing errors
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// CLI errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// Errors caused by the project's own files
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The module manifest could not be opened
    #[error("Could not open {path}. Please generate a mod file, use: go mod init <path>")]
    ManifestMissing {
        /// Expected manifest location
        path: PathBuf,
    },

    /// The manifest has no `module <path>` line
    #[error("Malformed manifest {path}: no `module <path>` line found")]
    ManifestMalformed {
        /// Manifest location
        path: PathBuf,
    },

    /// The changelog could not be opened
    #[error("Could not open {path}. Please add a changelog")]
    ChangelogMissing {
        /// Expected changelog location
        path: PathBuf,
    },

    /// The changelog has no `# <version>` heading
    #[error("Malformed changelog {path}: no `# <version>` heading found")]
    ChangelogMalformed {
        /// Changelog location
        path: PathBuf,
    },
}

/// External tool errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// The cross-compiler is not installed
    #[error("gox not found. Please install gox before packaging")]
    CrossCompilerMissing,

    /// A required CLI is not on PATH
    #[error("'{tool}' not found on PATH")]
    ToolMissing {
        /// Program name
        tool: String,
    },

    /// `go mod vendor` failed
    #[error("Vendoring dependencies failed: {reason}")]
    VendorFailed {
        /// Reason for the error
        reason: String,
    },
}

/// Release publishing errors
#[derive(Error, Debug)]
pub enum PublishError {
    /// The release could not be created
    #[error("Could not create release {version}: {reason}")]
    CreateFailed {
        /// Release version
        version: String,
        /// Reason for the error
        reason: String,
    },

    /// Asset upload failed; the release and its tag were rolled back
    #[error("Could not upload assets for {version}: {reason}. Release and remote tag were deleted")]
    UploadFailed {
        /// Release version
        version: String,
        /// Reason for the error
        reason: String,
    },

    /// A compensating step failed after an upload failure
    #[error("Rollback of {version} failed while trying to {step}: {reason}")]
    RollbackFailed {
        /// Release version
        version: String,
        /// The compensating step that failed
        step: RollbackStep,
        /// Reason for the error
        reason: String,
    },
}

/// Compensating actions run after a failed asset upload, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackStep {
    /// Delete the just-created release
    DeleteRelease,
    /// Delete the remote tag the release created
    DeleteRemoteTag,
}

impl std::fmt::Display for RollbackStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RollbackStep::DeleteRelease => write!(f, "delete release"),
            RollbackStep::DeleteRemoteTag => write!(f, "delete remote tag"),
        }
    }
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Config(ConfigError::ManifestMissing { .. }) => vec![
                "Initialize the module: go mod init <module path>".to_string(),
                "Run gop from the module root".to_string(),
            ],
            ReleaseError::Config(ConfigError::ChangelogMissing { .. })
            | ReleaseError::Config(ConfigError::ChangelogMalformed { .. }) => vec![
                "Add a CHANGELOG.md whose newest entry starts with `# <version>`".to_string(),
            ],
            ReleaseError::Tool(ToolError::CrossCompilerMissing) => vec![
                "Install gox: go install github.com/mitchellh/gox@latest".to_string(),
                "Make sure $GOPATH/bin is populated or gox is on PATH".to_string(),
            ],
            ReleaseError::Tool(ToolError::ToolMissing { tool }) if tool == "gh" => vec![
                "Install the GitHub CLI: https://cli.github.com".to_string(),
                "Log in before releasing: gh auth login".to_string(),
            ],
            ReleaseError::Publish(PublishError::RollbackFailed { version, step, .. }) => {
                let mut suggestions = Vec::new();
                if *step == RollbackStep::DeleteRelease {
                    suggestions.push(format!("Delete the release manually: gh release delete {version}"));
                }
                suggestions.push(format!("Delete the remote tag manually: git push --delete origin {version}"));
                suggestions
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
