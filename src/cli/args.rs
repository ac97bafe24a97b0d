//! Command line argument parsing.
//!
//! gop always runs in the current directory: point a shell at a Go module
//! and pick what should happen to it.

use crate::config::RunFlags;
use clap::Parser;

/// Package and release a single-binary Go module
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(
    name = "gop",
    about = "Package and release a single-binary Go module",
    long_about = "Cross-compile a Go module, zip every binary with its licenses and a readme,
and publish the newest CHANGELOG.md entry as a GitHub release.

Usage:
  gop -p          # package into dist/
  gop -r          # release without assets
  gop -p -r       # package and upload dist/ to the release
  gop -p -r --pre # same, marked as pre-release"
)]
pub struct Args {
    /// Cross-compile and zip binaries into dist/
    #[arg(short = 'p')]
    pub package: bool,

    /// Create a GitHub release for the newest changelog entry
    #[arg(short = 'r')]
    pub release: bool,

    /// Mark the release as a pre-release
    #[arg(long = "pre")]
    pub prerelease: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Requested actions
    pub fn flags(&self) -> RunFlags {
        RunFlags {
            package: self.package,
            release: self.release,
            prerelease: self.prerelease,
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    flags: RunFlags,
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Runtime configuration printing to the terminal
    pub fn new(flags: RunFlags) -> Self {
        Self::with_output(flags, super::OutputManager::default())
    }

    /// Runtime configuration with a custom output manager
    pub fn with_output(flags: RunFlags, output: super::OutputManager) -> Self {
        Self { flags, output }
    }

    /// Requested actions
    pub fn flags(&self) -> RunFlags {
        self.flags
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.flags())
    }
}

impl RuntimeConfig {
    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        let _ = self.output.section(title);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_flags_does_nothing() {
        let args = Args::try_parse_from(["gop"]).unwrap();
        assert_eq!(args.flags(), RunFlags::default());
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from(["gop", "-p", "-r", "--pre"]).unwrap();
        assert_eq!(
            args.flags(),
            RunFlags {
                package: true,
                release: true,
                prerelease: true
            }
        );
    }

    #[test]
    fn test_short_flags_combine() {
        let args = Args::try_parse_from(["gop", "-pr"]).unwrap();
        assert!(args.package && args.release && !args.prerelease);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["gop", "--version"]).is_err());
        assert!(Args::try_parse_from(["gop", "extra"]).is_err());
    }
}
