//! Newest release entry from a Markdown changelog.
//!
//! Only the topmost `# <version>` block is read: its heading names the version
//! and every line up to the next `# ` heading (or end of file) is the notes body.

use crate::error::{ConfigError, Result};
use std::path::Path;

/// Version and notes of the newest changelog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Text of the first heading, e.g. `1.0.0`
    pub version: String,

    /// Lines between the first and second heading, trailing whitespace trimmed
    pub notes: String,
}

/// Read the newest entry of the changelog at `path`
pub fn read_release_info(path: &Path) -> Result<ReleaseInfo> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        log::debug!("Failed to read {}: {}", path.display(), e);
        ConfigError::ChangelogMissing {
            path: path.to_path_buf(),
        }
    })?;

    let info = parse_changelog(&contents).ok_or_else(|| ConfigError::ChangelogMalformed {
        path: path.to_path_buf(),
    })?;

    if semver::Version::parse(info.version.trim_start_matches('v')).is_err() {
        log::warn!("Changelog version '{}' is not a semantic version", info.version);
    }

    Ok(info)
}

/// Extract the newest entry from changelog text.
///
/// Returns `None` when there is no heading with a non-empty version.
pub fn parse_changelog(contents: &str) -> Option<ReleaseInfo> {
    let mut version: Option<&str> = None;
    let mut notes = String::new();

    for line in contents.lines() {
        match heading(line) {
            Some(_) if version.is_some() => break,
            Some(text) => version = Some(text),
            None if version.is_some() => {
                notes.push_str(line);
                notes.push('\n');
            }
            None => {}
        }
    }

    let version = version.filter(|v| !v.is_empty())?;
    Some(ReleaseInfo {
        version: version.to_string(),
        notes: without_trailing_blank_lines(&notes).to_string(),
    })
}

/// Drop blank lines at the end; the last kept line is left untouched so a
/// Markdown hard break (two trailing spaces) survives.
fn without_trailing_blank_lines(notes: &str) -> &str {
    let mut end = notes.trim_end_matches(['\n', '\r']);
    while let Some((rest, last)) = end.rsplit_once('\n') {
        if !last.trim().is_empty() {
            return end;
        }
        end = rest.trim_end_matches(['\n', '\r']);
    }
    if end.trim().is_empty() { "" } else { end }
}

/// Heading text if `line` starts a version block
fn heading(line: &str) -> Option<&str> {
    line.strip_prefix("# ")
        .filter(|rest| !rest.is_empty())
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReleaseError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_top_entry_only() {
        let info = parse_changelog("# 1.0.0\nfix bug\n# 0.9.0\nold\n").unwrap();
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.notes, "fix bug");
    }

    #[test]
    fn test_notes_keep_order_and_drop_trailing_blank_lines() {
        let changelog = "# v2.1.0\n\n- added flags\n## Fixed\n- crash on start\n\n\n# v2.0.0\n- initial\n";
        let info = parse_changelog(changelog).unwrap();
        assert_eq!(info.version, "v2.1.0");
        assert_eq!(info.notes, "\n- added flags\n## Fixed\n- crash on start");
    }

    #[test]
    fn test_trailing_spaces_of_last_line_are_kept() {
        let info = parse_changelog("# 1.1.0\n- first  \nsecond line  \n   \n\n").unwrap();
        assert_eq!(info.notes, "- first  \nsecond line  ");
    }

    #[test]
    fn test_whitespace_only_notes_are_empty() {
        let info = parse_changelog("# 1.1.0\n  \n\t\n").unwrap();
        assert_eq!(info.notes, "");
    }

    #[test]
    fn test_single_heading_reads_to_end_of_file() {
        let info = parse_changelog("#  0.1.0  \nfirst\nsecond\n").unwrap();
        assert_eq!(info.version, "0.1.0");
        assert_eq!(info.notes, "first\nsecond");
    }

    #[test]
    fn test_text_before_first_heading_is_ignored() {
        let info = parse_changelog("Changelog\n=========\n# 3.0.0\nbreaking\n").unwrap();
        assert_eq!(info.version, "3.0.0");
        assert_eq!(info.notes, "breaking");
    }

    #[test]
    fn test_heading_without_notes() {
        let info = parse_changelog("# 1.2.3\n# 1.2.2\nolder\n").unwrap();
        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.notes, "");
    }

    #[test]
    fn test_no_heading() {
        assert!(parse_changelog("").is_none());
        assert!(parse_changelog("## 1.0.0\nnot a top heading\n#\n# \n").is_none());
    }

    #[test]
    fn test_read_release_info_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("CHANGELOG.md");

        assert!(matches!(
            read_release_info(&path),
            Err(ReleaseError::Config(ConfigError::ChangelogMissing { .. }))
        ));

        fs::write(&path, "nothing to see\n").unwrap();
        assert!(matches!(
            read_release_info(&path),
            Err(ReleaseError::Config(ConfigError::ChangelogMalformed { .. }))
        ));

        fs::write(&path, "# 1.0.0\r\nwindows line endings\r\n").unwrap();
        let info = read_release_info(&path).unwrap();
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.notes, "windows line endings");
    }
}
