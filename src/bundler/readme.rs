//! Readme placed at the top of every archive.

use crate::config::SOURCE_PROTOCOL;
use crate::metadata::ProjectInfo;

/// Render the readme for `project`
pub fn render(project: &ProjectInfo) -> String {
    format!(
        "Thank you for downloading {}\n\
         If you would like to contribute and/or download the source code, visit:\n\
         {}{}\n",
        title_case(&project.project_name),
        SOURCE_PROTOCOL,
        project.module_path
    )
}

/// Upper-case the first letter of every word.
///
/// Letters, digits and `_` continue a word; anything else separates words.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("gop"), "Gop");
        assert_eq!(title_case("tool-kit"), "Tool-Kit");
        assert_eq!(title_case("snake_case"), "Snake_case");
        assert_eq!(title_case("v2.cli"), "V2.Cli");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_render() {
        let project = ProjectInfo::from_module_path("github.com/x/my-tool");
        assert_eq!(
            render(&project),
            "Thank you for downloading My-Tool\n\
             If you would like to contribute and/or download the source code, visit:\n\
             https://github.com/x/my-tool\n"
        );
    }
}
