//! Keeps a fenced JSON block inside a Markdown rule file up to date.
//!
//! Only the content between the first ```` ```json ```` fence and its closing
//! fence is owned by this module; all surrounding prose is left untouched.

use serde::Serialize;
use std::fs;
use std::path::Path;

use super::{to_pretty_json, CoreError, StructureNode, UpdateNotice};

const OPEN_FENCE: &str = "```json";
const CLOSE_FENCE: &str = "```";

/// Initial content for a Markdown rule file that does not exist yet.
pub const MARKDOWN_TEMPLATE: &str = r#"# Copilot Instructions

This file contains instructions for GitHub Copilot about the project structure.

## Project Structure

The following JSON represents the current project structure:

```json
{
    "directory-structure": {}
}
```
"#;

#[derive(Serialize)]
struct EmbeddedStructure<'a> {
    #[serde(rename = "directory-structure")]
    structure: &'a StructureNode,
}

/// Updates the JSON block of a Markdown rule file.
pub struct MarkdownJsonUpdater;

impl MarkdownJsonUpdater {
    /// Writes `structure` into the fenced JSON block of the file at `path`,
    /// creating the file (and its parent directory) from [`MARKDOWN_TEMPLATE`]
    /// when missing.
    ///
    /// Returns `true` if the file content changed on disk.
    pub fn update<F>(structure: &StructureNode, path: &Path, notify: F) -> Result<bool, CoreError>
    where
        F: Fn(UpdateNotice),
    {
        if !path.exists() {
            Self::create_from_template(path, &notify)?;
        }

        let content =
            fs::read_to_string(path).map_err(|e| CoreError::Io(e, path.to_path_buf()))?;
        let json = to_pretty_json(&EmbeddedStructure { structure })?;

        let new_content = match replace_json_block(&content, &json) {
            Some(replaced) if replaced == content => {
                tracing::debug!("{:?} is already up to date", path);
                return Ok(false);
            }
            Some(replaced) => replaced,
            None => {
                tracing::debug!("No complete JSON block in {:?}, appending one", path);
                append_json_block(&content, &json)
            }
        };

        fs::write(path, new_content).map_err(|e| CoreError::Io(e, path.to_path_buf()))?;
        tracing::info!("Updated directory structure in {:?}", path);
        Ok(true)
    }

    fn create_from_template<F>(path: &Path, notify: &F) -> Result<(), CoreError>
    where
        F: Fn(UpdateNotice),
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CoreError::Io(e, parent.to_path_buf()))?;
                notify(UpdateNotice::DirectoryCreated(file_name(parent)));
            }
        }

        notify(UpdateNotice::FileCreated(file_name(path)));
        fs::write(path, MARKDOWN_TEMPLATE).map_err(|e| CoreError::Io(e, path.to_path_buf()))
    }
}

/// Replaces the first complete JSON block with `json`.
///
/// An opening fence whose next fence opens another JSON block is left alone,
/// so a block appended after an unterminated fence is the one kept current.
/// Returns `None` if no opening fence is ever closed.
pub fn replace_json_block(content: &str, json: &str) -> Option<String> {
    let mut start = content.find(OPEN_FENCE)?;
    let end = loop {
        let body_start = start + OPEN_FENCE.len();
        let next = body_start + content[body_start..].find(CLOSE_FENCE)?;
        if content[next..].starts_with(OPEN_FENCE) {
            start = next;
        } else {
            break next;
        }
    };

    Some(format!(
        "{}{OPEN_FENCE}\n{json}\n{CLOSE_FENCE}{}",
        &content[..start],
        &content[end + CLOSE_FENCE.len()..]
    ))
}

/// Appends a new JSON block after the right-trimmed content.
pub fn append_json_block(content: &str, json: &str) -> String {
    format!("{}\n\n{OPEN_FENCE}\n{json}\n{CLOSE_FENCE}\n", content.trim_end())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use tempfile::tempdir;

    fn structure(value: serde_json::Value) -> StructureNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn creates_directory_and_template_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".github").join("copilot-instructions.md");
        let notices = RefCell::new(Vec::new());

        // An empty tree matches the template, so nothing beyond creation happens.
        let changed =
            MarkdownJsonUpdater::update(&StructureNode::new(), &path, |n| {
                notices.borrow_mut().push(n)
            })
            .unwrap();

        assert!(!changed);
        assert_eq!(
            notices.into_inner(),
            vec![
                UpdateNotice::DirectoryCreated(".github".into()),
                UpdateNotice::FileCreated("copilot-instructions.md".into()),
            ]
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), MARKDOWN_TEMPLATE);
    }

    #[test]
    fn replaces_only_the_fenced_block() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instructions.md");
        let before = "# Title\n\nSome prose.\n\n```json\n{\"directory-structure\": {}}\n```\n\nTrailing notes.\n";
        fs::write(&path, before).unwrap();

        let changed = MarkdownJsonUpdater::update(
            &structure(json!({"src": {"main.py": null}})),
            &path,
            |_| {},
        )
        .unwrap();

        assert!(changed);
        let after = fs::read_to_string(&path).unwrap();
        assert!(after.starts_with("# Title\n\nSome prose.\n\n```json\n"));
        assert!(after.ends_with("\n```\n\nTrailing notes.\n"));
        assert_eq!(
            after,
            "# Title\n\nSome prose.\n\n```json\n{\n    \"directory-structure\": {\n        \"src\": {\n            \"main.py\": null\n        }\n    }\n}\n```\n\nTrailing notes.\n"
        );
    }

    #[test]
    fn unchanged_structure_does_not_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instructions.md");
        let tree = structure(json!({"a.txt": null}));

        MarkdownJsonUpdater::update(&tree, &path, |_| {}).unwrap();
        let first = fs::read_to_string(&path).unwrap();

        assert!(!MarkdownJsonUpdater::update(&tree, &path, |_| {}).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn appends_block_when_none_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instructions.md");
        fs::write(&path, "# Notes\n\nNo JSON here.\n\n\n").unwrap();

        assert!(MarkdownJsonUpdater::update(&StructureNode::new(), &path, |_| {}).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Notes\n\nNo JSON here.\n\n```json\n{\n    \"directory-structure\": {}\n}\n```\n"
        );
    }

    #[test]
    fn unterminated_fence_falls_back_to_append() {
        let content = "intro\n```json\n{\"broken\": true}\n";

        assert_eq!(replace_json_block(content, "{}"), None);
        assert_eq!(
            append_json_block(content, "{}"),
            "intro\n```json\n{\"broken\": true}\n\n```json\n{}\n```\n"
        );
    }

    #[test]
    fn appended_block_after_unterminated_fence_stays_current() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("instructions.md");
        fs::write(&path, "intro\n```json\n{\"broken\": true}\n").unwrap();
        let first = structure(json!({"a.txt": null}));
        let second = structure(json!({"a.txt": null, "b.txt": null}));

        assert!(MarkdownJsonUpdater::update(&first, &path, |_| {}).unwrap());
        let appended = fs::read_to_string(&path).unwrap();
        assert!(!MarkdownJsonUpdater::update(&first, &path, |_| {}).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), appended);

        assert!(MarkdownJsonUpdater::update(&second, &path, |_| {}).unwrap());
        let after = fs::read_to_string(&path).unwrap();
        assert!(after.starts_with("intro\n```json\n{\"broken\": true}\n\n```json\n{\n"));
        assert!(after.contains("\"b.txt\": null"));
        assert!(after.ends_with("\n}\n```\n"));
        assert_eq!(after.matches(OPEN_FENCE).count(), 2);
    }

    #[test]
    fn only_the_first_block_is_replaced() {
        let content = "```json\nold\n```\nmiddle\n```json\nsecond\n```\n";

        assert_eq!(
            replace_json_block(content, "new").unwrap(),
            "```json\nnew\n```\nmiddle\n```json\nsecond\n```\n"
        );
    }
}
