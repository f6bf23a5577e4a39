pub mod error;
pub mod ignore;
pub mod markdown;
pub mod rule_file;
pub mod scanner;
pub mod targets;

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// The JSON key owned by this tool inside every rule file.
pub const DIRECTORY_STRUCTURE_KEY: &str = "directory-structure";

/// A nested view of a directory after ignore filtering.
///
/// Every entry maps a name to `None` for files or to a nested node for
/// directories. Names are kept in a `BTreeMap` so serialization is
/// deterministic, while equality stays independent of scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureNode {
    entries: BTreeMap<String, Option<StructureNode>>,
}

impl StructureNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a relative path given as its segments.
    ///
    /// Missing intermediate segments are created as directories. An existing
    /// directory is never downgraded to a file.
    pub fn insert_path<S: AsRef<str>>(&mut self, segments: &[S], is_directory: bool) {
        let Some((name, rest)) = segments.split_first() else {
            return;
        };

        let slot = self.entries.entry(name.as_ref().to_string()).or_insert(None);
        if rest.is_empty() {
            if is_directory && slot.is_none() {
                *slot = Some(StructureNode::default());
            }
            return;
        }

        slot.get_or_insert_with(StructureNode::default)
            .insert_path(rest, is_directory);
    }

    /// Returns `true` if an entry (file or directory) with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the nested node if `name` is a directory.
    pub fn child(&self, name: &str) -> Option<&StructureNode> {
        self.entries.get(name).and_then(Option::as_ref)
    }

    /// Returns `true` if `name` exists and is recorded as a file.
    pub fn is_file(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(None))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the tree into a `serde_json::Value` for comparisons against
    /// documents read from disk.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Serializes a value as JSON indented with four spaces.
///
/// Non-ASCII characters are written as-is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Notices produced by the updaters for the operator-facing log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateNotice {
    /// A missing parent directory of a rule file was created.
    DirectoryCreated(String),
    /// A rule file did not exist and is being created.
    FileCreated(String),
    /// Writing a rule file failed; the update was abandoned for this cycle.
    WriteFailed { file: String, error: String },
}

impl fmt::Display for UpdateNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateNotice::DirectoryCreated(dir) => write!(f, "📁 Creating {dir}/ directory"),
            UpdateNotice::FileCreated(file) => write!(f, "📄 Creating {file} file..."),
            UpdateNotice::WriteFailed { file, error } => {
                write!(f, "Error saving file {file}: {error}")
            }
        }
    }
}

pub use error::CoreError;
pub use ignore::{IgnoreRuleSet, IGNORE_FILE};
pub use markdown::MarkdownJsonUpdater;
pub use rule_file::RuleFileUpdater;
pub use scanner::DirectoryScanner;
pub use targets::RuleTarget;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_path_builds_nested_directories() {
        let mut root = StructureNode::new();
        root.insert_path(&["src"], true);
        root.insert_path(&["src", "main.rs"], false);
        root.insert_path(&["README.md"], false);

        assert!(root.is_file("README.md"));
        let src = root.child("src").expect("src should be a directory");
        assert!(src.is_file("main.rs"));
        assert_eq!(root.len(), 2);
    }

    #[test]
    fn insert_path_never_downgrades_a_directory() {
        let mut root = StructureNode::new();
        root.insert_path(&["docs", "guide.md"], false);
        root.insert_path(&["docs"], false);

        assert!(root.child("docs").is_some());
    }

    #[test]
    fn empty_directories_serialize_as_empty_objects() {
        let mut root = StructureNode::new();
        root.insert_path(&["a.txt"], false);
        root.insert_path(&["b"], true);

        assert_eq!(root.to_value().unwrap(), json!({"a.txt": null, "b": {}}));
    }

    #[test]
    fn structure_round_trips_through_json_values() {
        let value = json!({"src": {"main.rs": null, "bin": {}}, "Cargo.toml": null});
        let node: StructureNode = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(node.to_value().unwrap(), value);
        assert!(node.child("src").unwrap().child("bin").unwrap().is_empty());
    }

    #[test]
    fn pretty_json_uses_four_spaces_and_keeps_unicode() {
        let value = json!({"directory-structure": {"süß.txt": null}});
        let rendered = to_pretty_json(&value).unwrap();

        insta::assert_snapshot!(rendered, @r#"
        {
            "directory-structure": {
                "süß.txt": null
            }
        }
        "#);
    }

    #[test]
    fn notices_render_operator_messages() {
        assert_eq!(
            UpdateNotice::FileCreated(".cursorrules".into()).to_string(),
            "📄 Creating .cursorrules file..."
        );
        assert_eq!(
            UpdateNotice::DirectoryCreated(".github".into()).to_string(),
            "📁 Creating .github/ directory"
        );
    }
}
