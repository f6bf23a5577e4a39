//! Merges the directory structure into JSON rule files such as `.cursorrules`.

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use super::{to_pretty_json, StructureNode, UpdateNotice, DIRECTORY_STRUCTURE_KEY};

/// Updates a JSON rule file in place, touching only the `directory-structure` key.
///
/// This struct is stateless and provides methods as associated functions.
pub struct RuleFileUpdater;

impl RuleFileUpdater {
    /// Writes `structure` into the rule file at `path`.
    ///
    /// Returns `true` only if the file was actually written. Unreadable or
    /// invalid JSON is treated as an empty document; write failures are
    /// reported through `notify` and yield `false`.
    pub fn update<F>(
        structure: &StructureNode,
        path: &Path,
        creation_notice: Option<UpdateNotice>,
        notify: F,
    ) -> bool
    where
        F: Fn(UpdateNotice),
    {
        let file_name = display_name(path);

        let mut document = if path.exists() {
            Self::read_document(path)
        } else {
            if let Some(notice) = creation_notice {
                notify(notice);
            }
            Map::new()
        };

        let new_value = match structure.to_value() {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to convert structure for {}: {}", file_name, e);
                return false;
            }
        };

        if document.get(DIRECTORY_STRUCTURE_KEY) == Some(&new_value) {
            tracing::debug!("{} is already up to date", file_name);
            return false;
        }

        document.insert(DIRECTORY_STRUCTURE_KEY.to_string(), new_value);

        let written = to_pretty_json(&document)
            .map_err(|e| e.to_string())
            .and_then(|content| fs::write(path, content).map_err(|e| e.to_string()));

        match written {
            Ok(()) => {
                tracing::info!("Updated directory structure in {:?}", path);
                true
            }
            Err(error) => {
                tracing::error!("Failed to save {:?}: {}", path, error);
                notify(UpdateNotice::WriteFailed {
                    file: file_name,
                    error,
                });
                false
            }
        }
    }

    /// Reads the existing document, falling back to an empty object on any
    /// read or parse problem.
    fn read_document(path: &Path) -> Map<String, Value> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Could not read {:?}, starting from an empty document: {}", path, e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!(
                    "{:?} does not contain a JSON object, starting from an empty document",
                    path
                );
                Map::new()
            }
            Err(e) => {
                tracing::warn!(
                    "{:?} is not valid JSON, starting from an empty document: {}",
                    path,
                    e
                );
                Map::new()
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
