use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{CoreError, IgnoreRuleSet, StructureNode};

/// Walks a project directory and builds its [`StructureNode`].
pub struct DirectoryScanner {
    root: PathBuf,
}

impl DirectoryScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scans the root directory, pruning every ignored entry together with
    /// its whole subtree.
    ///
    /// Unreadable entries below the root are skipped. Only a missing or
    /// unreadable root fails the scan.
    pub fn scan(&self, rules: &IgnoreRuleSet) -> Result<StructureNode, CoreError> {
        let metadata =
            fs::metadata(&self.root).map_err(|e| CoreError::Io(e, self.root.clone()))?;
        if !metadata.is_dir() {
            return Err(CoreError::NotADirectory(self.root.clone()));
        }

        let mut structure = StructureNode::new();
        let mut entries_seen = 0usize;

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !self.is_ignored(entry, rules));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(CoreError::Walk(e)),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let relative = entry.path().strip_prefix(&self.root)?;
            let segments = path_segments(relative);
            structure.insert_path(&segments, Self::is_directory(&entry));
            entries_seen += 1;
        }

        tracing::debug!(
            "Scanned {:?}: {} entries kept after ignore rules",
            self.root,
            entries_seen
        );

        Ok(structure)
    }

    fn is_ignored(&self, entry: &DirEntry, rules: &IgnoreRuleSet) -> bool {
        match entry.path().strip_prefix(&self.root) {
            Ok(relative) => rules.should_ignore(relative),
            Err(_) => false,
        }
    }

    /// Directories and symlinks resolving to directories become nested nodes.
    fn is_directory(entry: &DirEntry) -> bool {
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            return entry.path().is_dir();
        }
        file_type.is_dir()
    }
}

fn path_segments(relative: &Path) -> Vec<String> {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
