use std::fmt;
use std::path::{Path, PathBuf};

use super::{CoreError, MarkdownJsonUpdater, RuleFileUpdater, StructureNode, UpdateNotice};

/// The rule files kept in sync with the project structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTarget {
    /// `.cursorrules` (JSON)
    Cursor,
    /// `.windsurfrules` (JSON)
    Windsurf,
    /// `.github/copilot-instructions.md` (Markdown with an embedded JSON block)
    Copilot,
}

impl RuleTarget {
    pub const ALL: [RuleTarget; 3] = [RuleTarget::Cursor, RuleTarget::Windsurf, RuleTarget::Copilot];

    /// Location of the rule file relative to the project root.
    pub fn relative_path(self) -> &'static str {
        match self {
            RuleTarget::Cursor => ".cursorrules",
            RuleTarget::Windsurf => ".windsurfrules",
            RuleTarget::Copilot => ".github/copilot-instructions.md",
        }
    }

    pub fn path_in(self, root: &Path) -> PathBuf {
        root.join(self.relative_path())
    }

    /// Writes `structure` into this target's rule file below `root`.
    ///
    /// Returns `true` if the file was written.
    pub fn update<F>(self, structure: &StructureNode, root: &Path, notify: F) -> Result<bool, CoreError>
    where
        F: Fn(UpdateNotice),
    {
        let path = self.path_in(root);
        match self {
            RuleTarget::Cursor | RuleTarget::Windsurf => {
                let notice = UpdateNotice::FileCreated(self.relative_path().to_string());
                Ok(RuleFileUpdater::update(structure, &path, Some(notice), notify))
            }
            RuleTarget::Copilot => MarkdownJsonUpdater::update(structure, &path, notify),
        }
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.relative_path())
    }
}
