//! Loading and evaluation of simplified `.gitignore`-style rules.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path};

use super::CoreError;

/// Name of the ignore file, looked up in the scan root.
pub const IGNORE_FILE: &str = ".gitignore";

/// The rules of one ignore file, compiled for matching.
///
/// A rule set is built once per scan cycle and never cached across cycles.
#[derive(Debug, Clone)]
pub struct IgnoreRuleSet {
    patterns: Vec<String>,
    globs: GlobSet,
    dir_names: HashSet<String>,
}

impl Default for IgnoreRuleSet {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            globs: GlobSet::empty(),
            dir_names: HashSet::new(),
        }
    }
}

impl IgnoreRuleSet {
    /// Reads `<root>/.gitignore`. A missing file yields an empty rule set.
    pub fn load(root: &Path) -> Result<Self, CoreError> {
        let path = root.join(IGNORE_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let rules = Self::parse(&content);
                tracing::debug!("Loaded {} ignore rules from {:?}", rules.len(), path);
                Ok(rules)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(CoreError::Io(e, path)),
        }
    }

    /// Parses ignore file content. Blank lines and `#` comments are skipped,
    /// every other line is trimmed and kept in file order.
    pub fn parse(content: &str) -> Self {
        Self::from_patterns(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Builds a rule set from already-cleaned patterns.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();
        let mut dir_names = HashSet::new();

        for pattern in &patterns {
            // The pattern itself against the full relative path, then the same
            // pattern anchored below any directory.
            let literal = literal_braces(pattern);
            for candidate in [literal.clone(), format!("*/{literal}")] {
                let glob = GlobBuilder::new(&candidate)
                    .literal_separator(false)
                    .backslash_escape(false)
                    .build();
                match glob {
                    Ok(glob) => {
                        builder.add(glob);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping invalid ignore pattern {:?}: {}", candidate, e);
                    }
                }
            }

            if let Some(dir_name) = pattern.strip_suffix('/') {
                dir_names.insert(dir_name.to_string());
            }
        }

        let globs = builder.build().unwrap_or_else(|e| {
            tracing::error!("Failed to build glob set from ignore patterns: {}", e);
            GlobSet::empty()
        });

        Self {
            patterns,
            globs,
            dir_names,
        }
    }

    /// Returns `true` if the path (relative to the scan root) is excluded.
    ///
    /// Entries directly under the root are never excluded.
    pub fn should_ignore(&self, relative_path: &Path) -> bool {
        let segments: Vec<String> = relative_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if segments.len() <= 1 || self.patterns.is_empty() {
            return false;
        }

        if segments.iter().any(|s| self.dir_names.contains(s)) {
            return true;
        }

        self.globs.is_match(segments.join("/"))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Rewrites a rule so that only `*`, `?` and `[...]` classes are special.
///
/// Braces become single-character classes and an unclosed `[` matches itself.
fn literal_braces(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut glob = String::with_capacity(pattern.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    glob.extend(&chars[i..=end]);
                    i = end + 1;
                    continue;
                }
                None => glob.push_str("[[]"),
            },
            '{' => glob.push_str("[{]"),
            '}' => glob.push_str("[}]"),
            c => glob.push(c),
        }
        i += 1;
    }
    glob
}

/// Index of the `]` closing the class opened at `open`. A `]` right after
/// the opening bracket (or its `!`) is part of the class.
fn class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut first = open + 1;
    if chars.get(first) == Some(&'!') {
        first += 1;
    }
    if chars.get(first) == Some(&']') {
        first += 1;
    }
    chars
        .get(first..)?
        .iter()
        .position(|&c| c == ']')
        .map(|offset| first + offset)
}
