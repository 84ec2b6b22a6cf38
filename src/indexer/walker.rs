use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

pub const SOURCE_PATTERN: &str = r"\.(c|cpp|cc|cxx|h|hpp)$";

static DEFAULT_SOURCE_FILTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(SOURCE_PATTERN).expect("valid source pattern"));

/// Selects C/C++ sources and headers by path suffix.
#[derive(Debug, Clone)]
pub struct SourceFileFilter {
    pattern: Regex,
}

impl SourceFileFilter {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.pattern.is_match(&path.to_string_lossy())
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for SourceFileFilter {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_SOURCE_FILTER.clone(),
        }
    }
}

pub struct FileWalker {
    filter: SourceFileFilter,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

impl FileWalker {
    pub fn new(filter: SourceFileFilter) -> Self {
        Self { filter }
    }

    /// Source files under `root` in file-name order.
    ///
    /// Dot-prefixed entries below the root are pruned and symbolic links are
    /// never followed, the root included. Unreadable entries are logged and
    /// skipped.
    pub fn walk<'a>(&'a self, root: &Path) -> impl Iterator<Item = PathBuf> + 'a {
        WalkDir::new(root)
            .follow_links(false)
            .follow_root_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(move |entry| self.filter.matches(entry.path()))
            .map(DirEntry::into_path)
    }

    pub fn is_supported(&self, path: &Path) -> bool {
        self.filter.matches(path)
    }
}
