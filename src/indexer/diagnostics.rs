use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::indexer::cursor::{Diagnostic, DiagnosticCategory};

pub const MAX_MISSING_FILES: usize = 100;

static FILE_NOT_FOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'(.*)' file not found").expect("valid file-not-found pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Added,
    Duplicate,
    Overflow,
}

/// Headers that could not be resolved during the run, in first-seen order.
#[derive(Debug)]
pub struct MissingFileSet {
    files: Vec<String>,
    seen: HashSet<String>,
    limit: usize,
    overflow: usize,
}

impl MissingFileSet {
    pub fn new() -> Self {
        Self::with_limit(MAX_MISSING_FILES)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            files: Vec::new(),
            seen: HashSet::new(),
            limit,
            overflow: 0,
        }
    }

    pub fn insert(&mut self, name: &str) -> Insertion {
        if self.seen.contains(name) {
            return Insertion::Duplicate;
        }
        if self.files.len() >= self.limit {
            if self.overflow == 0 {
                warn!(
                    "More than {} missing include files; further ones are not listed",
                    self.limit
                );
            }
            self.overflow += 1;
            return Insertion::Overflow;
        }

        self.seen.insert(name.to_string());
        self.files.push(name.to_string());
        Insertion::Added
    }

    /// Records every "file not found" preprocessor diagnostic; returns how many
    /// new names were added.
    pub fn record_diagnostics(&mut self, diagnostics: &[Diagnostic]) -> usize {
        diagnostics
            .iter()
            .filter_map(missing_file_name)
            .filter(|name| self.insert(name) == Insertion::Added)
            .count()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Insertions rejected because the set was full.
    pub fn overflow(&self) -> usize {
        self.overflow
    }
}

impl Default for MissingFileSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the header name from a "file not found" preprocessor diagnostic.
pub fn missing_file_name(diagnostic: &Diagnostic) -> Option<&str> {
    if diagnostic.category != DiagnosticCategory::PreprocessorIssue {
        return None;
    }
    FILE_NOT_FOUND
        .captures(&diagnostic.spelling)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
