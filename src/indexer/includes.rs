//! Include resolution for the tree-sitter backend.
//!
//! Tree-sitter does not preprocess, so unresolved `#include` directives are
//! reported here with the same wording a compiler front end uses.

use std::path::{Path, PathBuf};

use crate::indexer::cursor::{CompilerFlags, Diagnostic, DiagnosticCategory};

pub const SYSTEM_INCLUDE_DIRS: &[&str] = &["/usr/local/include", "/usr/include"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeForm {
    /// `#include "name"`
    Quoted,
    /// `#include <name>`
    Angled,
}

/// Splits the path operand of an include directive into its form and name.
pub fn parse_include_target(text: &str) -> Option<(IncludeForm, &str)> {
    let text = text.trim();
    if let Some(name) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        return Some((IncludeForm::Quoted, name));
    }
    if let Some(name) = text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Some((IncludeForm::Angled, name));
    }
    None
}

pub fn missing_include(name: &str) -> Diagnostic {
    Diagnostic::new(
        DiagnosticCategory::PreprocessorIssue,
        format!("'{name}' file not found"),
    )
}

pub struct IncludeResolver<'a> {
    file_dir: Option<&'a Path>,
    flags: &'a CompilerFlags,
}

impl<'a> IncludeResolver<'a> {
    pub fn new(file: &'a Path, flags: &'a CompilerFlags) -> Self {
        Self {
            file_dir: file.parent(),
            flags,
        }
    }

    pub fn resolve(&self, form: IncludeForm, name: &str) -> Option<PathBuf> {
        if Path::new(name).is_absolute() {
            let path = PathBuf::from(name);
            return path.is_file().then_some(path);
        }

        let quoted_dir = match form {
            IncludeForm::Quoted => self.file_dir,
            IncludeForm::Angled => None,
        };
        let system_dirs = self
            .flags
            .system_includes()
            .then_some(SYSTEM_INCLUDE_DIRS)
            .unwrap_or_default();

        quoted_dir
            .into_iter()
            .chain(self.flags.include_dirs().iter().map(PathBuf::as_path))
            .chain(system_dirs.iter().map(|dir| Path::new(*dir)))
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}
