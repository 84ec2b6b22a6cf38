//! The capability surface a parsing backend exposes to the indexer.
//!
//! The indexer never looks at syntax trees directly. A backend turns a source
//! file into a [`TranslationUnit`]: a depth-first sequence of [`Cursor`]s plus the
//! [`Diagnostic`]s produced while parsing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    TranslationUnit,
    FunctionDecl,
    CxxMethod,
    StructDecl,
    ClassDecl,
    UnionDecl,
    EnumDecl,
    EnumConstantDecl,
    FieldDecl,
    VarDecl,
    TypedefDecl,
    TypeAliasDecl,
    Namespace,
    MacroDefinition,
    Unexposed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Arc<Path>,
    /// 1-based.
    pub line: u32,
    /// 1-based, in bytes.
    pub column: u32,
    pub offset: u32,
}

#[derive(Debug, Clone)]
pub struct Cursor {
    pub kind: CursorKind,
    pub is_definition: bool,
    pub spelling: String,
    /// Spelling plus parameter types for functions, e.g. `add(int, int)`.
    pub display_name: String,
    pub location: SourceLocation,
    /// Byte offset one past the end of the cursor's extent.
    pub extent_end: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    PreprocessorIssue,
    ParseIssue,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub spelling: String,
}

impl Diagnostic {
    pub fn new(category: DiagnosticCategory, spelling: impl Into<String>) -> Self {
        Self {
            category,
            spelling: spelling.into(),
        }
    }
}

/// Compiler-style options handed to the backend for every file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerFlags {
    include_dirs: Vec<PathBuf>,
    language: Option<String>,
    system_includes: bool,
}

impl CompilerFlags {
    pub fn new() -> Self {
        Self {
            include_dirs: Vec::new(),
            language: None,
            system_includes: true,
        }
    }

    pub fn include(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn without_system_includes(mut self) -> Self {
        self.system_includes = false;
        self
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    pub fn language_override(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn system_includes(&self) -> bool {
        self.system_includes
    }

    /// Renders the flags the way they would appear on a compiler command line.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.include_dirs.len() * 2 + 3);
        for dir in &self.include_dirs {
            args.push("-I".to_string());
            args.push(dir.display().to_string());
        }
        if let Some(language) = &self.language {
            args.push("-x".to_string());
            args.push(language.clone());
        }
        if !self.system_includes {
            args.push("-nostdinc".to_string());
        }
        args
    }
}

impl Default for CompilerFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed source file.
pub trait TranslationUnit {
    /// The file this unit was parsed from.
    fn file(&self) -> &Path;

    /// Every cursor in depth-first pre-order, starting at the translation unit.
    /// Each call starts a fresh traversal.
    fn cursors(&self) -> Box<dyn Iterator<Item = Cursor> + '_>;

    fn diagnostics(&self) -> &[Diagnostic];
}

pub trait ParseBackend {
    /// Parses `source`, the contents of `path`.
    ///
    /// Returning an error means no usable tree exists; callers skip the file.
    fn parse<'s>(
        &mut self,
        path: &Path,
        source: &'s [u8],
        flags: &CompilerFlags,
    ) -> Result<Box<dyn TranslationUnit + 's>>;
}
