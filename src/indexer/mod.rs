pub mod cursor;
pub mod diagnostics;
pub mod includes;
pub mod parser;
pub mod pipeline;
pub mod preprocessor;
pub mod progress;
pub mod source;
pub mod visitor;
pub mod walker;

pub use cursor::{
    CompilerFlags, Cursor, CursorKind, Diagnostic, DiagnosticCategory, ParseBackend,
    SourceLocation, TranslationUnit,
};
pub use diagnostics::{MissingFileSet, MAX_MISSING_FILES};
pub use parser::Parser;
pub use pipeline::{run, RunContext, RunSummary};
pub use progress::IndexingProgress;
pub use source::SourceContents;
pub use visitor::definitions;
pub use walker::{FileWalker, SourceFileFilter, SOURCE_PATTERN};
