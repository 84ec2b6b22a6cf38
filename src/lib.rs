pub mod config;
pub mod error;
pub mod indexer;
pub mod languages;
pub mod tags;

pub use config::{ConfigFile, IndexConfig};
pub use error::{Result, TagsError};
pub use indexer::{run, CompilerFlags, FileWalker, Parser, RunContext, RunSummary, SourceFileFilter};
pub use languages::LanguageRegistry;
pub use tags::{read_sections, Section, TagBuffer, TagRecord, TagsWriter};
