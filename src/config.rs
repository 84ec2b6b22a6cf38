//! Run configuration.
//!
//! Settings come from an optional `.cxx-tags.toml` (or the file named by
//! `--config`) and are then overridden or extended by command-line options.
//!
//! ```toml
//! include = ["include", "third_party/zlib"]
//! language = "c++"
//! output = "build/TAGS"
//! nostdinc = true
//! source-pattern = '\.(c|h|inl)$'
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TagsError};
use crate::indexer::cursor::CompilerFlags;
use crate::indexer::walker::SourceFileFilter;
use crate::languages::LanguageRegistry;

pub const CONFIG_FILE_NAME: &str = ".cxx-tags.toml";
pub const DEFAULT_OUTPUT: &str = "TAGS";

/// Raw config as deserialized from TOML.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub include: Vec<PathBuf>,
    pub language: Option<String>,
    pub output: Option<PathBuf>,
    pub nostdinc: Option<bool>,
    pub source_pattern: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TagsError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut file: ConfigFile = toml::from_str(&content).map_err(|e| TagsError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // Relative include directories are relative to the config file.
        if let Some(base) = path.parent() {
            for dir in &mut file.include {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }
        debug!("Loaded config from {}", path.display());
        Ok(file)
    }

    /// `.cxx-tags.toml` in `dir`, if present.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    pub roots: Vec<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    pub language: Option<String>,
    pub output: PathBuf,
    pub quiet: bool,
    pub system_includes: bool,
    pub source_pattern: Option<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            include_dirs: Vec::new(),
            language: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            quiet: false,
            system_includes: true,
            source_pattern: None,
        }
    }
}

impl IndexConfig {
    pub fn from_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            include_dirs: file.include,
            language: file.language,
            output: file.output.unwrap_or(defaults.output),
            system_includes: !file.nostdinc.unwrap_or(false),
            source_pattern: file.source_pattern,
            ..defaults
        }
    }

    /// Compiler flags for the parsing backend; rejects an unknown `-x` language.
    pub fn compiler_flags(&self, registry: &LanguageRegistry) -> Result<CompilerFlags> {
        let mut flags = CompilerFlags::new();
        for dir in &self.include_dirs {
            flags = flags.include(dir);
        }
        if let Some(language) = &self.language {
            if registry.get_by_flag(language).is_none() {
                return Err(TagsError::UnsupportedLanguage(format!(
                    "{} (expected one of: {})",
                    language,
                    registry.supported_flags().join(", ")
                )));
            }
            flags = flags.language(language.as_str());
        }
        if !self.system_includes {
            flags = flags.without_system_includes();
        }
        Ok(flags)
    }

    pub fn source_filter(&self) -> Result<SourceFileFilter> {
        match &self.source_pattern {
            Some(pattern) => SourceFileFilter::new(pattern),
            None => Ok(SourceFileFilter::default()),
        }
    }
}
