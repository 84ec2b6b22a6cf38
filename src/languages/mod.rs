pub mod c;
pub mod cpp;
pub mod definitions;

pub use definitions::{classify, display_name, Definition};

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub trait LanguageGrammar: Send + Sync {
    fn name(&self) -> &'static str;
    fn file_extensions(&self) -> &[&'static str];

    /// Values accepted by `-x` to force this grammar.
    fn language_flags(&self) -> &[&'static str];

    fn language(&self) -> tree_sitter::Language;

    /// Macros the language mode defines before the first line.
    fn predefined_macros(&self) -> &[&'static str] {
        &[]
    }

    /// Classifies a syntax node as the name of a definition.
    fn classify<'t>(&self, node: tree_sitter::Node<'t>) -> Option<Definition<'t>> {
        definitions::classify(node)
    }
}

pub struct LanguageRegistry {
    languages: HashMap<String, Arc<dyn LanguageGrammar>>,
    extension_map: HashMap<String, String>,
    flag_map: HashMap<String, String>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            languages: HashMap::new(),
            extension_map: HashMap::new(),
            flag_map: HashMap::new(),
        };

        registry.register(Arc::new(c::CGrammar));
        registry.register(Arc::new(cpp::CppGrammar));

        registry
    }

    pub fn register(&mut self, grammar: Arc<dyn LanguageGrammar>) {
        let name = grammar.name().to_string();
        for ext in grammar.file_extensions() {
            self.extension_map.insert(ext.to_string(), name.clone());
        }
        for flag in grammar.language_flags() {
            self.flag_map.insert(flag.to_string(), name.clone());
        }
        self.languages.insert(name, grammar);
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn LanguageGrammar>> {
        self.languages.get(name).cloned()
    }

    /// Looks up the grammar selected by a `-x` value.
    pub fn get_by_flag(&self, flag: &str) -> Option<Arc<dyn LanguageGrammar>> {
        self.flag_map
            .get(flag)
            .and_then(|name| self.languages.get(name))
            .cloned()
    }

    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn LanguageGrammar>> {
        self.extension_map
            .get(ext)
            .and_then(|name| self.languages.get(name))
            .cloned()
    }

    pub fn get_for_file(&self, path: &Path) -> Option<Arc<dyn LanguageGrammar>> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.get_by_extension(ext))
    }

    pub fn supported_flags(&self) -> Vec<&str> {
        let mut flags: Vec<&str> = self.flag_map.keys().map(|s| s.as_str()).collect();
        flags.sort_unstable();
        flags
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
