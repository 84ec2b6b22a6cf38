use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use tree_sitter::{Node, Tree, TreeCursor};

use crate::error::{Result, TagsError};
use crate::indexer::cursor::{
    CompilerFlags, Cursor, CursorKind, Diagnostic, DiagnosticCategory, ParseBackend,
    SourceLocation, TranslationUnit,
};
use crate::indexer::includes::{missing_include, parse_include_target, IncludeResolver};
use crate::indexer::preprocessor::{platform_macros, MacroTable};
use crate::languages::{display_name, LanguageGrammar, LanguageRegistry};

const FALLBACK_GRAMMAR: &str = "cpp";

/// Parsing backend built on tree-sitter's C and C++ grammars.
pub struct Parser {
    registry: LanguageRegistry,
    parser: tree_sitter::Parser,
}

impl Parser {
    pub fn new(registry: LanguageRegistry) -> Self {
        Self {
            registry,
            parser: tree_sitter::Parser::new(),
        }
    }

    /// Picks the grammar from `-x` when given, otherwise from the file extension.
    ///
    /// Files with an unknown extension reach the parser only through a custom
    /// source pattern; they are parsed as C++.
    pub fn grammar_for(&self, path: &Path, flags: &CompilerFlags) -> Result<Arc<dyn LanguageGrammar>> {
        match flags.language_override() {
            Some(flag) => self
                .registry
                .get_by_flag(flag)
                .ok_or_else(|| TagsError::UnsupportedLanguage(flag.to_string())),
            None => self
                .registry
                .get_for_file(path)
                .or_else(|| {
                    debug!("No grammar for {}, parsing as {}", path.display(), FALLBACK_GRAMMAR);
                    self.registry.get_by_name(FALLBACK_GRAMMAR)
                })
                .ok_or_else(|| TagsError::UnsupportedLanguage(path.display().to_string())),
        }
    }

    pub fn parse_source<'s>(
        &mut self,
        path: &Path,
        source: &'s [u8],
        grammar: Arc<dyn LanguageGrammar>,
        flags: &CompilerFlags,
    ) -> Result<ParsedFile<'s>> {
        self.parser
            .set_language(&grammar.language())
            .map_err(|e| TagsError::Parse(e.to_string()))?;

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| TagsError::Parse(format!("{}: no syntax tree produced", path.display())))?;

        let diagnostics = collect_diagnostics(&tree, source, path, grammar.as_ref(), flags);
        debug!(
            "Parsed {} as {} ({} diagnostics)",
            path.display(),
            grammar.name(),
            diagnostics.len()
        );

        Ok(ParsedFile {
            tree,
            source,
            file: Arc::from(path),
            grammar,
            diagnostics,
        })
    }
}

impl ParseBackend for Parser {
    fn parse<'s>(
        &mut self,
        path: &Path,
        source: &'s [u8],
        flags: &CompilerFlags,
    ) -> Result<Box<dyn TranslationUnit + 's>> {
        let grammar = self.grammar_for(path, flags)?;
        let parsed = self.parse_source(path, source, grammar, flags)?;
        Ok(Box::new(parsed))
    }
}

pub struct ParsedFile<'s> {
    tree: Tree,
    source: &'s [u8],
    file: Arc<Path>,
    grammar: Arc<dyn LanguageGrammar>,
    diagnostics: Vec<Diagnostic>,
}

impl ParsedFile<'_> {
    fn cursor_for(&self, node: Node<'_>) -> Cursor {
        let (kind, is_definition, spelling, display_name, extent_end) =
            match self.grammar.classify(node) {
                Some(def) => (
                    def.kind,
                    true,
                    String::from_utf8_lossy(&self.source[node.byte_range()]).into_owned(),
                    display_name(node, def.kind, self.source),
                    def.extent.end_byte(),
                ),
                None => {
                    let kind = if node.kind() == "translation_unit" {
                        CursorKind::TranslationUnit
                    } else {
                        CursorKind::Unexposed
                    };
                    (kind, false, String::new(), String::new(), node.end_byte())
                }
            };

        let start = node.start_position();
        Cursor {
            kind,
            is_definition,
            spelling,
            display_name,
            location: SourceLocation {
                file: Arc::clone(&self.file),
                line: start.row as u32 + 1,
                column: start.column as u32 + 1,
                offset: node.start_byte() as u32,
            },
            extent_end: extent_end as u32,
        }
    }
}

impl TranslationUnit for ParsedFile<'_> {
    fn file(&self) -> &Path {
        &self.file
    }

    fn cursors(&self) -> Box<dyn Iterator<Item = Cursor> + '_> {
        Box::new(
            Preorder::new(&self.tree)
                .filter(|node| node.is_named())
                .map(move |node| self.cursor_for(node)),
        )
    }

    fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Depth-first pre-order walk over every node of a tree.
pub(crate) struct Preorder<'t> {
    walker: TreeCursor<'t>,
    done: bool,
}

impl<'t> Preorder<'t> {
    pub(crate) fn new(tree: &'t Tree) -> Self {
        Self {
            walker: tree.walk(),
            done: false,
        }
    }
}

impl<'t> Iterator for Preorder<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        if self.done {
            return None;
        }
        let node = self.walker.node();

        if !self.walker.goto_first_child() {
            loop {
                if self.walker.goto_next_sibling() {
                    break;
                }
                if !self.walker.goto_parent() {
                    self.done = true;
                    break;
                }
            }
        }

        Some(node)
    }
}

fn collect_diagnostics(
    tree: &Tree,
    source: &[u8],
    path: &Path,
    grammar: &dyn LanguageGrammar,
    flags: &CompilerFlags,
) -> Vec<Diagnostic> {
    let resolver = IncludeResolver::new(path, flags);
    let mut macros = MacroTable::new(
        platform_macros()
            .iter()
            .chain(grammar.predefined_macros())
            .copied(),
    );
    let mut diagnostics = Vec::new();
    let mut syntax_error = None;

    for node in Preorder::new(tree) {
        if syntax_error.is_none() && (node.is_error() || node.is_missing()) {
            syntax_error = Some(node.start_position().row + 1);
        }
        macros.observe(node, source);
        if node.kind() != "preproc_include" || !macros.is_active(node, source) {
            continue;
        }
        let Some(target) = node.child_by_field_name("path") else {
            continue;
        };
        let text = String::from_utf8_lossy(&source[target.byte_range()]);
        if let Some((form, name)) = parse_include_target(&text) {
            if resolver.resolve(form, name).is_none() {
                diagnostics.push(missing_include(name));
            }
        }
    }

    if let Some(line) = syntax_error {
        diagnostics.push(Diagnostic::new(
            DiagnosticCategory::ParseIssue,
            format!("syntax error at line {line}"),
        ));
    }
    diagnostics
}
