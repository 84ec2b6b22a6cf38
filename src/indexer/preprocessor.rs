//! Decides which preprocessor branches are active.
//!
//! Only what can be known from the file itself is evaluated: `#ifdef`,
//! `#ifndef`, `defined(...)`, integer literals, `!`, `&&` and `||`. A branch
//! whose condition depends on anything else counts as active.

use std::collections::HashSet;

use tree_sitter::Node;

/// Macros the backend assumes are always defined for the host.
pub fn platform_macros() -> &'static [&'static str] {
    if cfg!(windows) {
        &["__STDC__", "_WIN32"]
    } else if cfg!(target_os = "linux") {
        &["__STDC__", "__GNUC__", "__unix__", "__linux__"]
    } else if cfg!(target_os = "macos") {
        &["__STDC__", "__GNUC__", "__APPLE__"]
    } else if cfg!(unix) {
        &["__STDC__", "__GNUC__", "__unix__"]
    } else {
        &["__STDC__"]
    }
}

/// Macro names defined so far in one file.
#[derive(Debug, Default)]
pub struct MacroTable {
    defined: HashSet<String>,
}

impl MacroTable {
    pub fn new<'a>(predefined: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            defined: predefined.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn define(&mut self, name: &str) {
        self.defined.insert(name.to_string());
    }

    pub fn undefine(&mut self, name: &str) {
        self.defined.remove(name);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name)
    }

    /// Tracks `#define` and `#undef` directives that sit in active code.
    pub fn observe(&mut self, node: Node<'_>, source: &[u8]) {
        match node.kind() {
            "preproc_def" | "preproc_function_def" => {
                if let Some(name) = node.child_by_field_name("name") {
                    if self.is_active(node, source) {
                        self.define(text(name, source).trim());
                    }
                }
            }
            "preproc_call" => {
                let directive = node.child_by_field_name("directive");
                let argument = node.child_by_field_name("argument");
                if let (Some(directive), Some(argument)) = (directive, argument) {
                    if text(directive, source) == "#undef" && self.is_active(node, source) {
                        self.undefine(text(argument, source).trim());
                    }
                }
            }
            _ => {}
        }
    }

    /// False when `node` sits in a branch that the preprocessor would drop.
    pub fn is_active(&self, node: Node<'_>, source: &[u8]) -> bool {
        let mut child = node;
        let mut current = node.parent();
        while let Some(parent) = current {
            if let Some(taken) = self.branch_taken(parent, source) {
                let in_alternative = parent
                    .child_by_field_name("alternative")
                    .is_some_and(|alt| alt.id() == child.id());
                if in_alternative == taken {
                    return false;
                }
            }
            child = parent;
            current = parent.parent();
        }
        true
    }

    fn branch_taken(&self, conditional: Node<'_>, source: &[u8]) -> Option<bool> {
        match conditional.kind() {
            "preproc_ifdef" | "preproc_elifdef" => {
                let name = conditional.child_by_field_name("name")?;
                let negated = conditional.child(0)?.kind().ends_with("ndef");
                Some(self.is_defined(text(name, source).trim()) != negated)
            }
            "preproc_if" | "preproc_elif" => {
                self.evaluate(conditional.child_by_field_name("condition")?, source)
            }
            _ => None,
        }
    }

    fn evaluate(&self, expr: Node<'_>, source: &[u8]) -> Option<bool> {
        match expr.kind() {
            "number_literal" => {
                let digits = text(expr, source).trim_end_matches(['u', 'U', 'l', 'L']);
                digits.parse::<i64>().ok().map(|n| n != 0)
            }
            "preproc_defined" => {
                let mut cursor = expr.walk();
                let name = expr
                    .named_children(&mut cursor)
                    .find(|n| n.kind() == "identifier")?;
                Some(self.is_defined(text(name, source)))
            }
            // An identifier that is not a macro evaluates to 0.
            "identifier" => (!self.is_defined(text(expr, source))).then_some(false),
            "preproc_parenthesized_expression" => self.evaluate(expr.named_child(0)?, source),
            "preproc_unary_expression" => {
                let operator = expr.child_by_field_name("operator")?;
                if text(operator, source) != "!" {
                    return None;
                }
                self.evaluate(expr.child_by_field_name("argument")?, source)
                    .map(|value| !value)
            }
            "preproc_binary_expression" => {
                let operator = expr.child_by_field_name("operator")?;
                let left = self.evaluate(expr.child_by_field_name("left")?, source);
                let right = self.evaluate(expr.child_by_field_name("right")?, source);
                match text(operator, source) {
                    "&&" => match (left, right) {
                        (Some(false), _) | (_, Some(false)) => Some(false),
                        (Some(true), Some(true)) => Some(true),
                        _ => None,
                    },
                    "||" => match (left, right) {
                        (Some(true), _) | (_, Some(true)) => Some(true),
                        (Some(false), Some(false)) => Some(false),
                        _ => None,
                    },
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

fn text<'s>(node: Node<'_>, source: &'s [u8]) -> &'s str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}
