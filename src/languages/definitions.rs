//! Decides which C-family syntax nodes name a definition.
//!
//! Classification starts from a name node (identifier, type name, destructor or
//! operator name) and climbs to the construct owning it. The owner decides both
//! the cursor kind and the extent reported for the definition.

use tree_sitter::Node;

use crate::indexer::cursor::CursorKind;

#[derive(Debug, Clone, Copy)]
pub struct Definition<'t> {
    pub kind: CursorKind,
    pub extent: Node<'t>,
}

const NAME_KINDS: &[&str] = &[
    "identifier",
    "field_identifier",
    "type_identifier",
    "namespace_identifier",
    "destructor_name",
    "operator_name",
];

fn is_field(parent: Node<'_>, field: &str, child: Node<'_>) -> bool {
    let mut cursor = parent.walk();
    let found = parent
        .children_by_field_name(field, &mut cursor)
        .any(|c| c.id() == child.id());
    found
}

fn has_storage_class(decl: Node<'_>, keyword: &str) -> bool {
    let mut cursor = decl.walk();
    let found = decl.children(&mut cursor).any(|child| {
        child.kind() == "storage_class_specifier"
            && child.child(0).map(|k| k.kind()) == Some(keyword)
    });
    found
}

/// True when `node` sits inside a function body.
fn is_local(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        match n.kind() {
            "compound_statement" => return true,
            "translation_unit" => return false,
            _ => current = n.parent(),
        }
    }
    false
}

fn is_member(node: Node<'_>) -> bool {
    let mut current = node.parent();
    while let Some(n) = current {
        match n.kind() {
            "field_declaration_list" => return true,
            "template_declaration" => current = n.parent(),
            _ => return false,
        }
    }
    false
}

/// Classifies `node` as the name of a definition, if it is one.
pub fn classify(node: Node<'_>) -> Option<Definition<'_>> {
    if !NAME_KINDS.contains(&node.kind()) {
        return None;
    }
    let parent = node.parent()?;

    match parent.kind() {
        "struct_specifier" | "class_specifier" | "union_specifier" | "enum_specifier" => {
            record_definition(node, parent)
        }
        "enumerator" if is_field(parent, "name", node) => Some(Definition {
            kind: CursorKind::EnumConstantDecl,
            extent: parent,
        }),
        "namespace_definition" if is_field(parent, "name", node) => Some(Definition {
            kind: CursorKind::Namespace,
            extent: parent,
        }),
        "nested_namespace_specifier" => {
            let mut owner = parent;
            while owner.kind() == "nested_namespace_specifier" {
                owner = owner.parent()?;
            }
            (owner.kind() == "namespace_definition").then_some(Definition {
                kind: CursorKind::Namespace,
                extent: owner,
            })
        }
        "preproc_def" | "preproc_function_def" if is_field(parent, "name", node) => {
            Some(Definition {
                kind: CursorKind::MacroDefinition,
                extent: parent,
            })
        }
        "alias_declaration" if is_field(parent, "name", node) => Some(Definition {
            kind: CursorKind::TypeAliasDecl,
            extent: parent,
        }),
        // `template <> struct Traits<int> { ... }` names the record through a template type.
        "template_type" if is_field(parent, "name", node) => {
            let specifier = parent.parent()?;
            match specifier.kind() {
                "struct_specifier" | "class_specifier" | "union_specifier" => {
                    record_definition(parent, specifier)
                }
                _ => None,
            }
        }
        _ => declarator_definition(node),
    }
}

fn record_definition<'t>(name: Node<'t>, specifier: Node<'t>) -> Option<Definition<'t>> {
    if !is_field(specifier, "name", name) || specifier.child_by_field_name("body").is_none() {
        return None;
    }
    let kind = match specifier.kind() {
        "struct_specifier" => CursorKind::StructDecl,
        "class_specifier" => CursorKind::ClassDecl,
        "union_specifier" => CursorKind::UnionDecl,
        _ => CursorKind::EnumDecl,
    };
    Some(Definition {
        kind,
        extent: specifier,
    })
}

fn declarator_definition(name: Node<'_>) -> Option<Definition<'_>> {
    let mut current = name;
    let mut parent = current.parent()?;

    while matches!(parent.kind(), "qualified_identifier" | "template_function")
        && is_field(parent, "name", current)
    {
        current = parent;
        parent = parent.parent()?;
    }
    let qualified = current.id() != name.id();

    // `(*fp)(int)` declares a pointer, so the function declarator is only a wrapper.
    let mut through_parens = false;
    loop {
        let wraps = match parent.kind() {
            "pointer_declarator" | "array_declarator" => is_field(parent, "declarator", current),
            "reference_declarator" | "attributed_declarator" => true,
            "parenthesized_declarator" => {
                through_parens = true;
                true
            }
            "function_declarator" if through_parens => is_field(parent, "declarator", current),
            _ => false,
        };
        if !wraps {
            break;
        }
        current = parent;
        parent = parent.parent()?;
    }

    if !is_field(parent, "declarator", current) {
        return None;
    }
    match parent.kind() {
        "function_declarator" => function_definition(parent, qualified),
        "init_declarator" => {
            let decl = parent.parent()?;
            if decl.kind() != "declaration" {
                return None;
            }
            variable_definition(decl, true)
        }
        "declaration" => variable_definition(parent, false),
        "field_declaration" => (!has_storage_class(parent, "static")).then_some(Definition {
            kind: CursorKind::FieldDecl,
            extent: parent,
        }),
        "type_definition" => Some(Definition {
            kind: CursorKind::TypedefDecl,
            extent: parent,
        }),
        _ => None,
    }
}

fn function_definition(declarator: Node<'_>, qualified: bool) -> Option<Definition<'_>> {
    let mut current = declarator;
    let mut parent = current.parent()?;
    // `int (*getfn(void))(int)`: the outer declarators describe the returned pointer.
    loop {
        let wraps = match parent.kind() {
            "reference_declarator" | "attributed_declarator" | "parenthesized_declarator" => true,
            "pointer_declarator" | "function_declarator" => is_field(parent, "declarator", current),
            _ => false,
        };
        if !wraps {
            break;
        }
        current = parent;
        parent = parent.parent()?;
    }

    if parent.kind() != "function_definition" || !is_field(parent, "declarator", current) {
        return None;
    }
    let kind = if qualified || is_member(parent) {
        CursorKind::CxxMethod
    } else {
        CursorKind::FunctionDecl
    };
    Some(Definition {
        kind,
        extent: parent,
    })
}

/// `extern "C" int x;` without braces declares `x` extern.
fn has_linkage_extern(decl: Node<'_>) -> bool {
    decl.parent()
        .is_some_and(|p| p.kind() == "linkage_specification" && is_field(p, "body", decl))
}

fn variable_definition(decl: Node<'_>, initialized: bool) -> Option<Definition<'_>> {
    let is_extern = has_storage_class(decl, "extern") || has_linkage_extern(decl);
    if is_local(decl) || (!initialized && is_extern) {
        return None;
    }
    Some(Definition {
        kind: CursorKind::VarDecl,
        extent: decl,
    })
}

/// Human-readable name of a definition: the spelling, plus the parameter
/// types for functions (`add(int, int)`).
pub fn display_name(name: Node<'_>, kind: CursorKind, source: &[u8]) -> String {
    let spelling = node_text(name, source);
    if !matches!(kind, CursorKind::FunctionDecl | CursorKind::CxxMethod) {
        return spelling;
    }

    let mut current = name.parent();
    while let Some(node) = current {
        if node.kind() == "function_declarator" {
            break;
        }
        current = node.parent();
    }
    let Some(parameters) = current.and_then(|d| d.child_by_field_name("parameters")) else {
        return spelling;
    };

    let mut cursor = parameters.walk();
    let types: Vec<String> = parameters
        .named_children(&mut cursor)
        .filter(|p| p.kind() != "comment")
        .map(|p| parameter_type(p, source))
        .collect();
    format!("{}({})", spelling, types.join(", "))
}

/// Parameter text without its name or default value.
fn parameter_type(parameter: Node<'_>, source: &[u8]) -> String {
    let end = parameter
        .child_by_field_name("default_value")
        .and_then(|value| value.prev_sibling())
        .map_or(parameter.end_byte(), |eq| eq.start_byte());

    let mut name = parameter.child_by_field_name("declarator");
    while let Some(node) = name {
        if NAME_KINDS.contains(&node.kind()) {
            break;
        }
        // Reference declarators carry their inner declarator without a field name.
        name = node
            .child_by_field_name("declarator")
            .or_else(|| match node.kind() {
                "reference_declarator" => {
                    let mut cursor = node.walk();
                    let inner = node.named_children(&mut cursor).last();
                    inner
                }
                _ => None,
            });
    }

    let mut text = Vec::with_capacity(end - parameter.start_byte());
    match name {
        Some(name) if name.end_byte() <= end => {
            text.extend_from_slice(&source[parameter.start_byte()..name.start_byte()]);
            text.extend_from_slice(&source[name.end_byte()..end]);
        }
        _ => text.extend_from_slice(&source[parameter.start_byte()..end]),
    }
    String::from_utf8_lossy(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn node_text(node: Node<'_>, source: &[u8]) -> String {
    String::from_utf8_lossy(&source[node.byte_range()]).into_owned()
}
