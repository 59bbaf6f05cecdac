//! Function name extraction from a C syntax tree.
//!
//! A declarator in tree-sitter nests from the outside in: `int *f(void)` is a
//! `pointer_declarator` wrapping the `function_declarator`, while
//! `int (*f)(void)` is a `function_declarator` whose declarator is the
//! pointer. A function's name is collected only when nothing but parentheses
//! sits between its `function_declarator` and the enclosing declaration, that
//! is when the declared thing returns a plain named type.
use tree_sitter::{Node, Parser, Tree};

use crate::error::ScanError;

/// Parse preprocessed C.
///
/// # Errors
///
/// Returns [`ScanError::Parse`] with the position of the first syntax error,
/// or [`ScanError::Grammar`] if the grammar cannot be loaded.
pub fn parse(source: &str) -> Result<Tree, ScanError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_c::LANGUAGE.into())?;
    let tree = parser
        .parse(source, None)
        .ok_or(ScanError::Parse { line: 1, column: 1 })?;

    let root = tree.root_node();
    if root.has_error() {
        let at = first_error(root).unwrap_or(root).start_position();
        return Err(ScanError::Parse {
            line: at.row + 1,
            column: at.column + 1,
        });
    }
    Ok(tree)
}

/// Names of plain-typed function declarators, in document order.
#[must_use]
pub fn collect_names(tree: &Tree, source: &str) -> Vec<String> {
    let mut names = Vec::new();
    visit(tree.root_node(), false, source, &mut names);
    names
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(Node::has_error)
        .find_map(first_error)
}

/// `indirect` is true when a pointer or array declarator encloses `node`
/// with only parentheses in between.
fn visit(node: Node<'_>, indirect: bool, source: &str, names: &mut Vec<String>) {
    let indirect = match node.kind() {
        "function_declarator" => {
            function(node, indirect, source, names);
            return;
        }
        "pointer_declarator" | "array_declarator" => true,
        "parenthesized_declarator" | "attributed_declarator" => indirect,
        _ => false,
    };

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, indirect, source, names);
    }
}

fn function(node: Node<'_>, indirect: bool, source: &str, names: &mut Vec<String>) {
    let Some(inner) = inner_declarator(node) else {
        return;
    };
    if contains_function(inner) {
        visit(inner, indirect, source, names);
    } else if !indirect
        && let Some(name) = innermost_name(inner)
        && let Ok(text) = name.utf8_text(source.as_bytes())
    {
        names.push(text.to_string());
    }
}

fn inner_declarator(node: Node<'_>) -> Option<Node<'_>> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| is_declarator(*child) || is_name(*child))
}

fn contains_function(node: Node<'_>) -> bool {
    let mut current = Some(node);
    while let Some(node) = current {
        if node.kind() == "function_declarator" {
            return true;
        }
        current = is_declarator(node)
            .then(|| inner_declarator(node))
            .flatten();
    }
    false
}

fn innermost_name(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node;
    loop {
        if is_name(current) {
            return Some(current);
        }
        if !is_declarator(current) {
            return None;
        }
        current = inner_declarator(current)?;
    }
}

fn is_declarator(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "pointer_declarator"
            | "array_declarator"
            | "parenthesized_declarator"
            | "attributed_declarator"
            | "function_declarator"
    )
}

fn is_name(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "identifier" | "type_identifier" | "field_identifier"
    )
}
