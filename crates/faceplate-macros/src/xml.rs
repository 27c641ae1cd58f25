//! Persisted `<macros>` element: `<name>value</name>` per macro.
//!
//! Display files embed macro tables as a `<macros>` element. The legacy
//! `include_parent_macros` child is accepted on read and ignored:
//! parent macros are unconditionally inherited nowadays, so the old
//! toggle is a compatibility no-op and is never written back.

use tracing::{debug, warn};

use crate::error::MacroError;
use crate::table::Macros;

const MACROS_ELEMENT: &str = "macros";
const LEGACY_INCLUDE_PARENT: &str = "include_parent_macros";

/// Parses a standalone `<macros>` document into a table.
///
/// # Errors
///
/// [`MacroError::Xml`] when the text is not well-formed XML or the root
/// element is not `<macros>`.
pub fn read_macros(xml: &str) -> Result<Macros, MacroError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|err| MacroError::Xml(err.to_string()))?;
    let root = document.root_element();
    if root.tag_name().name() != MACROS_ELEMENT {
        return Err(MacroError::Xml(format!(
            "expected <{MACROS_ELEMENT}> root, found <{}>",
            root.tag_name().name()
        )));
    }
    Ok(macros_from_element(root))
}

/// Collects macros from an already-located `<macros>` element inside a
/// larger document (e.g. a display or widget element).
#[must_use]
pub fn macros_from_element(element: roxmltree::Node<'_, '_>) -> Macros {
    let mut macros = Macros::new();
    for child in element.children().filter(roxmltree::Node::is_element) {
        let name = child.tag_name().name();
        if name == LEGACY_INCLUDE_PARENT {
            debug!("ignoring legacy <{LEGACY_INCLUDE_PARENT}> element");
            continue;
        }
        if !Macros::is_valid_name(name) {
            warn!("skipping macro with invalid name '{name}'");
            continue;
        }
        macros.add(name, text_content(child));
    }
    macros
}

/// Serializes a table as a `<macros>` element, entries in name order.
#[must_use]
pub fn write_macros(macros: &Macros) -> String {
    let mut out = String::from("<macros>");
    for (name, value) in macros.iter() {
        out.push('<');
        out.push_str(name);
        out.push('>');
        push_escaped(&mut out, value);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
    out.push_str("</macros>");
    out
}

/// Text content of an element, verbatim; macro values may be pure
/// whitespace (indentation macros), so nothing is trimmed.
fn text_content(node: roxmltree::Node<'_, '_>) -> String {
    node.children()
        .filter(roxmltree::Node::is_text)
        .filter_map(|child| child.text())
        .collect()
}

fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}
