//! Flat textual macro definitions: `name=value,name2="quoted, value"`.
//!
//! This is the format used wherever macros arrive as a single
//! configuration string — embedded-display widget settings, command
//! line arguments, preference entries.

use crate::error::MacroError;
use crate::table::Macros;

/// Parses a comma-separated `name=value` definition list into a table.
///
/// Values may be double-quoted to embed commas, `=`, or significant
/// whitespace; inside a quoted value `\"` is an escaped quote. Names
/// and unquoted values are trimmed; quoted values are taken verbatim
/// between the quotes. Blank items are skipped, so an empty input
/// yields an empty table.
///
/// # Errors
///
/// [`MacroError::MissingEquals`] for an item without `=`, and
/// [`MacroError::UnterminatedQuote`] when a quoted value never closes.
pub fn parse_definition(text: &str) -> Result<Macros, MacroError> {
    let mut macros = Macros::new();
    for item in split_items(text)? {
        let item_trimmed = item.trim();
        if item_trimmed.is_empty() {
            continue;
        }
        let Some(equals) = item.find('=') else {
            return Err(MacroError::MissingEquals(item_trimmed.to_string()));
        };
        let name = item[..equals].trim();
        let value = parse_value(item[equals + 1..].trim())?;
        macros.add(name, value);
    }
    Ok(macros)
}

/// Renders a table back into the flat definition format.
///
/// Values containing `,`, `"`, `=`, or leading/trailing whitespace are
/// quoted (with `"` escaped as `\"`) so the output re-parses to an
/// equal table.
#[must_use]
pub fn format_definition(macros: &Macros) -> String {
    let mut out = String::new();
    for (name, value) in macros.iter() {
        if !out.is_empty() {
            out.push(',');
        }
        out.push_str(name);
        out.push('=');
        if needs_quoting(value) {
            out.push('"');
            for ch in value.chars() {
                if ch == '"' {
                    out.push('\\');
                }
                out.push(ch);
            }
            out.push('"');
        } else {
            out.push_str(value);
        }
    }
    out
}

/// Splits at commas that are outside quoted spans.
fn split_items(text: &str) -> Result<Vec<&str>, MacroError> {
    let bytes = text.as_bytes();
    let mut items = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    let mut in_quotes = false;
    while pos < bytes.len() {
        match bytes[pos] {
            b'"' => in_quotes = !in_quotes,
            b'\\' if in_quotes && bytes.get(pos + 1) == Some(&b'"') => pos += 1,
            b',' if !in_quotes => {
                items.push(&text[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
        pos += 1;
    }
    if in_quotes {
        return Err(MacroError::UnterminatedQuote(text.to_string()));
    }
    items.push(&text[start..]);
    Ok(items)
}

/// Strips and unescapes a quoted value; passes unquoted values through.
fn parse_value(trimmed: &str) -> Result<String, MacroError> {
    if !trimmed.starts_with('"') {
        return Ok(trimmed.to_string());
    }
    let mut value = String::new();
    let mut chars = trimmed[1..].chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => return Ok(value),
            '\\' => match chars.next() {
                Some('"') => value.push('"'),
                Some(other) => {
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            },
            other => value.push(other),
        }
    }
    Err(MacroError::UnterminatedQuote(trimmed.to_string()))
}

fn needs_quoting(value: &str) -> bool {
    value.contains([',', '"', '=']) || value != value.trim()
}
