//! Macro resolution: splice-and-rescan expansion of `$(..)` / `${..}`
//! references.
//!
//! Resolution is purely lexical. The resolver substitutes text and
//! never interprets it, so values are free to contain characters that
//! look meaningful elsewhere (`&&`, `||`, quotes, more `$`s). An
//! unresolvable reference without a default is left in place rather
//! than reported; only a genuine expansion cycle is an error.

use crate::error::MacroError;
use crate::provider::MacroProvider;
use crate::table::Macros;

/// Maximum number of splice-and-rescan cycles before resolution is
/// aborted as cyclic. Skipped (unresolvable) references do not count;
/// they are bounded by the input length, while splices are the only
/// genuinely unbounded step.
pub const MAX_RECURSION: usize = 50;

/// One well-formed, unescaped macro reference found in the input.
struct MacroRef<'src> {
    /// Byte offset of the `$`.
    start: usize,
    /// Byte offset one past the closing delimiter.
    end: usize,
    name: &'src str,
    /// Default value text, verbatim, when the reference carries one.
    default: Option<&'src str>,
}

/// Replaces every resolvable macro reference in `input`.
///
/// References are `$(name)`, `${name}`, `$(name=default)`, or
/// `${name=default}`. The provider is consulted first; an absent value
/// falls back to the default; with neither, the reference is left
/// untouched. Spliced-in text is rescanned from the start of the
/// string, so values may themselves contain references (including the
/// nested form `$(${INNER})`, where the inner reference matches first).
/// A reference preceded by an unescaped backslash is literal text and
/// is passed through, backslash included.
///
/// # Errors
///
/// [`MacroError::Recursive`] when expansion exceeds [`MAX_RECURSION`]
/// splices, e.g. a macro whose value references itself.
pub fn resolve(provider: &(impl MacroProvider + ?Sized), input: &str) -> Result<String, MacroError> {
    // Cheap short-circuit before any scanning.
    if !input.contains('$') {
        return Ok(input.to_string());
    }
    let mut text = input.to_string();
    let mut cursor = 0;
    let mut recursions = 0;
    loop {
        let Some(found) = find_reference(&text, cursor) else {
            return Ok(text);
        };
        let (start, end) = (found.start, found.end);
        let replacement = provider
            .macro_value(found.name)
            .or_else(|| found.default.map(ToOwned::to_owned));
        match replacement {
            Some(value) => {
                recursions += 1;
                if recursions > MAX_RECURSION {
                    return Err(MacroError::Recursive(input.to_string()));
                }
                text.replace_range(start..end, &value);
                cursor = 0;
            }
            // No value and no default: leave the reference as-is and
            // keep scanning behind it.
            None => cursor = end,
        }
    }
}

/// Returns true if `input` holds at least one unescaped, well-formed
/// macro reference. No substitution is attempted.
#[must_use]
pub fn contains_macros(input: &str) -> bool {
    input.contains('$') && find_reference(input, 0).is_some()
}

/// Resolves every value of a macro table against a provider, returning
/// a new table.
///
/// Display models use this to expand their own macro table against the
/// enclosing environment once, before publishing it to child scopes.
///
/// # Errors
///
/// [`MacroError::Recursive`] if any value exceeds the recursion bound.
pub fn resolve_all(
    provider: &(impl MacroProvider + ?Sized),
    macros: &Macros,
) -> Result<Macros, MacroError> {
    let mut resolved = Macros::new();
    for (name, value) in macros.iter() {
        resolved.add(name, resolve(provider, value)?);
    }
    Ok(resolved)
}

/// Finds the next reference at or after byte offset `from`.
///
/// Candidates that fail to parse (empty name, stray characters before
/// the closing delimiter, unterminated default) are not references;
/// scanning resumes one byte past their `$`, which is what lets an
/// inner reference inside `$(${INNER})` match first.
fn find_reference(input: &str, from: usize) -> Option<MacroRef<'_>> {
    let bytes = input.as_bytes();
    let mut pos = from;
    while let Some(offset) = input[pos..].find('$') {
        let dollar = pos + offset;
        pos = dollar + 1;
        if is_escaped(bytes, dollar) {
            continue;
        }
        let close = match bytes.get(dollar + 1) {
            Some(b'(') => b')',
            Some(b'{') => b'}',
            _ => continue,
        };
        let open = bytes[dollar + 1];
        let name_start = dollar + 2;
        let mut name_end = name_start;
        while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
            name_end += 1;
        }
        if name_end == name_start {
            continue;
        }
        let name = &input[name_start..name_end];

        // Plain reference: closing delimiter right after the name.
        if bytes.get(name_end) == Some(&close) {
            return Some(MacroRef {
                start: dollar,
                end: name_end + 1,
                name,
                default: None,
            });
        }

        // Reference with default: optional whitespace, '=', optional
        // whitespace, then verbatim text up to the matching delimiter.
        let mut probe = name_end;
        while bytes.get(probe).is_some_and(u8::is_ascii_whitespace) {
            probe += 1;
        }
        if bytes.get(probe) != Some(&b'=') {
            continue;
        }
        probe += 1;
        while bytes.get(probe).is_some_and(u8::is_ascii_whitespace) {
            probe += 1;
        }
        let default_start = probe;
        let mut depth = 1usize;
        let mut scan = probe;
        while scan < bytes.len() {
            if bytes[scan] == open {
                depth += 1;
            } else if bytes[scan] == close {
                depth -= 1;
                if depth == 0 {
                    return Some(MacroRef {
                        start: dollar,
                        end: scan + 1,
                        name,
                        default: Some(&input[default_start..scan]),
                    });
                }
            }
            scan += 1;
        }
        // Unterminated default: not a reference.
    }
    None
}

/// True when the `$` at `dollar` sits behind an odd run of backslashes.
fn is_escaped(bytes: &[u8], dollar: usize) -> bool {
    let mut backslashes = 0;
    while backslashes < dollar && bytes[dollar - 1 - backslashes] == b'\\' {
        backslashes += 1;
    }
    backslashes % 2 == 1
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> Macros {
        let mut macros = Macros::new();
        for (name, value) in pairs {
            macros.add(*name, *value);
        }
        macros
    }

    #[test]
    fn test_no_dollar_is_identity() {
        let macros = table(&[("S", "BL7")]);
        assert_eq!(resolve(&macros, "plain text").unwrap(), "plain text");
        assert_eq!(resolve(&macros, "").unwrap(), "");
    }

    #[test]
    fn test_both_syntaxes() {
        let macros = table(&[("S", "BL7")]);
        assert_eq!(resolve(&macros, "$(S)").unwrap(), "BL7");
        assert_eq!(resolve(&macros, "${S}").unwrap(), "BL7");
        assert_eq!(resolve(&macros, "a $(S) b ${S} c").unwrap(), "a BL7 b BL7 c");
    }

    #[test]
    fn test_default_used_when_absent() {
        let empty = Macros::new();
        assert_eq!(resolve(&empty, "$(NAME=fallback)").unwrap(), "fallback");
        assert_eq!(resolve(&empty, "${NAME = fallback}").unwrap(), "fallback");
        // Default text is verbatim: interior whitespace survives.
        assert_eq!(resolve(&empty, "$(X=a b )").unwrap(), "a b ");
    }

    #[test]
    fn test_default_ignored_when_defined() {
        let macros = table(&[("S", "BL7")]);
        assert_eq!(resolve(&macros, "$(S=other)").unwrap(), "BL7");
    }

    #[test]
    fn test_unresolved_left_untouched() {
        let empty = Macros::new();
        assert_eq!(resolve(&empty, "pv://$(S):flow").unwrap(), "pv://$(S):flow");
    }

    #[test]
    fn test_escaped_reference_is_literal() {
        let macros = table(&[("S", "BL7")]);
        assert_eq!(resolve(&macros, r"Escaped \$(S)").unwrap(), r"Escaped \$(S)");
        // Double backslash un-escapes the reference.
        assert_eq!(resolve(&macros, r"\\$(S)").unwrap(), r"\\BL7");
    }

    #[test]
    fn test_unterminated_is_literal() {
        let macros = table(&[("NOT_CLOSED", "x")]);
        assert_eq!(resolve(&macros, "${NOT_CLOSED").unwrap(), "${NOT_CLOSED");
        assert_eq!(resolve(&macros, "$(NOT_CLOSED=abc").unwrap(), "$(NOT_CLOSED=abc");
    }

    #[test]
    fn test_nested_inner_first() {
        let macros = table(&[("MACRO", "S"), ("S", "BL7")]);
        assert_eq!(resolve(&macros, "$(${MACRO})").unwrap(), "BL7");
    }

    #[test]
    fn test_value_containing_reference() {
        let macros = table(&[("PV", "$(S):temp"), ("S", "BL7")]);
        assert_eq!(resolve(&macros, "$(PV)").unwrap(), "BL7:temp");
    }

    #[test]
    fn test_default_may_nest() {
        let macros = table(&[("B", "beta")]);
        assert_eq!(resolve(&macros, "$(A=$(B))").unwrap(), "beta");
    }

    #[test]
    fn test_recursive_fails() {
        let macros = table(&[("S", "$(S)")]);
        let err = resolve(&macros, "Never ending $(S)").unwrap_err();
        assert!(err.to_string().to_lowercase().contains("recursive"));
        assert!(err.to_string().contains("Never ending $(S)"));
    }

    #[test]
    fn test_mutually_recursive_fails() {
        let macros = table(&[("A", "$(B)"), ("B", "$(A)")]);
        assert!(matches!(
            resolve(&macros, "$(A)"),
            Err(MacroError::Recursive(_))
        ));
    }

    #[test]
    fn test_substituted_text_not_interpreted() {
        let macros = table(&[("COND", "a && b || c")]);
        assert_eq!(resolve(&macros, "$(COND)").unwrap(), "a && b || c");
    }

    #[test]
    fn test_whitespace_between_name_and_close_is_literal() {
        let macros = table(&[("S", "BL7")]);
        assert_eq!(resolve(&macros, "$(S )").unwrap(), "$(S )");
    }

    #[test]
    fn test_contains_macros() {
        assert!(contains_macros("$(S)"));
        assert!(contains_macros("${S}"));
        assert!(contains_macros("text $(S=d) text"));
        assert!(!contains_macros("no references"));
        assert!(!contains_macros("no dollar at all"));
        assert!(!contains_macros(r"escaped \$(S)"));
        assert!(!contains_macros("${NOT_CLOSED"));
        assert!(!contains_macros("$()"));
    }

    #[test]
    fn test_resolve_all() {
        let environment = table(&[("S", "BL7")]);
        let display = table(&[("PV", "$(S):flow"), ("TITLE", "Beamline $(S)")]);
        let expanded = resolve_all(&environment, &display).unwrap();
        assert_eq!(expanded.get("PV"), Some("BL7:flow"));
        assert_eq!(expanded.get("TITLE"), Some("Beamline BL7"));
    }
}
