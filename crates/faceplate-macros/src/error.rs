//! Macro engine errors.

use thiserror::Error;

/// Errors produced by macro resolution and definition parsing.
///
/// Unresolved macros without defaults are deliberately *not* an error:
/// the resolver leaves them in place so a partially-macroed display can
/// still render while it is being authored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroError {
    /// Resolution exceeded the recursion bound, e.g. `S` defined as `$(S)`.
    #[error("recursive macro in '{0}'")]
    Recursive(String),

    /// A definition item had no `=` separating name from value.
    #[error("missing '=' in macro definition '{0}'")]
    MissingEquals(String),

    /// A quoted definition value was never closed.
    #[error("unterminated quote in macro definition '{0}'")]
    UnterminatedQuote(String),

    /// Malformed `<macros>` XML document.
    #[error("invalid macros XML: {0}")]
    Xml(String),
}
