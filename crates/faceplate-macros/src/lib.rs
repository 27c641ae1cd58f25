//! `faceplate-macros` - Macro resolution engine for faceplate operator displays.
//!
//! Operator displays are written once and opened against many targets:
//! the same screen serves beamline 7 and beamline 8 because its PV
//! names, titles, and file paths hold macro references like
//! `$(S):flow` that resolve at render time. This crate is that
//! engine:
//!
//! - **Table**: [`Macros`], an ordered name/value table with pure
//!   merge-with-override for layering display and widget scopes
//! - **Providers**: the [`MacroProvider`] capability, plus
//!   [`CompositeProvider`] which falls back from the macro scope to a
//!   widget's own property values and synthesizes `$(DID)`/`$(DNAME)`
//! - **Resolver**: [`resolve`], recursive substitution of `$(name)` /
//!   `${name}` references with default values, escaping, and a
//!   recursion bound
//! - **Formats**: the flat `name=value,...` definition string
//!   ([`definition`]) and the persisted `<macros>` element ([`xml`])
//!
//! Resolution is lexical and infallible for ordinary input: unknown
//! macros without defaults pass through untouched so that a display
//! under construction still renders. Only an expansion cycle errors.
//!
//! # Example
//!
//! ```
//! use faceplate_macros::{resolve, Macros};
//!
//! let mut scope = Macros::new();
//! scope.add("S", "BL7");
//! assert_eq!(resolve(&scope, "$(S):flow").unwrap(), "BL7:flow");
//! assert_eq!(resolve(&scope, "$(MODE=live)").unwrap(), "live");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod definition;
pub mod error;
pub mod provider;
pub mod resolve;
pub mod table;
pub mod xml;

pub use definition::{format_definition, parse_definition};
pub use error::MacroError;
pub use provider::{
    CompositeProvider, DisplayHandle, FnProvider, MacroProvider, PropertyValue, DISPLAY_ID_MACRO,
    DISPLAY_NAME_MACRO,
};
pub use resolve::{contains_macros, resolve, resolve_all, MAX_RECURSION};
pub use table::Macros;
