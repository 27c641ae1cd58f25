//! Macro-or-property provider with synthesized display pseudo-macros.

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::warn;

use super::MacroProvider;

/// Reserved name of the display-unique-id pseudo-macro.
pub const DISPLAY_ID_MACRO: &str = "DID";

/// Reserved name of the display-name pseudo-macro.
pub const DISPLAY_NAME_MACRO: &str = "DNAME";

const FALLBACK_DISPLAY_ID: &str = "DID_unknown";
const FALLBACK_DISPLAY_NAME: &str = "unknown";

/// Handle to a top-level display instance.
///
/// The handle's identity (its allocation) is what makes `$(DID)`
/// unique: two loads of the same display file get distinct ids, and the
/// id stays fixed for the lifetime of the instance. Nothing promises
/// stability across reloads or processes.
#[derive(Debug)]
pub struct DisplayHandle {
    name: String,
}

impl DisplayHandle {
    /// Creates a handle for a display with the given human-readable name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { name: name.into() })
    }

    /// The display's human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Value of a widget property, as far as macro fallback is concerned.
///
/// An explicit tagged variant: the "single-element list renders as its
/// element" rule is a match arm, not a runtime type inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Free text.
    Text(String),
    /// Numeric property.
    Number(f64),
    /// Boolean property.
    Bool(bool),
    /// List property (e.g. trace or point lists).
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Renders the property the way it substitutes into a string.
    ///
    /// A one-element list renders as its sole element; longer lists use
    /// a bracketed comma-separated form.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::Number(number) => write!(f, "{number}"),
            PropertyValue::Bool(flag) => write!(f, "{flag}"),
            PropertyValue::List(elements) if elements.len() == 1 => write!(f, "{}", elements[0]),
            PropertyValue::List(elements) => {
                write!(f, "[")?;
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Provider backed by a primary macro source with widget-property
/// fallback and two synthesized environment macros.
///
/// Lookup order: `DID`/`DNAME` pseudo-macros, then the primary provider
/// (the scope's macro table or the parent scope), then the widget's own
/// properties, else absent. Losing the display handle is masked with a
/// warning and fixed fallback text; it never surfaces as an error, so
/// the resolver's error surface stays parse/recursion only.
pub struct CompositeProvider<P> {
    primary: P,
    properties: IndexMap<SmolStr, PropertyValue>,
    display: Weak<DisplayHandle>,
}

impl<P: MacroProvider> CompositeProvider<P> {
    /// Creates a provider over `primary` for widgets of `display`.
    pub fn new(primary: P, display: &Arc<DisplayHandle>) -> Self {
        Self {
            primary,
            properties: IndexMap::new(),
            display: Arc::downgrade(display),
        }
    }

    /// Registers a widget property available as macro fallback.
    pub fn set_property(&mut self, name: impl Into<SmolStr>, value: PropertyValue) {
        self.properties.insert(name.into(), value);
    }

    /// Builder-style variant of [`set_property`](Self::set_property).
    #[must_use]
    pub fn with_property(mut self, name: impl Into<SmolStr>, value: PropertyValue) -> Self {
        self.set_property(name, value);
        self
    }

    fn display_id(&self) -> String {
        match self.display.upgrade() {
            Some(handle) => format!("DID_{:X}", Arc::as_ptr(&handle) as usize),
            None => {
                warn!("display handle gone, using fallback for $({DISPLAY_ID_MACRO})");
                FALLBACK_DISPLAY_ID.to_string()
            }
        }
    }

    fn display_name(&self) -> String {
        match self.display.upgrade() {
            Some(handle) => handle.name().to_string(),
            None => {
                warn!("display handle gone, using fallback for $({DISPLAY_NAME_MACRO})");
                FALLBACK_DISPLAY_NAME.to_string()
            }
        }
    }
}

impl<P: MacroProvider> MacroProvider for CompositeProvider<P> {
    fn macro_value(&self, name: &str) -> Option<String> {
        if name == DISPLAY_ID_MACRO {
            return Some(self.display_id());
        }
        if name == DISPLAY_NAME_MACRO {
            return Some(self.display_name());
        }
        if let Some(value) = self.primary.macro_value(name) {
            return Some(value);
        }
        self.properties.get(name).map(PropertyValue::render)
    }
}
