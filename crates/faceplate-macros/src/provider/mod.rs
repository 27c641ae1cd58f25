//! Macro value providers.
//!
//! A provider answers "what is the value of macro X?" and nothing
//! else. Absence is `None`, never an error, so scanning a string full
//! of unknown macros stays cheap and infallible. Providers compose:
//! a widget asks its [`CompositeProvider`], which layers pseudo-macros,
//! the scope's macro table, and the widget's own property values.

mod composite;

pub use composite::{
    CompositeProvider, DisplayHandle, PropertyValue, DISPLAY_ID_MACRO, DISPLAY_NAME_MACRO,
};

use crate::table::Macros;

/// Source of macro values, composable via fallback chains.
pub trait MacroProvider {
    /// Returns the value of macro `name`, or `None` when unknown.
    fn macro_value(&self, name: &str) -> Option<String>;
}

impl MacroProvider for Macros {
    fn macro_value(&self, name: &str) -> Option<String> {
        self.get(name).map(ToOwned::to_owned)
    }
}

impl<T: MacroProvider + ?Sized> MacroProvider for &T {
    fn macro_value(&self, name: &str) -> Option<String> {
        (**self).macro_value(name)
    }
}

/// Adapter turning a closure into a provider; handy for tests and for
/// bridging host lookups without a dedicated type.
pub struct FnProvider<F>(F);

impl<F> FnProvider<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Wraps `lookup` as a provider.
    pub fn new(lookup: F) -> Self {
        Self(lookup)
    }
}

impl<F> MacroProvider for FnProvider<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn macro_value(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}
