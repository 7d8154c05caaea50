//! Attribute exclusion lookup.
//!
//! Before walking an instance, the engine asks an [`ExclusionLookup`] which of
//! the record's attributes to leave out. The lookup is keyed by the record's
//! type ([`ClassInfo`]) and queried once per instance element.

use std::collections::HashMap;

use crate::value::ClassInfo;

/// Resolves the attribute names to omit for a record type.
pub trait ExclusionLookup {
    /// Returns the (possibly empty) names of attributes that must not be
    /// serialized for instances of `class`.
    fn excluded_attributes(&self, class: &ClassInfo) -> Vec<String>;
}

/// Uses the exclusions each record type declares on its own [`Instance`]
/// description. This is the default lookup.
///
/// [`Instance`]: crate::value::Instance
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredExclusions;

impl ExclusionLookup for DeclaredExclusions {
    fn excluded_attributes(&self, class: &ClassInfo) -> Vec<String> {
        class.declared_exclusions().to_vec()
    }
}

/// A caller-populated table of exclusions keyed by `(module, class_name)`.
///
/// Declared exclusions are ignored; types missing from the table have none.
///
/// # Examples
///
/// ```
/// use objxml::exclusion::{ExclusionLookup, ExclusionTable};
/// use objxml::Instance;
///
/// let table = ExclusionTable::new().exclude("app::model", "User", ["password"]);
/// let user = Instance::new("User", "app::model");
/// assert_eq!(table.excluded_attributes(user.class()), ["password"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExclusionTable {
    entries: HashMap<(String, String), Vec<String>>,
}

impl ExclusionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds exclusions for the type `class_name` defined in `module`.
    #[must_use]
    pub fn exclude<I, S>(mut self, module: &str, class_name: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry((module.to_string(), class_name.to_string()))
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }
}

impl ExclusionLookup for ExclusionTable {
    fn excluded_attributes(&self, class: &ClassInfo) -> Vec<String> {
        self.entries
            .get(&(class.module().to_string(), class.name().to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
