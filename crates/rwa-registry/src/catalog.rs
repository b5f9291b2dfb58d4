//! Supported component catalog
//!
//! Append-only: names are never removed once registered, so a membership
//! check made at write time stays true for the lifetime of the registry.

use crate::errors::{RegistryError, RegistryResult};
use crate::identifiers::ComponentName;
use indexmap::IndexSet;

/// Ordered set of recognized component type names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentCatalog {
    names: IndexSet<ComponentName>,
}

impl ComponentCatalog {
    /// Build a catalog from names in registration order
    pub fn from_names(names: impl IntoIterator<Item = ComponentName>) -> RegistryResult<Self> {
        let mut catalog = Self::default();
        for name in names {
            catalog.register(name)?;
        }
        Ok(catalog)
    }

    /// Append a name; fails with `AlreadySupported` if present
    pub fn register(&mut self, name: ComponentName) -> RegistryResult<()> {
        if !self.names.insert(name) {
            return Err(RegistryError::AlreadySupported(name));
        }
        Ok(())
    }

    /// Whether `name` has been registered
    pub fn is_supported(&self, name: &ComponentName) -> bool {
        self.names.contains(name)
    }

    /// Fail with `UnsupportedComponent` unless `name` is registered
    pub fn ensure_supported(&self, name: &ComponentName) -> RegistryResult<()> {
        if self.is_supported(name) {
            Ok(())
        } else {
            Err(RegistryError::UnsupportedComponent(*name))
        }
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<ComponentName> {
        self.names.iter().copied().collect()
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
