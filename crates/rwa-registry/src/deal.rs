//! Deal and component records

use crate::errors::{RegistryError, RegistryResult};
use crate::identifiers::{Address, ComponentName, DealId, Variant};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a deal identifier
///
/// `None` is never stored: an identifier without a record is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStatus {
    /// Never added, or removed
    #[default]
    None,
    /// Accepting component changes
    Active,
    /// Terminal; components are frozen
    Finalized,
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DealStatus::None => "NONE",
            DealStatus::Active => "ACTIVE",
            DealStatus::Finalized => "FINALIZED",
        };
        f.write_str(label)
    }
}

/// Address and variant stored for one component of a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    /// Contract or account the component points at
    pub address: Address,
    /// Implementation flavor of `address`
    pub variant: Variant,
}

impl Component {
    /// Create a component value
    pub fn new(address: Address, variant: impl Into<Variant>) -> Self {
        Self {
            address,
            variant: variant.into(),
        }
    }
}

/// A component together with its name, as returned by batch reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedComponent {
    /// Component type name
    pub name: ComponentName,
    /// Address the component points at
    pub address: Address,
    /// Implementation flavor of `address`
    pub variant: Variant,
}

/// Stored state of a deal whose status is not `None`
///
/// Components live in an index map so enumeration order matches attach
/// order. Detaching swaps the last component into the vacated slot, which
/// reorders survivors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealRecord {
    pub(crate) status: DealStatus,
    pub(crate) position: usize,
    pub(crate) components: IndexMap<ComponentName, Component>,
}

impl DealRecord {
    pub(crate) fn new(position: usize) -> Self {
        Self {
            status: DealStatus::Active,
            position,
            components: IndexMap::new(),
        }
    }

    /// Current lifecycle status
    pub fn status(&self) -> DealStatus {
        self.status
    }

    /// Position assigned when the deal was added
    pub fn position(&self) -> usize {
        self.position
    }

    /// Attached components in enumeration order
    pub fn components(&self) -> impl ExactSizeIterator<Item = (&ComponentName, &Component)> {
        self.components.iter()
    }

    /// Look up one component
    pub fn component(&self, deal: &DealId, name: &ComponentName) -> RegistryResult<Component> {
        self.components
            .get(name)
            .copied()
            .ok_or(RegistryError::ComponentDoesNotExist {
                deal: *deal,
                name: *name,
            })
    }

    /// Fail with `DealNotActive` unless the deal accepts changes
    pub(crate) fn ensure_active(&self, deal: &DealId) -> RegistryResult<()> {
        if self.status == DealStatus::Active {
            Ok(())
        } else {
            Err(RegistryError::DealNotActive(*deal))
        }
    }
}
