//! Registry facts (notifications) and the indexer view derived from them
//!
//! Every committed mutation appends one or more facts to the registry
//! journal. Facts carry the identifiers and new values involved, so an
//! external indexer can fold them into the same state the registry holds
//! without ever reading registry storage. Rejected calls append nothing.

use crate::deal::{Component, DealStatus};
use crate::identifiers::{AccountId, Address, ComponentName, DealId, Variant};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Schema version for fact encoding
pub const REGISTRY_FACT_SCHEMA_VERSION: u16 = 1;

/// State change notifications emitted by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum RegistryFact {
    /// Account granted operator rights
    Authorized {
        /// Account that became an operator
        account: AccountId,
    },

    /// Account lost operator rights
    Revoked {
        /// Account that is no longer an operator
        account: AccountId,
    },

    /// Component type appended to the catalog
    ComponentTypeRegistered {
        /// Newly supported component name
        name: ComponentName,
    },

    /// Deal created in ACTIVE status
    DealAdded {
        /// New deal identifier
        deal: DealId,
        /// Position assigned in the deal enumeration
        position: usize,
    },

    /// Deal moved to FINALIZED
    DealFinalized {
        /// Finalized deal identifier
        deal: DealId,
    },

    /// Deal removed from the enumeration
    DealRemoved {
        /// Removed deal identifier
        deal: DealId,
    },

    /// Component attached or updated
    ComponentSet {
        /// Deal the component belongs to
        deal: DealId,
        /// Component name
        name: ComponentName,
        /// New address
        address: Address,
        /// New variant
        variant: Variant,
    },

    /// Component detached
    ComponentRemoved {
        /// Deal the component belonged to
        deal: DealId,
        /// Component name
        name: ComponentName,
    },
}

impl RegistryFact {
    /// Get the deal this fact concerns, if any
    pub fn deal(&self) -> Option<DealId> {
        match self {
            RegistryFact::DealAdded { deal, .. }
            | RegistryFact::DealFinalized { deal }
            | RegistryFact::DealRemoved { deal }
            | RegistryFact::ComponentSet { deal, .. }
            | RegistryFact::ComponentRemoved { deal, .. } => Some(*deal),
            RegistryFact::Authorized { .. }
            | RegistryFact::Revoked { .. }
            | RegistryFact::ComponentTypeRegistered { .. } => None,
        }
    }

    /// Get the fact type name for journal keying
    pub fn fact_type(&self) -> &'static str {
        match self {
            RegistryFact::Authorized { .. } => "authorized",
            RegistryFact::Revoked { .. } => "revoked",
            RegistryFact::ComponentTypeRegistered { .. } => "component_type_registered",
            RegistryFact::DealAdded { .. } => "deal_added",
            RegistryFact::DealFinalized { .. } => "deal_finalized",
            RegistryFact::DealRemoved { .. } => "deal_removed",
            RegistryFact::ComponentSet { .. } => "component_set",
            RegistryFact::ComponentRemoved { .. } => "component_removed",
        }
    }
}

/// A fact as recorded in the registry journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Monotonic sequence number, starting at zero for the first fact
    pub sequence: u64,
    /// Account whose call produced the fact
    pub actor: AccountId,
    /// The fact itself
    pub fact: RegistryFact,
}

/// Per-deal state as reconstructed by an indexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealView {
    /// Lifecycle status
    pub status: DealStatus,
    /// Position assigned at creation
    pub position: usize,
    /// Components in enumeration order
    pub components: IndexMap<ComponentName, Component>,
}

/// Registry state folded from facts alone
///
/// Deal and component ordering follows the same swap-removal rules as the
/// registry, so a full replay reproduces `list()` and
/// `list_component_names()` exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryView {
    /// Current operators
    pub operators: BTreeSet<AccountId>,
    /// Catalog in registration order
    pub catalog: Vec<ComponentName>,
    /// Deals in enumeration order
    pub deals: IndexMap<DealId, DealView>,
}

impl RegistryView {
    /// Fold a journal into a fresh view
    pub fn replay<'a>(entries: impl IntoIterator<Item = &'a JournalEntry>) -> Self {
        let mut view = Self::default();
        for entry in entries {
            view.apply(&entry.fact);
        }
        view
    }

    /// Apply one fact
    ///
    /// Facts are trusted: they only ever describe committed changes, so no
    /// precondition is re-checked here.
    pub fn apply(&mut self, fact: &RegistryFact) {
        match fact {
            RegistryFact::Authorized { account } => {
                self.operators.insert(*account);
            }
            RegistryFact::Revoked { account } => {
                self.operators.remove(account);
            }
            RegistryFact::ComponentTypeRegistered { name } => {
                self.catalog.push(*name);
            }
            RegistryFact::DealAdded { deal, position } => {
                self.deals.insert(
                    *deal,
                    DealView {
                        status: DealStatus::Active,
                        position: *position,
                        components: IndexMap::new(),
                    },
                );
            }
            RegistryFact::DealFinalized { deal } => {
                if let Some(view) = self.deals.get_mut(deal) {
                    view.status = DealStatus::Finalized;
                }
            }
            RegistryFact::DealRemoved { deal } => {
                self.deals.swap_remove(deal);
            }
            RegistryFact::ComponentSet {
                deal,
                name,
                address,
                variant,
            } => {
                if let Some(view) = self.deals.get_mut(deal) {
                    view.components
                        .insert(*name, Component::new(*address, *variant));
                }
            }
            RegistryFact::ComponentRemoved { deal, name } => {
                if let Some(view) = self.deals.get_mut(deal) {
                    view.components.swap_remove(name);
                }
            }
        }
    }

    /// Deal identifiers in enumeration order
    pub fn deal_ids(&self) -> Vec<DealId> {
        self.deals.keys().copied().collect()
    }

    /// Component names of a deal in enumeration order
    pub fn component_names(&self, deal: &DealId) -> Option<Vec<ComponentName>> {
        self.deals
            .get(deal)
            .map(|view| view.components.keys().copied().collect())
    }
}
