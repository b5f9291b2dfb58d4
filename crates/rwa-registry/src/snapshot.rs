//! Serializable registry snapshots
//!
//! A snapshot captures everything needed to rebuild a registry: config,
//! operators, catalog order, deal enumeration order and per-deal components.
//! The journal is not included; facts are meant to be consumed as they are
//! produced. Restoring re-checks the structural invariants so a hand-edited
//! or truncated file cannot produce a registry that violates them.

use crate::access::OperatorSet;
use crate::catalog::ComponentCatalog;
use crate::config::{AddressPolicy, RegistryConfig};
use crate::deal::{Component, DealRecord, DealStatus, NamedComponent};
use crate::errors::{RegistryError, RegistryResult};
use crate::facts::REGISTRY_FACT_SCHEMA_VERSION;
use crate::identifiers::{AccountId, ComponentName, DealId};
use crate::registry::RwaRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One deal as stored in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealSnapshot {
    /// Deal identifier
    pub id: DealId,
    /// Lifecycle status; never NONE
    pub status: DealStatus,
    /// Position assigned at creation
    pub position: usize,
    /// Components in enumeration order
    pub components: Vec<NamedComponent>,
}

/// Complete registry state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Fact schema the snapshot was written with
    pub schema_version: u16,
    /// Registry configuration
    pub config: RegistryConfig,
    /// Operators in address order
    pub operators: Vec<AccountId>,
    /// Catalog in registration order
    pub catalog: Vec<ComponentName>,
    /// Deals in enumeration order
    pub deals: Vec<DealSnapshot>,
    /// Sequence number the next fact will carry
    pub next_sequence: u64,
}

impl RegistrySnapshot {
    /// Encode as pretty-printed JSON
    pub fn to_json(&self) -> RegistryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON; call [`RwaRegistry::restore`] to validate
    pub fn from_json(text: &str) -> RegistryResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// BLAKE3 digest of the canonical (compact JSON) encoding
    pub fn digest(&self) -> RegistryResult<[u8; 32]> {
        let bytes = serde_json::to_vec(self)?;
        Ok(*blake3::hash(&bytes).as_bytes())
    }
}

impl RwaRegistry {
    /// Capture the current state
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            schema_version: REGISTRY_FACT_SCHEMA_VERSION,
            config: self.config.clone(),
            operators: self.operators.iter().copied().collect(),
            catalog: self.catalog.names(),
            deals: self
                .deals
                .iter()
                .map(|(id, record)| DealSnapshot {
                    id: *id,
                    status: record.status,
                    position: record.position,
                    components: record
                        .components
                        .iter()
                        .map(|(name, component)| NamedComponent {
                            name: *name,
                            address: component.address,
                            variant: component.variant,
                        })
                        .collect(),
                })
                .collect(),
            next_sequence: self.next_sequence,
        }
    }

    /// Rebuild a registry from a snapshot
    ///
    /// No validator is installed on the result and the journal starts empty;
    /// new facts continue from the snapshot's sequence number.
    pub fn restore(snapshot: RegistrySnapshot) -> RegistryResult<Self> {
        if snapshot.schema_version != REGISTRY_FACT_SCHEMA_VERSION {
            return Err(RegistryError::invalid_snapshot(format!(
                "schema version {} is not supported (expected {REGISTRY_FACT_SCHEMA_VERSION})",
                snapshot.schema_version
            )));
        }
        snapshot.config.validate()?;

        let catalog = ComponentCatalog::from_names(snapshot.catalog.iter().copied())
            .map_err(|e| RegistryError::invalid_snapshot(e.to_string()))?;
        let operators: OperatorSet = snapshot.operators.iter().copied().collect();

        let mut deals = IndexMap::with_capacity(snapshot.deals.len());
        for deal in &snapshot.deals {
            let record = restore_deal(&snapshot.config, &catalog, deal)?;
            if deals.insert(deal.id, record).is_some() {
                return Err(RegistryError::invalid_snapshot(format!(
                    "deal {} listed twice",
                    deal.id
                )));
            }
        }

        tracing::info!(
            deals = deals.len(),
            operators = operators.len(),
            next_sequence = snapshot.next_sequence,
            "registry restored from snapshot"
        );
        Ok(Self::from_parts(
            snapshot.config,
            operators,
            catalog,
            deals,
            snapshot.next_sequence,
        ))
    }
}

fn restore_deal(
    config: &RegistryConfig,
    catalog: &ComponentCatalog,
    deal: &DealSnapshot,
) -> RegistryResult<DealRecord> {
    if deal.status == DealStatus::None {
        return Err(RegistryError::invalid_snapshot(format!(
            "deal {} has status NONE",
            deal.id
        )));
    }
    let mut record = DealRecord::new(deal.position);
    record.status = deal.status;
    for component in &deal.components {
        if !catalog.is_supported(&component.name) {
            return Err(RegistryError::invalid_snapshot(format!(
                "deal {} uses unsupported component {}",
                deal.id, component.name
            )));
        }
        if config.address_policy == AddressPolicy::RequireNonZero && component.address.is_zero() {
            return Err(RegistryError::invalid_snapshot(format!(
                "deal {} component {} has the zero address",
                deal.id, component.name
            )));
        }
        if !component.variant.fits(config.variant_bits) {
            return Err(RegistryError::invalid_snapshot(format!(
                "deal {} component {} variant {} exceeds {} bits",
                deal.id, component.name, component.variant, config.variant_bits
            )));
        }
        let previous = record.components.insert(
            component.name,
            Component::new(component.address, component.variant),
        );
        if previous.is_some() {
            return Err(RegistryError::invalid_snapshot(format!(
                "deal {} lists component {} twice",
                deal.id, component.name
            )));
        }
    }
    Ok(record)
}
