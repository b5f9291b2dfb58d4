//! The registry state machine
//!
//! Every mutating entry point takes the calling account, checks it against
//! the operator set, validates the whole request against current state, and
//! only then writes. A call that returns an error has changed nothing and
//! has appended nothing to the journal.
//!
//! Deals are stored in an index map keyed by identifier, which doubles as the
//! global enumeration. Removal swaps the last deal into the vacated slot; the
//! `position` recorded at creation is never renumbered, so after a removal
//! `pos_to_id(record.position())` may name a different deal.

use crate::access::OperatorSet;
use crate::catalog::ComponentCatalog;
use crate::config::{AddressPolicy, RegistryConfig};
use crate::deal::{Component, DealRecord, DealStatus, NamedComponent};
use crate::errors::{RegistryError, RegistryResult};
use crate::facts::{DealView, JournalEntry, RegistryFact, RegistryView};
use crate::identifiers::{AccountId, Address, ComponentName, DealId, Variant};
use crate::pagination::{page, Collection, Page};
use crate::validation::ComponentValidator;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Authenticated registry of deals and their components
pub struct RwaRegistry {
    pub(crate) config: RegistryConfig,
    pub(crate) operators: OperatorSet,
    pub(crate) catalog: ComponentCatalog,
    pub(crate) deals: IndexMap<DealId, DealRecord>,
    pub(crate) journal: Vec<JournalEntry>,
    pub(crate) next_sequence: u64,
    validator: Option<Arc<dyn ComponentValidator>>,
}

impl fmt::Debug for RwaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RwaRegistry")
            .field("config", &self.config)
            .field("operators", &self.operators)
            .field("catalog", &self.catalog)
            .field("deals", &self.deals)
            .field("next_sequence", &self.next_sequence)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl RwaRegistry {
    /// Create a registry whose only operator is `creator`
    ///
    /// The configured default component types are registered in order. The
    /// journal starts with the creator's `Authorized` fact followed by one
    /// `ComponentTypeRegistered` fact per default type.
    pub fn new(creator: AccountId, config: RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        let defaults = config.default_component_names()?;
        let mut registry = Self::from_parts(
            config,
            OperatorSet::with_operator(creator),
            ComponentCatalog::from_names(defaults.iter().copied())?,
            IndexMap::new(),
            0,
        );
        registry.record(creator, RegistryFact::Authorized { account: creator });
        for name in defaults {
            registry.record(creator, RegistryFact::ComponentTypeRegistered { name });
        }
        info!(
            creator = %creator,
            component_types = registry.catalog.len(),
            "registry created"
        );
        Ok(registry)
    }

    /// Create a registry with the default configuration
    pub fn with_defaults(creator: AccountId) -> RegistryResult<Self> {
        Self::new(creator, RegistryConfig::default())
    }

    pub(crate) fn from_parts(
        config: RegistryConfig,
        operators: OperatorSet,
        catalog: ComponentCatalog,
        deals: IndexMap<DealId, DealRecord>,
        next_sequence: u64,
    ) -> Self {
        Self {
            config,
            operators,
            catalog,
            deals,
            journal: Vec::new(),
            next_sequence,
            validator: None,
        }
    }

    /// Install a consistency check run by `add_deal_with_components`
    pub fn with_validator(mut self, validator: impl ComponentValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn record(&mut self, actor: AccountId, fact: RegistryFact) {
        self.journal.push(JournalEntry {
            sequence: self.next_sequence,
            actor,
            fact,
        });
        self.next_sequence += 1;
    }

    // ---- access control -------------------------------------------------

    /// Grant operator rights to `account`
    pub fn rely(&mut self, caller: &AccountId, account: AccountId) -> RegistryResult<()> {
        self.operators.ensure(caller)?;
        self.operators.rely(account);
        debug!(caller = %caller, account = %account, "operator granted");
        self.record(*caller, RegistryFact::Authorized { account });
        Ok(())
    }

    /// Revoke operator rights from `account`, including the caller's own
    pub fn deny(&mut self, caller: &AccountId, account: AccountId) -> RegistryResult<()> {
        self.operators.ensure(caller)?;
        self.operators.deny(&account);
        debug!(caller = %caller, account = %account, "operator revoked");
        self.record(*caller, RegistryFact::Revoked { account });
        Ok(())
    }

    /// Whether `account` may call mutating entry points
    pub fn is_authorized(&self, account: &AccountId) -> bool {
        self.operators.contains(account)
    }

    /// Current operators
    pub fn operators(&self) -> &OperatorSet {
        &self.operators
    }

    // ---- catalog ---------------------------------------------------------

    /// Append a component type to the catalog
    pub fn register_component_type(
        &mut self,
        caller: &AccountId,
        name: ComponentName,
    ) -> RegistryResult<()> {
        self.operators.ensure(caller)?;
        self.catalog.register(name)?;
        debug!(caller = %caller, name = %name, "component type registered");
        self.record(*caller, RegistryFact::ComponentTypeRegistered { name });
        Ok(())
    }

    /// Whether `name` is a supported component type
    pub fn is_supported(&self, name: &ComponentName) -> bool {
        self.catalog.is_supported(name)
    }

    /// Supported component types in registration order
    pub fn list_supported_types(&self) -> Vec<ComponentName> {
        self.catalog.names()
    }

    // ---- deals -----------------------------------------------------------

    fn ensure_new_deal(&self, id: &DealId) -> RegistryResult<()> {
        if self.deals.contains_key(id) {
            return Err(RegistryError::DealAlreadyExists(*id));
        }
        Ok(())
    }

    fn insert_deal(&mut self, caller: AccountId, id: DealId) {
        let position = self.deals.len();
        self.deals.insert(id, DealRecord::new(position));
        debug!(deal = %id, position, "deal added");
        self.record(caller, RegistryFact::DealAdded { deal: id, position });
    }

    /// Add a deal with no components
    pub fn add_deal(&mut self, caller: &AccountId, id: DealId) -> RegistryResult<()> {
        self.operators.ensure(caller)?;
        self.ensure_new_deal(&id)?;
        self.insert_deal(*caller, id);
        Ok(())
    }

    /// Add a deal and attach components from three parallel slices
    ///
    /// Either the deal and every component are committed, or nothing is.
    /// A name repeated in the batch is written twice; the last value wins.
    pub fn add_deal_with_components(
        &mut self,
        caller: &AccountId,
        id: DealId,
        names: &[ComponentName],
        addresses: &[Address],
        variants: &[Variant],
    ) -> RegistryResult<()> {
        self.operators.ensure(caller)?;
        self.ensure_new_deal(&id)?;
        if names.len() != addresses.len() || names.len() != variants.len() {
            return Err(RegistryError::MismatchingComponentParams {
                names: names.len(),
                addresses: addresses.len(),
                variants: variants.len(),
            });
        }

        let batch: Vec<NamedComponent> = names
            .iter()
            .zip(addresses)
            .zip(variants)
            .map(|((name, address), variant)| NamedComponent {
                name: *name,
                address: *address,
                variant: *variant,
            })
            .collect();
        for component in &batch {
            self.check_component(component.name, component.address, component.variant)?;
        }
        if let Some(validator) = &self.validator {
            validator.validate(&id, &batch)?;
        }

        self.insert_deal(*caller, id);
        for component in batch {
            self.write_component(*caller, id, component);
        }
        Ok(())
    }

    /// Move an ACTIVE deal to FINALIZED
    pub fn finalize(&mut self, caller: &AccountId, id: DealId) -> RegistryResult<()> {
        self.operators.ensure(caller)?;
        self.active_record_mut(&id)?.status = DealStatus::Finalized;
        debug!(deal = %id, "deal finalized");
        self.record(*caller, RegistryFact::DealFinalized { deal: id });
        Ok(())
    }

    /// Remove an ACTIVE deal that has no components attached
    pub fn remove(&mut self, caller: &AccountId, id: DealId) -> RegistryResult<()> {
        self.operators.ensure(caller)?;
        let record = self.active_record_mut(&id)?;
        if !record.components.is_empty() {
            return Err(RegistryError::DealHasDanglingComponents(id));
        }
        self.deals.swap_remove(&id);
        debug!(deal = %id, "deal removed");
        self.record(*caller, RegistryFact::DealRemoved { deal: id });
        Ok(())
    }

    /// Whether `id` is a known deal (status is not NONE)
    pub fn has(&self, id: &DealId) -> bool {
        self.deals.contains_key(id)
    }

    /// Raw status and position; NONE and zero for unknown deals
    pub fn status(&self, id: &DealId) -> (DealStatus, usize) {
        self.deals
            .get(id)
            .map_or((DealStatus::None, 0), |record| {
                (record.status, record.position)
            })
    }

    /// Stored record of a known deal
    pub fn deal(&self, id: &DealId) -> RegistryResult<&DealRecord> {
        self.deals.get(id).ok_or(RegistryError::DealDoesNotExist(*id))
    }

    fn active_record_mut(&mut self, id: &DealId) -> RegistryResult<&mut DealRecord> {
        let record = self
            .deals
            .get_mut(id)
            .ok_or(RegistryError::DealDoesNotExist(*id))?;
        record.ensure_active(id)?;
        Ok(record)
    }

    /// Component writes treat an unknown deal the same as a finalized one
    fn writable_record_mut(&mut self, id: &DealId) -> RegistryResult<&mut DealRecord> {
        let record = self
            .deals
            .get_mut(id)
            .ok_or(RegistryError::DealNotActive(*id))?;
        record.ensure_active(id)?;
        Ok(record)
    }

    /// Deal identifiers in enumeration order
    pub fn list(&self) -> Vec<DealId> {
        self.deals.keys().copied().collect()
    }

    /// Number of known deals
    pub fn count(&self) -> usize {
        self.deals.len()
    }

    /// Deal currently at enumeration index `pos`
    pub fn pos_to_id(&self, pos: usize) -> Option<DealId> {
        self.deals.get_index(pos).map(|(id, _)| *id)
    }

    // ---- components ------------------------------------------------------

    fn check_component(
        &self,
        name: ComponentName,
        address: Address,
        variant: Variant,
    ) -> RegistryResult<()> {
        self.catalog.ensure_supported(&name)?;
        if self.config.address_policy == AddressPolicy::RequireNonZero && address.is_zero() {
            return Err(RegistryError::InvalidComponentAddress(name));
        }
        if !variant.fits(self.config.variant_bits) {
            return Err(RegistryError::InvalidVariant { name, variant });
        }
        Ok(())
    }

    fn write_component(&mut self, caller: AccountId, id: DealId, component: NamedComponent) {
        let NamedComponent {
            name,
            address,
            variant,
        } = component;
        if let Some(record) = self.deals.get_mut(&id) {
            record
                .components
                .insert(name, Component::new(address, variant));
        }
        debug!(deal = %id, name = %name, address = %address, variant = %variant, "component set");
        self.record(
            caller,
            RegistryFact::ComponentSet {
                deal: id,
                name,
                address,
                variant,
            },
        );
    }

    /// Attach or update a component of an ACTIVE deal
    ///
    /// Fails with `DealNotActive` for deals that are unknown or finalized.
    pub fn set_component(
        &mut self,
        caller: &AccountId,
        id: DealId,
        name: ComponentName,
        address: Address,
        variant: Variant,
    ) -> RegistryResult<()> {
        self.operators.ensure(caller)?;
        self.writable_record_mut(&id)?;
        self.check_component(name, address, variant)?;
        self.write_component(
            *caller,
            id,
            NamedComponent {
                name,
                address,
                variant,
            },
        );
        Ok(())
    }

    /// Update a single component field of a deal; same rules as `set_component`
    pub fn file(
        &mut self,
        caller: &AccountId,
        id: DealId,
        name: ComponentName,
        address: Address,
        variant: Variant,
    ) -> RegistryResult<()> {
        self.set_component(caller, id, name, address, variant)
    }

    /// Detach a component from an ACTIVE deal; absent components are not an error
    pub fn remove_component(
        &mut self,
        caller: &AccountId,
        id: DealId,
        name: ComponentName,
    ) -> RegistryResult<()> {
        self.operators.ensure(caller)?;
        self.writable_record_mut(&id)?.components.swap_remove(&name);
        debug!(deal = %id, name = %name, "component removed");
        self.record(*caller, RegistryFact::ComponentRemoved { deal: id, name });
        Ok(())
    }

    /// Address and variant of one component
    pub fn get_component(&self, id: &DealId, name: &ComponentName) -> RegistryResult<Component> {
        self.deal(id)?.component(id, name)
    }

    /// Whether the deal exists and has `name` attached; never fails
    pub fn has_component(&self, id: &DealId, name: &ComponentName) -> bool {
        self.deals
            .get(id)
            .is_some_and(|record| record.components.contains_key(name))
    }

    /// All components of a deal in enumeration order
    pub fn list_components(&self, id: &DealId) -> RegistryResult<Vec<NamedComponent>> {
        Ok(self
            .deal(id)?
            .components()
            .map(|(name, component)| NamedComponent {
                name: *name,
                address: component.address,
                variant: component.variant,
            })
            .collect())
    }

    /// Component names of a deal in enumeration order
    pub fn list_component_names(&self, id: &DealId) -> RegistryResult<Vec<ComponentName>> {
        Ok(self.deal(id)?.components().map(|(name, _)| *name).collect())
    }

    /// Number of components attached to a deal
    pub fn count_components(&self, id: &DealId) -> RegistryResult<usize> {
        Ok(self.deal(id)?.components.len())
    }

    // ---- pagination ------------------------------------------------------

    /// Deal identifiers in `[start, min(end, count()))`
    pub fn iterate_deals(&self, start: usize, end: usize) -> RegistryResult<Vec<DealId>> {
        page(self.deals.keys().copied(), start, end)
    }

    /// Component names of a deal in `[start, min(end, count_components(id)))`
    pub fn iterate_components(
        &self,
        id: &DealId,
        start: usize,
        end: usize,
    ) -> RegistryResult<Vec<ComponentName>> {
        page(self.deal(id)?.components.keys().copied(), start, end)
    }

    /// Range over either collection
    pub fn iterate(&self, collection: Collection, start: usize, end: usize) -> RegistryResult<Page> {
        match collection {
            Collection::Deals => self.iterate_deals(start, end).map(Page::Deals),
            Collection::Components(id) => self
                .iterate_components(&id, start, end)
                .map(Page::Components),
        }
    }

    // ---- journal ---------------------------------------------------------

    /// Facts recorded since construction or the last `take_facts`
    pub fn facts(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Drain recorded facts; sequence numbers keep increasing afterwards
    pub fn take_facts(&mut self) -> Vec<JournalEntry> {
        std::mem::take(&mut self.journal)
    }

    /// Current state in indexer form, for comparison with a fact replay
    pub fn view(&self) -> RegistryView {
        RegistryView {
            operators: self.operators.iter().copied().collect(),
            catalog: self.catalog.names(),
            deals: self
                .deals
                .iter()
                .map(|(id, record)| {
                    (
                        *id,
                        DealView {
                            status: record.status,
                            position: record.position,
                            components: record.components.clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}
