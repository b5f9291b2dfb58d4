//! Command interface over the mutating entry points
//!
//! A [`RegistryCommand`] names one mutating call and its arguments. Commands
//! can be queued, logged, or sent to a [`crate::SharedRegistry`] and applied
//! in submission order with [`RwaRegistry::execute`].

use crate::errors::RegistryResult;
use crate::facts::JournalEntry;
use crate::identifiers::{AccountId, Address, ComponentName, DealId, Variant};
use crate::registry::RwaRegistry;
use serde::{Deserialize, Serialize};

/// A mutating registry call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryCommand {
    /// Grant operator rights
    Rely {
        /// Account to authorize
        account: AccountId,
    },
    /// Revoke operator rights
    Deny {
        /// Account to revoke
        account: AccountId,
    },
    /// Append a component type to the catalog
    RegisterComponentType {
        /// New component type
        name: ComponentName,
    },
    /// Add a deal, optionally with components given as parallel lists
    AddDeal {
        /// New deal identifier
        deal: DealId,
        /// Component names
        #[serde(default)]
        names: Vec<ComponentName>,
        /// Component addresses, one per name
        #[serde(default)]
        addresses: Vec<Address>,
        /// Component variants, one per name
        #[serde(default)]
        variants: Vec<Variant>,
    },
    /// Finalize a deal
    Finalize {
        /// Deal to finalize
        deal: DealId,
    },
    /// Remove a deal without components
    Remove {
        /// Deal to remove
        deal: DealId,
    },
    /// Attach or update a component
    SetComponent {
        /// Target deal
        deal: DealId,
        /// Component type
        name: ComponentName,
        /// Component address
        address: Address,
        /// Component variant
        variant: Variant,
    },
    /// Detach a component
    RemoveComponent {
        /// Target deal
        deal: DealId,
        /// Component type
        name: ComponentName,
    },
}

impl RegistryCommand {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            RegistryCommand::Rely { .. } => "rely",
            RegistryCommand::Deny { .. } => "deny",
            RegistryCommand::RegisterComponentType { .. } => "register_component_type",
            RegistryCommand::AddDeal { .. } => "add_deal",
            RegistryCommand::Finalize { .. } => "finalize",
            RegistryCommand::Remove { .. } => "remove",
            RegistryCommand::SetComponent { .. } => "set_component",
            RegistryCommand::RemoveComponent { .. } => "remove_component",
        }
    }
}

impl RwaRegistry {
    /// Apply one command as `caller` and return the facts it committed
    ///
    /// An `AddDeal` with no components goes through `add_deal`, so the
    /// parallel-list length check only applies when components are given.
    pub fn execute(
        &mut self,
        caller: &AccountId,
        command: RegistryCommand,
    ) -> RegistryResult<Vec<JournalEntry>> {
        let mark = self.journal.len();
        tracing::trace!(caller = %caller, command = command.name(), "executing command");
        match command {
            RegistryCommand::Rely { account } => self.rely(caller, account)?,
            RegistryCommand::Deny { account } => self.deny(caller, account)?,
            RegistryCommand::RegisterComponentType { name } => {
                self.register_component_type(caller, name)?;
            }
            RegistryCommand::AddDeal {
                deal,
                names,
                addresses,
                variants,
            } => {
                if names.is_empty() && addresses.is_empty() && variants.is_empty() {
                    self.add_deal(caller, deal)?;
                } else {
                    self.add_deal_with_components(caller, deal, &names, &addresses, &variants)?;
                }
            }
            RegistryCommand::Finalize { deal } => self.finalize(caller, deal)?,
            RegistryCommand::Remove { deal } => self.remove(caller, deal)?,
            RegistryCommand::SetComponent {
                deal,
                name,
                address,
                variant,
            } => self.set_component(caller, deal, name, address, variant)?,
            RegistryCommand::RemoveComponent { deal, name } => {
                self.remove_component(caller, deal, name)?;
            }
        }
        Ok(self.journal[mark..].to_vec())
    }
}
