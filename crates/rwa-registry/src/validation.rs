//! Pluggable validation for batch deal creation
//!
//! The registry itself only checks catalog membership, address policy and
//! variant width. Deployments that want cross-component consistency install
//! a [`ComponentValidator`]; it sees the complete candidate component list
//! before anything is committed and may reject the whole batch.

use crate::deal::NamedComponent;
use crate::errors::{RegistryError, RegistryResult};
use crate::identifiers::{Address, ComponentName, DealId};

/// Consistency check run on `add_deal_with_components`
pub trait ComponentValidator: Send + Sync {
    /// Accept or reject the components supplied for a new deal
    fn validate(&self, deal: &DealId, components: &[NamedComponent]) -> RegistryResult<()>;
}

/// Read access to the vault an urn component is attached to
pub trait VaultLookup: Send + Sync {
    /// Output conduit the urn at `urn` reports, if the urn is known
    fn output_conduit(&self, urn: &Address) -> Option<Address>;
}

/// Rejects deals whose `urn` reports a different output conduit than the
/// `outputConduit` component supplied with it
///
/// A missing `outputConduit` component is compared as the zero address. An
/// urn the vault does not know is not checked.
#[derive(Debug, Clone)]
pub struct ConduitConsistency<V> {
    vault: V,
    urn: ComponentName,
    output_conduit: ComponentName,
}

impl<V: VaultLookup> ConduitConsistency<V> {
    /// Create a check backed by `vault`
    pub fn new(vault: V) -> Self {
        Self {
            vault,
            urn: ComponentName::from_bytes(pad(b"urn")),
            output_conduit: ComponentName::from_bytes(pad(b"outputConduit")),
        }
    }
}

const fn pad<const L: usize>(text: &[u8; L]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < L {
        out[i] = text[i];
        i += 1;
    }
    out
}

impl<V: VaultLookup> ComponentValidator for ConduitConsistency<V> {
    fn validate(&self, deal: &DealId, components: &[NamedComponent]) -> RegistryResult<()> {
        // Later entries win, matching the order writes are applied in.
        let find = |name: &ComponentName| {
            components
                .iter()
                .rev()
                .find(|c| &c.name == name)
                .map(|c| c.address)
        };
        let Some(urn) = find(&self.urn) else {
            return Ok(());
        };
        let Some(reported) = self.vault.output_conduit(&urn) else {
            return Ok(());
        };
        let supplied = find(&self.output_conduit).unwrap_or(Address::ZERO);
        if reported != supplied {
            tracing::debug!(deal = %deal, %reported, %supplied, "output conduit mismatch");
            return Err(RegistryError::ConduitMismatch {
                deal: *deal,
                reported,
                supplied,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::Variant;
    use std::collections::HashMap;

    struct FixedVault(HashMap<Address, Address>);

    impl VaultLookup for FixedVault {
        fn output_conduit(&self, urn: &Address) -> Option<Address> {
            self.0.get(urn).copied()
        }
    }

    fn component(name: &str, byte: u8) -> NamedComponent {
        NamedComponent {
            name: ComponentName::new(name).unwrap(),
            address: Address::from_bytes([byte; 20]),
            variant: Variant(1),
        }
    }

    fn check() -> ConduitConsistency<FixedVault> {
        let urn = Address::from_bytes([1; 20]);
        let conduit = Address::from_bytes([2; 20]);
        ConduitConsistency::new(FixedVault(HashMap::from([(urn, conduit)])))
    }

    #[test]
    fn test_matching_conduit_passes() {
        let deal = DealId::new("RWA003-A").unwrap();
        let components = [component("urn", 1), component("outputConduit", 2)];
        assert!(check().validate(&deal, &components).is_ok());
    }

    #[test]
    fn test_mismatched_conduit_fails() {
        let deal = DealId::new("RWA003-A").unwrap();
        let components = [component("urn", 1), component("outputConduit", 3)];
        assert_eq!(
            check().validate(&deal, &components),
            Err(RegistryError::ConduitMismatch {
                deal,
                reported: Address::from_bytes([2; 20]),
                supplied: Address::from_bytes([3; 20]),
            })
        );
    }

    #[test]
    fn test_missing_conduit_compares_as_zero() {
        let deal = DealId::new("RWA003-A").unwrap();
        let components = [component("urn", 1)];
        assert!(check().validate(&deal, &components).is_err());
    }

    #[test]
    fn test_unknown_urn_is_not_checked() {
        let deal = DealId::new("RWA003-A").unwrap();
        let components = [component("urn", 9), component("outputConduit", 3)];
        assert!(check().validate(&deal, &components).is_ok());
    }
}
