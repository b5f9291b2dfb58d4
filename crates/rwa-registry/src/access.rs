//! Operator set gating every mutating entry point

use crate::errors::{RegistryError, RegistryResult};
use crate::identifiers::AccountId;
use std::collections::BTreeSet;

/// Accounts currently allowed to mutate the registry
///
/// Revoking the last operator is permitted and leaves the registry
/// permanently read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorSet {
    operators: BTreeSet<AccountId>,
}

impl OperatorSet {
    /// Create a set with a single operator
    pub fn with_operator(account: AccountId) -> Self {
        let mut set = Self::default();
        set.operators.insert(account);
        set
    }

    /// Whether `account` is an operator
    pub fn contains(&self, account: &AccountId) -> bool {
        self.operators.contains(account)
    }

    /// Fail with `Unauthorized` unless `caller` is an operator
    pub fn ensure(&self, caller: &AccountId) -> RegistryResult<()> {
        if self.contains(caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, "rejected call from non-operator");
            Err(RegistryError::Unauthorized(*caller))
        }
    }

    /// Grant operator rights; idempotent
    pub fn rely(&mut self, account: AccountId) {
        self.operators.insert(account);
    }

    /// Revoke operator rights; idempotent
    pub fn deny(&mut self, account: &AccountId) {
        self.operators.remove(account);
    }

    /// Operators in address order
    pub fn iter(&self) -> impl Iterator<Item = &AccountId> {
        self.operators.iter()
    }

    /// Number of operators
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether no account can mutate the registry anymore
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl FromIterator<AccountId> for OperatorSet {
    fn from_iter<I: IntoIterator<Item = AccountId>>(iter: I) -> Self {
        Self {
            operators: iter.into_iter().collect(),
        }
    }
}
