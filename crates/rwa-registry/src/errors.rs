//! Unified error type for registry operations
//!
//! Every rejection is local, synchronous and final for the call that raised
//! it: the registry never retries and never commits partial state. Variants
//! carry the identifiers involved so callers can react without parsing text.

use crate::identifiers::{AccountId, Address, ComponentName, DealId, Variant};
use serde::{Deserialize, Serialize};

/// Error type for all registry operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RegistryError {
    /// Caller is not in the operator set
    #[error("Unauthorized: {0} is not an operator")]
    Unauthorized(AccountId),

    /// Component type is already present in the catalog
    #[error("Component type already supported: {0}")]
    AlreadySupported(ComponentName),

    /// Component type is not present in the catalog
    #[error("Unsupported component: {0}")]
    UnsupportedComponent(ComponentName),

    /// Deal identifier is already in use
    #[error("Deal already exists: {0}")]
    DealAlreadyExists(DealId),

    /// Deal identifier is unknown (status NONE)
    #[error("Deal does not exist: {0}")]
    DealDoesNotExist(DealId),

    /// Deal exists but is not ACTIVE
    #[error("Deal is not active: {0}")]
    DealNotActive(DealId),

    /// Deal still has components attached and cannot be removed
    #[error("Deal has dangling components: {0}")]
    DealHasDanglingComponents(DealId),

    /// Component is not attached to the deal
    #[error("Component {name} does not exist for deal {deal}")]
    ComponentDoesNotExist {
        /// Deal that was queried
        deal: DealId,
        /// Component name that was not found
        name: ComponentName,
    },

    /// Component address rejected by the address policy
    #[error("Invalid address for component {0}")]
    InvalidComponentAddress(ComponentName),

    /// Variant does not fit the configured storage width
    #[error("Invalid variant {variant} for component {name}")]
    InvalidVariant {
        /// Component the variant was supplied for
        name: ComponentName,
        /// Rejected variant value
        variant: Variant,
    },

    /// Parallel component arrays have different lengths
    #[error("Mismatching component params: {names} names, {addresses} addresses, {variants} variants")]
    MismatchingComponentParams {
        /// Number of names supplied
        names: usize,
        /// Number of addresses supplied
        addresses: usize,
        /// Number of variants supplied
        variants: usize,
    },

    /// Pagination bounds are inverted after clamping
    #[error("Invalid iteration: start {start} is past end {end}")]
    InvalidIteration {
        /// Requested start index
        start: usize,
        /// End index after clamping to the collection length
        end: usize,
    },

    /// The urn's reported output conduit differs from the supplied one
    #[error("Output conduit mismatch for deal {deal}: urn reports {reported}, supplied {supplied}")]
    ConduitMismatch {
        /// Deal being added
        deal: DealId,
        /// Conduit the vault reports for the urn
        reported: Address,
        /// Conduit supplied alongside the urn
        supplied: Address,
    },

    /// Textual identifier could not be encoded
    #[error("Invalid identifier: {message}")]
    InvalidIdentifier {
        /// What was wrong with the input
        message: String,
    },

    /// Configuration rejected
    #[error("Invalid configuration: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Snapshot failed structural validation
    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot {
        /// Error message describing the broken invariant
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },
}

impl RegistryError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid snapshot error
    pub fn invalid_snapshot(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Whether this error reports that a deal is unknown to the registry
    pub fn is_missing_deal(&self) -> bool {
        matches!(self, Self::DealDoesNotExist(_))
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RegistryError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

/// Standard Result type for registry operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
