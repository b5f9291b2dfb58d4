//! # RWA Registry
//!
//! **Purpose**: Authenticated key-value registry of real-world-asset deals and
//! the addressable components (urn, oracle, conduits, jar, token, ...) each
//! deal is made of.
//!
//! ## Core Concepts
//!
//! - **Operators**: the only accounts allowed to mutate the registry
//! - **Catalog**: append-only, ordered set of supported component types
//! - **Deals**: identifiers moving through NONE → ACTIVE → FINALIZED, kept
//!   in a global enumeration
//! - **Components**: per-deal `name → (address, variant)` entries
//! - **Facts**: notifications emitted by every committed mutation, enough
//!   for an indexer to rebuild full state
//!
//! ## Execution Model
//!
//! Each entry point validates the complete request before writing, so a
//! failed call leaves no trace. [`SharedRegistry`] serializes concurrent
//! callers behind a single lock to keep that guarantee across threads.
//!
//! Schema changes happen by registering new component types or variant
//! numbers; the registry's structure itself never changes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Operator set and authorization checks
pub mod access;

/// Supported component catalog
pub mod catalog;

/// Command interface over mutating calls
pub mod command;

/// Registry configuration
pub mod config;

/// Deal and component records
pub mod deal;

/// Unified registry error types
pub mod errors;

/// Facts and the indexer view
pub mod facts;

/// Fixed-width identifier types
pub mod identifiers;

/// Range iteration helpers
pub mod pagination;

/// The registry state machine
pub mod registry;

/// Mutex-guarded shared handle
pub mod shared;

/// Serializable snapshots
pub mod snapshot;

/// Pluggable batch validation
pub mod validation;

pub use access::OperatorSet;
pub use catalog::ComponentCatalog;
pub use command::RegistryCommand;
pub use config::{AddressPolicy, RegistryConfig, DEFAULT_COMPONENTS, DEFAULT_VARIANT_BITS};
pub use deal::{Component, DealRecord, DealStatus, NamedComponent};
pub use errors::{RegistryError, RegistryResult};
pub use facts::{DealView, JournalEntry, RegistryFact, RegistryView};
pub use identifiers::{AccountId, Address, ComponentName, DealId, Variant};
pub use pagination::{Collection, Page};
pub use registry::RwaRegistry;
pub use shared::SharedRegistry;
pub use snapshot::{DealSnapshot, RegistrySnapshot};
pub use validation::{ComponentValidator, ConduitConsistency, VaultLookup};
