//! Argument definitions

use clap::{Parser, Subcommand};
use rwa_registry::{AccountId, Address, ComponentName, DealId, RegistryError, Variant};
use std::path::PathBuf;
use std::str::FromStr;

/// Top-level arguments
#[derive(Debug, Parser)]
#[command(name = "rwa-registry")]
#[command(about = "Inspect and update an RWA deal registry snapshot", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Registry snapshot file
    #[arg(short, long, global = true, default_value = "registry.json")]
    pub state: PathBuf,

    /// Registry config (TOML), used by `init`
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Registry operations
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new snapshot with a single operator
    Init {
        /// Initial operator
        #[arg(long)]
        admin: AccountId,

        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },

    /// Grant operator rights
    Rely {
        /// Calling operator
        #[arg(long = "as", value_name = "ACCOUNT")]
        caller: AccountId,
        /// Account to authorize
        account: AccountId,
    },

    /// Revoke operator rights
    Deny {
        /// Calling operator
        #[arg(long = "as", value_name = "ACCOUNT")]
        caller: AccountId,
        /// Account to revoke
        account: AccountId,
    },

    /// Add a component type to the catalog
    RegisterType {
        /// Calling operator
        #[arg(long = "as", value_name = "ACCOUNT")]
        caller: AccountId,
        /// Component type name
        name: ComponentName,
    },

    /// Add a deal, optionally with components
    AddDeal {
        /// Calling operator
        #[arg(long = "as", value_name = "ACCOUNT")]
        caller: AccountId,
        /// Deal identifier
        id: DealId,
        /// Component as `name=0xADDRESS:VARIANT`; repeatable
        #[arg(long = "component", value_name = "SPEC")]
        components: Vec<ComponentSpec>,
    },

    /// Finalize a deal
    Finalize {
        /// Calling operator
        #[arg(long = "as", value_name = "ACCOUNT")]
        caller: AccountId,
        /// Deal identifier
        id: DealId,
    },

    /// Remove a deal without components
    Remove {
        /// Calling operator
        #[arg(long = "as", value_name = "ACCOUNT")]
        caller: AccountId,
        /// Deal identifier
        id: DealId,
    },

    /// Attach or update a component
    SetComponent {
        /// Calling operator
        #[arg(long = "as", value_name = "ACCOUNT")]
        caller: AccountId,
        /// Deal identifier
        id: DealId,
        /// Component type
        name: ComponentName,
        /// Component address
        address: Address,
        /// Component variant
        variant: Variant,
    },

    /// Detach a component
    RemoveComponent {
        /// Calling operator
        #[arg(long = "as", value_name = "ACCOUNT")]
        caller: AccountId,
        /// Deal identifier
        id: DealId,
        /// Component type
        name: ComponentName,
    },

    /// List deal identifiers
    List {
        /// First index
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// One past the last index; defaults to the end
        #[arg(long)]
        end: Option<usize>,
    },

    /// Show one deal and its components
    Show {
        /// Deal identifier
        id: DealId,
    },

    /// List supported component types
    Types,

    /// Print the snapshot digest
    Digest,
}

/// A component given on the command line as `name=0xADDRESS:VARIANT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpec {
    /// Component type
    pub name: ComponentName,
    /// Component address
    pub address: Address,
    /// Component variant
    pub variant: Variant,
}

impl FromStr for ComponentSpec {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            RegistryError::invalid_identifier(format!(
                "component '{s}' must look like name=0xADDRESS:VARIANT"
            ))
        };
        let (name, rest) = s.split_once('=').ok_or_else(invalid)?;
        let (address, variant) = rest.rsplit_once(':').ok_or_else(invalid)?;
        Ok(Self {
            name: name.parse()?,
            address: address.parse()?,
            variant: variant.parse()?,
        })
    }
}
