//! Registry configuration
//!
//! Controls the schema revision a registry instance follows: which component
//! types are registered at construction, whether zero addresses are accepted,
//! and how wide the stored variant field is.

use crate::errors::{RegistryError, RegistryResult};
use crate::identifiers::ComponentName;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Component types registered at construction, in catalog order
pub const DEFAULT_COMPONENTS: [&str; 7] = [
    "urn",
    "liquidationOracle",
    "outputConduit",
    "inputConduit",
    "jar",
    "jarInputConduit",
    "token",
];

/// Default storage width of the variant field, in bits
pub const DEFAULT_VARIANT_BITS: u8 = 88;

/// How component addresses are checked on write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddressPolicy {
    /// The zero address is rejected with `InvalidComponentAddress`
    #[default]
    RequireNonZero,
    /// Any address is accepted
    Any,
}

/// Configuration for a registry instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Component types registered at construction, in order
    pub default_components: Vec<String>,
    /// Address check applied by component writes
    pub address_policy: AddressPolicy,
    /// Storage width of the variant field (1..=128)
    pub variant_bits: u8,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_components: DEFAULT_COMPONENTS.iter().map(|s| (*s).to_string()).collect(),
            address_policy: AddressPolicy::default(),
            variant_bits: DEFAULT_VARIANT_BITS,
        }
    }
}

impl RegistryConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(text: &str) -> RegistryResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file and validate it
    pub fn load(path: &Path) -> RegistryResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Validate the configuration
    pub fn validate(&self) -> RegistryResult<()> {
        if self.variant_bits == 0 || self.variant_bits > 128 {
            return Err(RegistryError::config(format!(
                "variant_bits must be between 1 and 128 (got {})",
                self.variant_bits
            )));
        }
        self.default_component_names().map(|_| ())
    }

    /// Default component names encoded as identifiers, duplicates rejected
    pub fn default_component_names(&self) -> RegistryResult<Vec<ComponentName>> {
        let mut seen = HashSet::new();
        self.default_components
            .iter()
            .map(|text| {
                let name = ComponentName::new(text)
                    .map_err(|e| RegistryError::config(format!("default component: {e}")))?;
                if !seen.insert(name) {
                    return Err(RegistryError::config(format!(
                        "default component '{text}' listed twice"
                    )));
                }
                Ok(name)
            })
            .collect()
    }
}
