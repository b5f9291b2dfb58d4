//! Fixed-width identifier types used across the registry
//!
//! Deal identifiers and component names are 32-byte opaque values. They are
//! usually written as short ASCII codes (`RWA009-A`, `outputConduit`), which
//! are stored left-aligned and zero padded. Values that are not printable
//! text round-trip through their `0x`-prefixed hex form instead.
//!
//! Accounts and component addresses are 20-byte chain references and always
//! render as `0x`-prefixed lowercase hex.

use crate::errors::{RegistryError, RegistryResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Width in bytes of deal identifiers and component names
pub const NAME_LEN: usize = 32;

/// Width in bytes of account and component addresses
pub const ADDRESS_LEN: usize = 20;

fn encode_text(text: &str) -> RegistryResult<[u8; NAME_LEN]> {
    if text.is_empty() {
        return Err(RegistryError::invalid_identifier("identifier is empty"));
    }
    let bytes = text.as_bytes();
    if bytes.len() > NAME_LEN {
        return Err(RegistryError::invalid_identifier(format!(
            "'{text}' is {} bytes, at most {NAME_LEN} allowed",
            bytes.len()
        )));
    }
    if bytes.contains(&0) {
        return Err(RegistryError::invalid_identifier(format!(
            "'{}' contains a NUL byte",
            text.escape_debug()
        )));
    }
    let mut out = [0u8; NAME_LEN];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

fn decode_hex<const N: usize>(text: &str) -> RegistryResult<[u8; N]> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let raw = hex::decode(digits)
        .map_err(|e| RegistryError::invalid_identifier(format!("'{text}': {e}")))?;
    raw.try_into().map_err(|raw: Vec<u8>| {
        RegistryError::invalid_identifier(format!(
            "'{text}' decodes to {} bytes, expected {N}",
            raw.len()
        ))
    })
}

/// Printable form of a padded name, if it has one.
fn printable(bytes: &[u8; NAME_LEN]) -> Option<&str> {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(NAME_LEN);
    if end == 0 || bytes[end..].iter().any(|b| *b != 0) {
        return None;
    }
    let text = std::str::from_utf8(&bytes[..end]).ok()?;
    if text.chars().any(char::is_control) || text.starts_with("0x") {
        return None;
    }
    Some(text)
}

macro_rules! fixed_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name([u8; NAME_LEN]);

        impl $name {
            /// Encode a short text code, left-aligned and zero padded
            pub fn new(text: &str) -> RegistryResult<Self> {
                encode_text(text).map(Self)
            }

            /// Wrap raw bytes
            pub const fn from_bytes(bytes: [u8; NAME_LEN]) -> Self {
                Self(bytes)
            }

            /// Borrow the raw bytes
            pub fn as_bytes(&self) -> &[u8; NAME_LEN] {
                &self.0
            }

            /// Text form, when the bytes hold a printable code
            pub fn as_text(&self) -> Option<&str> {
                printable(&self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match printable(&self.0) {
                    Some(text) => f.write_str(text),
                    None => write!(f, "0x{}", hex::encode(self.0)),
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }

        impl FromStr for $name {
            type Err = RegistryError;

            fn from_str(s: &str) -> RegistryResult<Self> {
                if s.starts_with("0x") && s.len() == 2 + NAME_LEN * 2 {
                    decode_hex::<NAME_LEN>(s).map(Self)
                } else {
                    Self::new(s)
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

macro_rules! hex_address {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; ADDRESS_LEN]);

        impl $name {
            /// The all-zero value
            pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

            /// Wrap raw bytes
            pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
                Self(bytes)
            }

            /// Borrow the raw bytes
            pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
                &self.0
            }

            /// Whether every byte is zero
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; ADDRESS_LEN]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }

        impl FromStr for $name {
            type Err = RegistryError;

            fn from_str(s: &str) -> RegistryResult<Self> {
                decode_hex::<ADDRESS_LEN>(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_name! {
    /// Deal identifier, conventionally an asset class code such as `RWA009-A`
    DealId
}

fixed_name! {
    /// Component type name, e.g. `urn` or `liquidationOracle`
    ComponentName
}

hex_address! {
    /// Account allowed (or not) to call mutating entry points
    AccountId
}

hex_address! {
    /// Chain address a component points at
    Address
}

/// Implementation flavor of a component address
///
/// Values are checked against the configured storage width at write time.
/// The largest value that fits the width is reserved for components that
/// should be treated as a plain address rather than a typed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(pub u128);

impl Variant {
    /// Largest value representable in `bits` bits
    pub fn max_for_bits(bits: u8) -> Self {
        if bits >= 128 {
            Self(u128::MAX)
        } else {
            Self((1u128 << bits) - 1)
        }
    }

    /// Reserved "opaque address" variant for a given storage width
    pub fn opaque(bits: u8) -> Self {
        Self::max_for_bits(bits)
    }

    /// Whether the value fits in `bits` bits
    pub fn fits(&self, bits: u8) -> bool {
        *self <= Self::max_for_bits(bits)
    }

    /// Get the inner value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Variant {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u8> for Variant {
    fn from(value: u8) -> Self {
        Self(u128::from(value))
    }
}

impl FromStr for Variant {
    type Err = RegistryError;

    fn from_str(s: &str) -> RegistryResult<Self> {
        s.parse::<u128>()
            .map(Self)
            .map_err(|e| RegistryError::invalid_identifier(format!("variant '{s}': {e}")))
    }
}
