//! Bounded range iteration over enumerable collections
//!
//! `end` is clamped to the collection length before the bounds check, so
//! `page(items, 0, usize::MAX)` lists the whole collection. A start past the
//! clamped end is an error rather than an empty page.

use crate::errors::{RegistryError, RegistryResult};
use crate::identifiers::{ComponentName, DealId};
use serde::{Deserialize, Serialize};

/// Collection targeted by an iteration request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// The global deal enumeration
    Deals,
    /// The component names attached to one deal
    Components(DealId),
}

/// One page of an iteration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Deal identifiers
    Deals(Vec<DealId>),
    /// Component names of one deal
    Components(Vec<ComponentName>),
}

impl Page {
    /// Number of entries in the page
    pub fn len(&self) -> usize {
        match self {
            Page::Deals(ids) => ids.len(),
            Page::Components(names) => names.len(),
        }
    }

    /// Whether the page is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Slice `[start, min(end, len))` out of an exact-size iterator
pub fn page<I>(items: I, start: usize, end: usize) -> RegistryResult<Vec<I::Item>>
where
    I: ExactSizeIterator,
{
    let end = end.min(items.len());
    if start > end {
        return Err(RegistryError::InvalidIteration { start, end });
    }
    Ok(items.skip(start).take(end - start).collect())
}
