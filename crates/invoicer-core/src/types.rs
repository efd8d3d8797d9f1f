//! # Domain Types
//!
//! Small value types shared by items, buckets, and the invoice.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐         ┌─────────────────────────────┐       │
//! │  │      TaxRate        │         │       ItemTypeFilter        │       │
//! │  │  ─────────────────  │         │  ─────────────────────────  │       │
//! │  │  percent (Decimal)  │         │  All                        │       │
//! │  │  5 == 5.00          │         │  Only({"food", "discount"}) │       │
//! │  └─────────────────────┘         └─────────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate as a decimal percentage (`5` means 5%).
///
/// The engine treats the rate as opaque: it is never validated against any
/// tax law, only used in the conversion formulas and as the bucket key.
///
/// ## Equality
/// Equality and hashing are by numeric value, so `5`, `5.0` and `5.00` all
/// route to the same bucket.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a tax rate from a percentage.
    #[inline]
    pub const fn from_percent(percent: Decimal) -> Self {
        TaxRate(percent)
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for TaxRate {
    fn from(percent: Decimal) -> Self {
        TaxRate(percent)
    }
}

/// Shows the percentage without trailing zeros (`5.00` prints as `5`).
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

// =============================================================================
// Item Type Filter
// =============================================================================

/// Restricts invoice queries to a set of item types.
///
/// ## Conversions
/// ```rust
/// use invoicer_core::ItemTypeFilter;
///
/// assert_eq!(ItemTypeFilter::from(None::<&str>), ItemTypeFilter::All);
/// assert!(ItemTypeFilter::from("food").matches("food"));
/// assert!(ItemTypeFilter::from(["food", "discount"]).matches("discount"));
/// assert!(!ItemTypeFilter::from("food").matches("household"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ItemTypeFilter {
    /// Every item.
    #[default]
    All,
    /// Only items whose type is in the set.
    Only(BTreeSet<String>),
}

impl ItemTypeFilter {
    /// Builds a filter accepting any of `types`.
    pub fn only<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ItemTypeFilter::Only(types.into_iter().map(Into::into).collect())
    }

    /// Checks whether an item of `item_type` passes the filter.
    pub fn matches(&self, item_type: &str) -> bool {
        match self {
            ItemTypeFilter::All => true,
            ItemTypeFilter::Only(types) => types.contains(item_type),
        }
    }
}

impl From<&str> for ItemTypeFilter {
    fn from(item_type: &str) -> Self {
        ItemTypeFilter::only([item_type])
    }
}

impl From<String> for ItemTypeFilter {
    fn from(item_type: String) -> Self {
        ItemTypeFilter::only([item_type])
    }
}

impl From<Option<&str>> for ItemTypeFilter {
    fn from(item_type: Option<&str>) -> Self {
        item_type.map_or(ItemTypeFilter::All, ItemTypeFilter::from)
    }
}

impl From<&[&str]> for ItemTypeFilter {
    fn from(types: &[&str]) -> Self {
        ItemTypeFilter::only(types.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for ItemTypeFilter {
    fn from(types: [&str; N]) -> Self {
        ItemTypeFilter::only(types)
    }
}

impl From<Vec<String>> for ItemTypeFilter {
    fn from(types: Vec<String>) -> Self {
        ItemTypeFilter::only(types)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
