//! # Item Catalog
//!
//! Item drafts fed into the demo invoice: either the built-in sample catalog
//! or a JSON array of drafts read from disk.
//!
//! ## Sample Catalog
//! ```text
//! food       5%   Cheese, Ham, Spam, Egg         (net prices)
//! household 15%   Mop, Vacuum cleaner, Broom     (gross prices)
//! discount   5%   Discount on food               (gross -10.00)
//! household 15%   Broom (returned)               (storno)
//! ```

use invoicer_core::ItemDraft;
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

/// Food tax rate in percent
const FOOD_TAX_RATE: i64 = 5;

/// Household tax rate in percent
const HOUSEHOLD_TAX_RATE: i64 = 15;

/// Food items: (name, net price in cents, quantity)
const FOOD_ITEMS: &[(&str, i64, i64)] = &[
    ("Cheese", 1249, 2),
    ("Ham", 899, 1),
    ("Spam", 349, 4),
    ("Egg", 1000, 2),
];

/// Household items: (name, gross price in cents, quantity)
const HOUSEHOLD_ITEMS: &[(&str, i64, i64)] = &[
    ("Mop", 1150, 1),
    ("Vacuum cleaner", 18999, 1),
    ("Broom", 1725, 3),
];

/// Builds the sample catalog.
///
/// The second `Egg` line is identical to the first and merges into it when
/// added to an invoice.
pub fn sample_drafts() -> Vec<ItemDraft> {
    let mut drafts = Vec::new();

    for &(name, cents, quantity) in FOOD_ITEMS {
        drafts.push(
            ItemDraft::new(name, "food")
                .with_quantity(quantity)
                .with_tax_rate(Decimal::from(FOOD_TAX_RATE))
                .with_net_amount(Decimal::new(cents, 2)),
        );
    }

    for &(name, cents, quantity) in HOUSEHOLD_ITEMS {
        drafts.push(
            ItemDraft::new(name, "household")
                .with_quantity(quantity)
                .with_tax_rate(Decimal::from(HOUSEHOLD_TAX_RATE))
                .with_gross_amount(Decimal::new(cents, 2)),
        );
    }

    drafts.push(
        ItemDraft::new("Egg", "food")
            .with_tax_rate(Decimal::from(FOOD_TAX_RATE))
            .with_net_amount(Decimal::new(1000, 2)),
    );

    drafts.push(
        ItemDraft::new("Discount on food", "discount")
            .with_tax_rate(Decimal::from(FOOD_TAX_RATE))
            .with_gross_amount(Decimal::from(-10)),
    );

    drafts.push(
        ItemDraft::new("Broom (returned)", "household")
            .with_tax_rate(Decimal::from(HOUSEHOLD_TAX_RATE))
            .with_gross_amount(Decimal::new(1725, 2))
            .with_storno(true),
    );

    drafts
}

/// Reads a JSON array of item drafts.
pub fn load_drafts(path: &Path) -> Result<Vec<ItemDraft>, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_drafts(&raw)
}

fn parse_drafts(raw: &str) -> Result<Vec<ItemDraft>, CatalogError> {
    Ok(serde_json::from_str(raw)?)
}

/// Catalog loading errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid item drafts: {0}")]
    Parse(#[from] serde_json::Error),
}
