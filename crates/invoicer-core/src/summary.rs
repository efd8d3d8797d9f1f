//! # Summary Records
//!
//! Transport-neutral records produced by item, grouping, and invoice
//! serialization.
//!
//! ## Decimal Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvoiceItem ──► ItemSummary ──► serde ──► JSON number                  │
//! │   (Decimal)       (Decimal)       ▲                                     │
//! │                                   └─ only place Decimal becomes f64     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Records keep exact `Decimal` values so callers can keep computing with
//! them; conversion to a JSON number happens inside serde.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;

// =============================================================================
// Item Summary
// =============================================================================

/// Serialized form of one invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemSummary {
    pub item_type: String,
    pub quantity: i64,
    pub name: String,
    /// Unit gross amount.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub gross_amount: Decimal,
    /// Unit net amount.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub net_amount: Decimal,
    /// Tax rate in percent.
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub tax_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub gross_sum: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub net_sum: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub tax_sum: Decimal,
}

// =============================================================================
// Tax Rate Group
// =============================================================================

/// Items of one tax rate with their accumulated totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRateGroup {
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub tax_rate: Decimal,
    pub items: Vec<ItemSummary>,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub gross_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub net_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub tax_total: Decimal,
}

impl TaxRateGroup {
    pub(crate) fn push(&mut self, item: ItemSummary) {
        self.gross_total += item.gross_sum;
        self.net_total += item.net_sum;
        self.tax_total += item.tax_sum;
        self.items.push(item);
    }
}

// =============================================================================
// Invoice Summary
// =============================================================================

/// Gross, net, and tax totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryTotals {
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub gross: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub net: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(as = "f64")]
    pub tax: Decimal,
}

/// Serialized form of a (possibly filtered) invoice.
///
/// ## Shape
/// ```text
/// {
///   "items": [ { "item_type": ..., "quantity": ..., "gross_sum": ..., ... } ],
///   "total": { "gross": ..., "net": ..., "tax": ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceSummary {
    pub items: Vec<ItemSummary>,
    pub total: SummaryTotals,
}

impl InvoiceSummary {
    /// Renders the summary as a JSON string.
    pub fn to_json(&self, pretty: bool) -> CoreResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Renders the summary as a generic JSON tree (string keys, primitive leaves).
    pub fn to_value(&self) -> CoreResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
