//! # Invoice
//!
//! The aggregate holding every line of an invoice, bucketed by tax rate.
//!
//! ## Add / Merge Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice::add(item)                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stamp item with invoice precision                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bucket with item.tax_rate? ──── no ───► open bucket (appended last)   │
//! │       │ yes                               and put item in it           │
//! │       ▼                                                                 │
//! │  find_item(name, gross, type,   ── none ─► append item to bucket       │
//! │            same storno flag)                                            │
//! │       │ found                                                           │
//! │       ▼                                                                 │
//! │  same unit gross? ── yes ──► existing.quantity += item.quantity        │
//! │       │ no (unreachable through find_item)                              │
//! │       ▼                                                                 │
//! │  existing.gross += item.gross × item.quantity                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Buckets keep the order in which their tax rates were first seen; items
//! inside a bucket keep insertion order. Every query walks that order.
//!
//! ## Thread Safety
//! `add` reads then writes without internal locking. Embedders sharing an
//! invoice across threads wrap it in a single `Mutex` covering both `add`
//! and the read operations.
//!
//! ## Example
//! ```rust
//! use invoicer_core::{Invoice, ItemDraft};
//! use rust_decimal::Decimal;
//!
//! let mut invoice = Invoice::new();
//! let egg = || {
//!     ItemDraft::new("Egg", "food")
//!         .with_quantity(2)
//!         .with_tax_rate(Decimal::from(5))
//!         .with_net_amount(Decimal::from(10))
//!         .build()
//! };
//!
//! invoice.add(egg()?)?;
//! invoice.add(egg()?)?;
//!
//! assert_eq!(invoice.all_items(None).len(), 1);
//! assert_eq!(invoice.items_count(None, true), 4);
//! assert_eq!(invoice.gross_sum(None).to_string(), "42.00");
//! # Ok::<(), invoicer_core::CoreError>(())
//! ```

use rust_decimal::Decimal;
use std::fmt;
use tracing::{debug, trace};

use crate::bucket::TaxRateBucket;
use crate::error::{CoreError, CoreResult};
use crate::item::InvoiceItem;
use crate::money::{zero, DecimalPlaces};
use crate::summary::{InvoiceSummary, SummaryTotals, TaxRateGroup};
use crate::types::ItemTypeFilter;
use crate::MAX_INVOICE_LINES;

/// Invoice aggregate: tax-rate buckets plus the precision stamped on items.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice<P = ()> {
    buckets: Vec<TaxRateBucket<P>>,
    decimal_places: DecimalPlaces,
}

impl Invoice {
    /// Creates an empty invoice with two decimal places.
    pub fn new() -> Self {
        Invoice::with_decimal_places(DecimalPlaces::default())
    }
}

impl<P> Default for Invoice<P> {
    fn default() -> Self {
        Invoice::with_decimal_places(DecimalPlaces::default())
    }
}

impl<P> Invoice<P> {
    /// Creates an empty invoice whose items are summed at `places`.
    pub fn with_decimal_places(places: DecimalPlaces) -> Self {
        Invoice {
            buckets: Vec::new(),
            decimal_places: places,
        }
    }

    pub fn decimal_places(&self) -> DecimalPlaces {
        self.decimal_places
    }

    /// Buckets in first-seen tax rate order.
    pub fn buckets(&self) -> &[TaxRateBucket<P>] {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of lines across all buckets.
    pub fn line_count(&self) -> usize {
        self.buckets.iter().map(TaxRateBucket::len).sum()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Adds `item`, merging it into an identical existing line when possible.
    ///
    /// An identical line has the same tax rate, name, item type, unit gross
    /// amount, and storno flag; merging adds the incoming quantity to it.
    ///
    /// ## Errors
    /// - `TooManyLines` when a new line would exceed [`MAX_INVOICE_LINES`]
    /// - `Validation(OutOfRange)` when a merge would push the line quantity
    ///   past [`MAX_QUANTITY`](crate::MAX_QUANTITY)
    /// - the error of [`InvoiceItem::set_gross_amount`] from the re-pricing
    ///   branch (see the module docs)
    ///
    /// The invoice is left unchanged on error.
    pub fn add(&mut self, mut item: InvoiceItem<P>) -> CoreResult<()> {
        item.stamp_decimal_places(self.decimal_places);
        let has_room = self.line_count() < MAX_INVOICE_LINES;

        let position = self
            .buckets
            .iter()
            .position(|bucket| bucket.tax_rate() == item.tax_rate());

        let Some(index) = position else {
            if !has_room {
                return Err(CoreError::TooManyLines {
                    max: MAX_INVOICE_LINES,
                });
            }
            debug!(
                tax_rate = %item.tax_rate(),
                name = item.name(),
                "opening tax-rate bucket"
            );
            let mut bucket = TaxRateBucket::new(item.tax_rate());
            bucket.append(item);
            self.buckets.push(bucket);
            return Ok(());
        };

        let bucket = &mut self.buckets[index];
        match bucket.find_merge_target_mut(&item) {
            Some(existing) if existing.gross_amount() == item.gross_amount() => {
                trace!(
                    name = item.name(),
                    quantity = item.quantity(),
                    "merging into existing line"
                );
                existing.add_quantity(item.quantity())?;
            }
            Some(existing) => {
                // The merge lookup matches on the gross amount, so this arm
                // is dead unless that contract changes.
                let extra = item.gross_amount() * Decimal::from(item.quantity());
                debug!(name = item.name(), %extra, "re-pricing existing line");
                existing.set_gross_amount(existing.gross_amount() + extra)?;
            }
            None if !has_room => {
                return Err(CoreError::TooManyLines {
                    max: MAX_INVOICE_LINES,
                })
            }
            None => {
                trace!(name = item.name(), "appending new line");
                bucket.append(item);
            }
        }

        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// All items passing `filter`, bucket by bucket, in insertion order.
    pub fn all_items(&self, filter: impl Into<ItemTypeFilter>) -> Vec<&InvoiceItem<P>> {
        self.filtered(filter.into()).collect()
    }

    /// Sum of gross line sums.
    pub fn gross_sum(&self, filter: impl Into<ItemTypeFilter>) -> Decimal {
        self.sum_by(filter.into(), InvoiceItem::gross_sum)
    }

    /// Sum of net line sums.
    pub fn net_sum(&self, filter: impl Into<ItemTypeFilter>) -> Decimal {
        self.sum_by(filter.into(), InvoiceItem::net_sum)
    }

    /// Sum of tax line sums.
    pub fn tax_sum(&self, filter: impl Into<ItemTypeFilter>) -> Decimal {
        self.sum_by(filter.into(), InvoiceItem::tax_sum)
    }

    /// Total quantity of the filtered items.
    ///
    /// Regular and storno quantities are summed separately; the result is
    /// `regular - storno` when `reverse_reduces_total` is set, otherwise
    /// `regular + storno`.
    pub fn items_count(&self, filter: impl Into<ItemTypeFilter>, reverse_reduces_total: bool) -> i64 {
        let (regular, storno) = self.filtered(filter.into()).fold((0, 0), |(regular, storno), item| {
            if item.is_storno() {
                (regular, storno + item.quantity())
            } else {
                (regular + item.quantity(), storno)
            }
        });

        if reverse_reduces_total {
            regular - storno
        } else {
            regular + storno
        }
    }

    /// Groups the filtered items by tax rate, in first-occurrence order.
    ///
    /// Group totals accumulate the items' already quantized line sums.
    pub fn group_by_tax_rate(&self, filter: impl Into<ItemTypeFilter>) -> Vec<TaxRateGroup> {
        let mut groups: Vec<TaxRateGroup> = Vec::new();

        for item in self.filtered(filter.into()) {
            let rate = item.tax_rate().percent();
            let index = match groups.iter().position(|group| group.tax_rate == rate) {
                Some(index) => index,
                None => {
                    groups.push(TaxRateGroup {
                        tax_rate: rate,
                        items: Vec::new(),
                        gross_total: zero(self.decimal_places),
                        net_total: zero(self.decimal_places),
                        tax_total: zero(self.decimal_places),
                    });
                    groups.len() - 1
                }
            };
            groups[index].push(item.summary());
        }

        groups
    }

    /// Serializable view of the filtered items with their totals.
    pub fn serialize(&self, filter: impl Into<ItemTypeFilter>) -> InvoiceSummary {
        let items: Vec<_> = self
            .filtered(filter.into())
            .map(InvoiceItem::summary)
            .collect();

        let mut total = SummaryTotals {
            gross: zero(self.decimal_places),
            net: zero(self.decimal_places),
            tax: zero(self.decimal_places),
        };
        for item in &items {
            total.gross += item.gross_sum;
            total.net += item.net_sum;
            total.tax += item.tax_sum;
        }

        InvoiceSummary { items, total }
    }

    /// Shortcut for `serialize(filter).to_json(pretty)`.
    pub fn to_json(&self, filter: impl Into<ItemTypeFilter>, pretty: bool) -> CoreResult<String> {
        self.serialize(filter).to_json(pretty)
    }

    fn filtered(&self, filter: ItemTypeFilter) -> impl Iterator<Item = &InvoiceItem<P>> + '_ {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.items())
            .filter(move |item| filter.matches(item.item_type()))
    }

    fn sum_by(&self, filter: ItemTypeFilter, line_sum: fn(&InvoiceItem<P>) -> Decimal) -> Decimal {
        self.filtered(filter)
            .fold(zero(self.decimal_places), |acc, item| acc + line_sum(item))
    }
}

/// Buckets followed by the invoice totals.
impl<P> fmt::Display for Invoice<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bucket in &self.buckets {
            writeln!(f, "{bucket}")?;
        }
        writeln!(f, "----------------")?;
        writeln!(f, "Gross amount : {:>10}", self.gross_sum(None).to_string())?;
        writeln!(f, "Net amount   : {:>10}", self.net_sum(None).to_string())?;
        write!(f, "Tax amount   : {:>10}", self.tax_sum(None).to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDraft;
    use crate::types::TaxRate;
    use rust_decimal_macros::dec;

    fn food(name: &str, net: Decimal, quantity: i64) -> InvoiceItem {
        ItemDraft::new(name, "food")
            .with_quantity(quantity)
            .with_tax_rate(dec!(5))
            .with_net_amount(net)
            .build()
            .unwrap()
    }

    fn household(name: &str, net: Decimal, quantity: i64) -> InvoiceItem {
        ItemDraft::new(name, "household")
            .with_quantity(quantity)
            .with_tax_rate(dec!(15))
            .with_net_amount(net)
            .build()
            .unwrap()
    }

    #[test]
    fn test_identical_items_merge_by_quantity() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(10.00), 2)).unwrap();
        invoice.add(food("Egg", dec!(10.00), 3)).unwrap();

        assert_eq!(invoice.buckets().len(), 1);
        let items = invoice.all_items(None);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity(), 5);
    }

    #[test]
    fn test_different_price_or_type_appends() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(10.00), 1)).unwrap();
        invoice.add(food("Egg", dec!(11.00), 1)).unwrap();
        invoice
            .add(
                ItemDraft::new("Egg", "gift")
                    .with_tax_rate(dec!(5))
                    .with_net_amount(dec!(10.00))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(invoice.buckets().len(), 1);
        assert_eq!(invoice.buckets()[0].len(), 3);
    }

    #[test]
    fn test_same_item_different_rates_open_two_buckets() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(10.00), 1)).unwrap();
        invoice
            .add(
                ItemDraft::new("Egg", "food")
                    .with_tax_rate(dec!(15))
                    .with_net_amount(dec!(10.00))
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(invoice.buckets().len(), 2);
        assert!(invoice.buckets().iter().all(|bucket| bucket.len() == 1));
    }

    #[test]
    fn test_equal_rates_with_different_scale_share_a_bucket() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(10.00), 1)).unwrap();
        invoice
            .add(
                ItemDraft::new("Ham", "food")
                    .with_tax_rate(dec!(5.000))
                    .with_net_amount(dec!(3.00))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(invoice.buckets().len(), 1);
    }

    #[test]
    fn test_bucket_order_is_first_seen() {
        let mut invoice = Invoice::new();
        invoice.add(household("Mop", dec!(20.00), 1)).unwrap();
        invoice.add(food("Egg", dec!(10.00), 1)).unwrap();
        invoice.add(household("Broom", dec!(8.00), 1)).unwrap();

        let rates: Vec<_> = invoice.buckets().iter().map(TaxRateBucket::tax_rate).collect();
        assert_eq!(
            rates,
            [TaxRate::from_percent(dec!(15)), TaxRate::from_percent(dec!(5))]
        );

        let names: Vec<_> = invoice.all_items(None).iter().map(|i| i.name()).collect();
        assert_eq!(names, ["Mop", "Broom", "Egg"]);
    }

    #[test]
    fn test_add_stamps_invoice_precision() {
        let mut invoice = Invoice::with_decimal_places(DecimalPlaces::new(3).unwrap());
        invoice.add(food("Egg", dec!(10.00), 1)).unwrap();
        assert_eq!(invoice.all_items(None)[0].decimal_places().get(), 3);
        assert_eq!(invoice.gross_sum(None).to_string(), "10.500");
    }

    #[test]
    fn test_filters() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(10.00), 2)).unwrap();
        invoice.add(household("Mop", dec!(20.00), 1)).unwrap();

        assert_eq!(invoice.all_items("food").len(), 1);
        assert_eq!(invoice.all_items(["food", "household"]).len(), 2);
        assert_eq!(invoice.all_items("toys").len(), 0);

        assert_eq!(invoice.gross_sum("food"), dec!(21.00));
        assert_eq!(invoice.net_sum("household"), dec!(20.00));
        assert_eq!(invoice.tax_sum(None), dec!(4.00));
    }

    #[test]
    fn test_items_count_with_storno() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(1.00), 2)).unwrap();
        invoice.add(food("Ham", dec!(2.00), 2)).unwrap();
        invoice.add(food("Spam", dec!(3.00), 2)).unwrap();
        invoice
            .add(
                ItemDraft::new("Egg returned", "food")
                    .with_tax_rate(dec!(5))
                    .with_net_amount(dec!(1.00))
                    .with_storno(true)
                    .build()
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(invoice.items_count(None, true), 5);
        assert_eq!(invoice.items_count(None, false), 7);
    }

    #[test]
    fn test_reversal_stays_a_separate_line() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(1.00), 2)).unwrap();
        invoice
            .add(
                ItemDraft::new("Egg", "food")
                    .with_tax_rate(dec!(5))
                    .with_net_amount(dec!(1.00))
                    .with_storno(true)
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let items = invoice.all_items(None);
        assert_eq!(items.len(), 2);
        assert!(!items[0].is_storno());
        assert!(items[1].is_storno());
        assert_eq!(items[0].quantity(), 2);
        assert_eq!(items[1].quantity(), 1);
        assert_eq!(invoice.items_count(None, true), 1);
        assert_eq!(invoice.items_count(None, false), 3);
    }

    #[test]
    fn test_all_items_with_local_filter() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(10.00), 2)).unwrap();
        invoice.add(household("Mop", dec!(20.00), 1)).unwrap();

        let items = {
            let filter = ItemTypeFilter::from(String::from("household"));
            invoice.all_items(filter)
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name(), "Mop");
    }

    #[test]
    fn test_merge_past_max_quantity_is_rejected() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(1.00), crate::MAX_QUANTITY)).unwrap();

        let result = invoice.add(food("Egg", dec!(1.00), 1));
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(invoice.all_items(None)[0].quantity(), crate::MAX_QUANTITY);
    }

    #[test]
    fn test_line_cap() {
        let mut invoice = Invoice::new();
        for n in 0..MAX_INVOICE_LINES {
            invoice.add(food(&format!("Item {n}"), dec!(1.00), 1)).unwrap();
        }
        assert_eq!(invoice.line_count(), MAX_INVOICE_LINES);

        let same_rate = invoice.add(food("One more", dec!(1.00), 1));
        assert!(matches!(same_rate, Err(CoreError::TooManyLines { .. })));
        let new_rate = invoice.add(household("One more", dec!(1.00), 1));
        assert!(matches!(new_rate, Err(CoreError::TooManyLines { .. })));

        // Merging into an existing line still works at the cap.
        invoice.add(food("Item 0", dec!(1.00), 1)).unwrap();
        assert_eq!(invoice.line_count(), MAX_INVOICE_LINES);
        assert_eq!(invoice.buckets().len(), 1);
    }

    #[test]
    fn test_group_by_tax_rate() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(10.00), 2)).unwrap();
        invoice.add(household("Mop", dec!(20.00), 1)).unwrap();
        invoice.add(food("Ham", dec!(4.00), 1)).unwrap();

        let groups = invoice.group_by_tax_rate(None);
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].tax_rate, dec!(5));
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].gross_total, dec!(25.20));
        assert_eq!(groups[0].net_total, dec!(24.00));
        assert_eq!(groups[0].tax_total, dec!(1.20));

        assert_eq!(groups[1].tax_rate, dec!(15));
        assert_eq!(groups[1].gross_total, dec!(23.00));
        assert_eq!(groups[1].tax_total, dec!(3.00));

        let household_only = invoice.group_by_tax_rate("household");
        assert_eq!(household_only.len(), 1);
        assert_eq!(household_only[0].tax_rate, dec!(15));
    }

    #[test]
    fn test_serialize_totals() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(10.00), 2)).unwrap();
        invoice.add(household("Mop", dec!(20.00), 1)).unwrap();

        let summary = invoice.serialize(None);
        assert_eq!(summary.items.len(), 2);
        assert_eq!(summary.total.gross, dec!(44.00));
        assert_eq!(summary.total.net, dec!(40.00));
        assert_eq!(summary.total.tax, dec!(4.00));

        let food_only = invoice.serialize("food");
        assert_eq!(food_only.items.len(), 1);
        assert_eq!(food_only.total.gross, dec!(21.00));
    }

    #[test]
    fn test_serialize_empty_invoice() {
        let invoice = Invoice::new();
        let summary = invoice.serialize(None);
        assert!(summary.items.is_empty());
        assert!(summary.total.gross.is_zero());
        assert!(summary.total.net.is_zero());
        assert!(summary.total.tax.is_zero());
        assert_eq!(
            invoice.to_json(None, false).unwrap(),
            r#"{"items":[],"total":{"gross":0.0,"net":0.0,"tax":0.0}}"#
        );
    }

    #[test]
    fn test_payload_invoice() {
        let mut invoice: Invoice<u32> = Invoice::default();
        let item = ItemDraft::new("Egg", "food")
            .with_net_amount(dec!(1.00))
            .build_with_payload(7u32)
            .unwrap();
        invoice.add(item).unwrap();
        assert_eq!(invoice.all_items(None)[0].payload(), Some(&7));
    }

    #[test]
    fn test_display() {
        let mut invoice = Invoice::new();
        invoice.add(food("Egg", dec!(10.00), 2)).unwrap();
        let expected = "Invoice bucket for tax rate 5%\n\
                        [food] 2x Egg 21.00 (tax 5%: 20.00 + 1.00)\n\
                        ----------------\n\
                        Gross amount :      21.00\n\
                        Net amount   :      20.00\n\
                        Tax amount   :       1.00";
        assert_eq!(invoice.to_string(), expected);
    }
}
