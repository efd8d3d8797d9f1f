//! # Tax-Rate Bucket
//!
//! An ordered list of invoice items sharing one tax rate.
//!
//! The bucket only stores and reduces; deciding whether an incoming item
//! merges into an existing line is the [`Invoice`](crate::invoice::Invoice)'s
//! job.

use rust_decimal::Decimal;
use std::fmt;

use crate::item::InvoiceItem;
use crate::types::TaxRate;

/// Items of one tax rate, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxRateBucket<P = ()> {
    tax_rate: TaxRate,
    items: Vec<InvoiceItem<P>>,
}

impl<P> TaxRateBucket<P> {
    /// Creates an empty bucket for `tax_rate`.
    pub fn new(tax_rate: TaxRate) -> Self {
        TaxRateBucket {
            tax_rate,
            items: Vec::new(),
        }
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn items(&self) -> &[InvoiceItem<P>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends `item` at the end; no merging happens here.
    pub fn append(&mut self, item: InvoiceItem<P>) {
        self.items.push(item);
    }

    /// Returns the first item with this name and unit gross amount.
    ///
    /// When `item_type` is given the type must match too; when it is `None`
    /// the type is ignored. Amounts compare exactly.
    pub fn find_item(
        &self,
        name: &str,
        gross_amount: Decimal,
        item_type: Option<&str>,
    ) -> Option<&InvoiceItem<P>> {
        self.items
            .iter()
            .find(|item| item.matches(name, gross_amount, item_type))
    }

    /// Mutable variant of [`find_item`](Self::find_item) with the same rule.
    pub fn find_item_mut(
        &mut self,
        name: &str,
        gross_amount: Decimal,
        item_type: Option<&str>,
    ) -> Option<&mut InvoiceItem<P>> {
        self.items
            .iter_mut()
            .find(|item| item.matches(name, gross_amount, item_type))
    }

    /// Returns the line `incoming` would merge into.
    ///
    /// Same rule as [`find_item`](Self::find_item) with the item type given,
    /// and the storno flag must match too: a reversal never merges into a
    /// sale line or the other way round.
    pub(crate) fn find_merge_target_mut(
        &mut self,
        incoming: &InvoiceItem<P>,
    ) -> Option<&mut InvoiceItem<P>> {
        self.items.iter_mut().find(|item| {
            item.matches(
                incoming.name(),
                incoming.gross_amount(),
                Some(incoming.item_type()),
            ) && item.is_storno() == incoming.is_storno()
        })
    }

    /// Sum of the items' net line sums (not re-quantized).
    pub fn net_sum(&self) -> Decimal {
        self.items.iter().map(InvoiceItem::net_sum).sum()
    }

    /// Sum of the items' gross line sums (not re-quantized).
    pub fn gross_sum(&self) -> Decimal {
        self.items.iter().map(InvoiceItem::gross_sum).sum()
    }

    /// Sum of the items' tax line sums (not re-quantized).
    pub fn tax_sum(&self) -> Decimal {
        self.items.iter().map(InvoiceItem::tax_sum).sum()
    }
}

impl<P> fmt::Display for TaxRateBucket<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invoice bucket for tax rate {}%", self.tax_rate)?;
        for item in &self.items {
            write!(f, "\n{item}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
