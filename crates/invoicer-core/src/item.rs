//! # Invoice Item
//!
//! A single priced, taxed, quantified invoice line.
//!
//! ## Item Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Invoice Item Lifecycle                               │
//! │                                                                         │
//! │  ItemDraft ──► build() ──┬── net given   ──► set_net_amount()          │
//! │  (name, type, qty,       │                    gross, tax derived        │
//! │   rate, net XOR gross)   │                                              │
//! │                          └── gross given ──► set_gross_amount()        │
//! │                                               net, tax derived          │
//! │                                                                         │
//! │  InvoiceItem ──► Invoice::add() ──► stamped with invoice precision     │
//! │                                  └─► quantity grows when merged         │
//! │                                                                         │
//! │  Unit invariant after every setter:  gross == net + tax                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two-Step Rounding
//! Unit amounts are quantized when set. Line sums multiply the quantized
//! unit amount by the quantity and quantize the product once more:
//! `gross_sum = quantize(gross × qty)`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::{gross_to_net, net_to_gross, quantize, DecimalPlaces};
use crate::summary::ItemSummary;
use crate::types::TaxRate;
use crate::validation::{
    validate_amount, validate_item_name, validate_item_type, validate_quantity,
};

// =============================================================================
// Item Draft
// =============================================================================

fn default_quantity() -> i64 {
    1
}

/// Construction input for an [`InvoiceItem`].
///
/// Exactly one of `net_amount` / `gross_amount` must be supplied; the other
/// amount and the tax are derived. Drafts deserialize from JSON so consumers
/// can load item lists from files:
///
/// ```rust
/// use invoicer_core::ItemDraft;
///
/// let draft: ItemDraft = serde_json::from_str(
///     r#"{ "name": "Egg", "item_type": "food", "quantity": 2,
///          "tax_rate": "5", "net_amount": "10.00" }"#,
/// ).unwrap();
///
/// let item = draft.build().unwrap();
/// assert_eq!(item.gross_amount().to_string(), "10.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Name as it appears on the invoice.
    pub name: String,

    /// Free-form category such as `food` or `discount`.
    #[serde(default)]
    pub item_type: String,

    /// Quantity; zero or negative for reversals and discounts.
    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Tax rate in percent.
    #[serde(default)]
    pub tax_rate: TaxRate,

    /// Net price of a single unit.
    #[serde(default)]
    pub net_amount: Option<Decimal>,

    /// Gross price of a single unit.
    #[serde(default)]
    pub gross_amount: Option<Decimal>,

    /// Precision for the item's amounts.
    #[serde(default)]
    pub decimal_places: DecimalPlaces,

    /// Marks a reversal (storno) line.
    #[serde(default)]
    pub storno: bool,
}

impl ItemDraft {
    /// Starts a draft with quantity 1, zero tax rate, and two decimal places.
    pub fn new(name: impl Into<String>, item_type: impl Into<String>) -> Self {
        ItemDraft {
            name: name.into(),
            item_type: item_type.into(),
            quantity: default_quantity(),
            tax_rate: TaxRate::zero(),
            net_amount: None,
            gross_amount: None,
            decimal_places: DecimalPlaces::default(),
            storno: false,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_tax_rate(mut self, rate: impl Into<TaxRate>) -> Self {
        self.tax_rate = rate.into();
        self
    }

    pub fn with_net_amount(mut self, amount: Decimal) -> Self {
        self.net_amount = Some(amount);
        self
    }

    pub fn with_gross_amount(mut self, amount: Decimal) -> Self {
        self.gross_amount = Some(amount);
        self
    }

    pub fn with_decimal_places(mut self, places: DecimalPlaces) -> Self {
        self.decimal_places = places;
        self
    }

    pub fn with_storno(mut self, storno: bool) -> Self {
        self.storno = storno;
        self
    }

    /// Builds an item without a payload.
    pub fn build(self) -> CoreResult<InvoiceItem> {
        self.into_item(None)
    }

    /// Builds an item carrying an opaque caller-owned payload.
    ///
    /// The engine never reads or modifies the payload.
    pub fn build_with_payload<P>(self, payload: P) -> CoreResult<InvoiceItem<P>> {
        self.into_item(Some(payload))
    }

    fn into_item<P>(self, payload: Option<P>) -> CoreResult<InvoiceItem<P>> {
        validate_item_name(&self.name)?;
        validate_item_type(&self.item_type)?;
        validate_quantity(self.quantity)?;

        let places = self.decimal_places;
        let mut item = InvoiceItem {
            name: self.name,
            item_type: self.item_type,
            quantity: self.quantity,
            tax_rate: self.tax_rate,
            net_amount: Decimal::ZERO,
            gross_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            decimal_places: places,
            storno: self.storno,
            payload,
        };

        match (self.net_amount, self.gross_amount) {
            (Some(net), None) => item.set_net_amount(net)?,
            (None, Some(gross)) => item.set_gross_amount(gross)?,
            (None, None) => {
                return Err(CoreError::InvalidConstruction {
                    name: item.name,
                    reason: "no net or gross amount supplied".to_string(),
                })
            }
            (Some(_), Some(_)) => {
                return Err(CoreError::InvalidConstruction {
                    name: item.name,
                    reason: "supply either a net or a gross amount, not both".to_string(),
                })
            }
        }

        Ok(item)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// One priced line on an invoice.
///
/// ## Design Notes
/// - Amount fields are private: they only change together, through
///   [`set_net_amount`](Self::set_net_amount) or
///   [`set_gross_amount`](Self::set_gross_amount)
/// - `P` is an opaque payload owned by the caller (a product handle, an
///   index into caller storage, ...); `()` when unused
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItem<P = ()> {
    name: String,
    item_type: String,
    quantity: i64,
    tax_rate: TaxRate,
    net_amount: Decimal,
    gross_amount: Decimal,
    tax_amount: Decimal,
    decimal_places: DecimalPlaces,
    storno: bool,
    payload: Option<P>,
}

impl<P> InvoiceItem<P> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Net price of a single unit.
    pub fn net_amount(&self) -> Decimal {
        self.net_amount
    }

    /// Gross price of a single unit.
    pub fn gross_amount(&self) -> Decimal {
        self.gross_amount
    }

    /// Tax of a single unit.
    pub fn tax_amount(&self) -> Decimal {
        self.tax_amount
    }

    pub fn decimal_places(&self) -> DecimalPlaces {
        self.decimal_places
    }

    /// Whether this line reverses (cancels) previously sold quantity.
    pub fn is_storno(&self) -> bool {
        self.storno
    }

    pub fn set_storno(&mut self, storno: bool) {
        self.storno = storno;
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut P> {
        self.payload.as_mut()
    }

    pub fn into_payload(self) -> Option<P> {
        self.payload
    }

    /// Sets the unit net amount and derives gross and tax.
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::ItemDraft;
    /// use rust_decimal::Decimal;
    ///
    /// let mut item = ItemDraft::new("Egg", "food")
    ///     .with_tax_rate(Decimal::from(5))
    ///     .with_net_amount(Decimal::from(1))
    ///     .build()
    ///     .unwrap();
    ///
    /// item.set_net_amount(Decimal::new(1000, 2))?; // 10.00
    /// assert_eq!(item.gross_amount().to_string(), "10.50");
    /// assert_eq!(item.tax_amount().to_string(), "0.50");
    /// # Ok::<(), invoicer_core::CoreError>(())
    /// ```
    ///
    /// ## Errors
    /// - `Validation(OutOfRange)` when the input or a derived amount exceeds
    ///   [`MAX_AMOUNT`](crate::validation::MAX_AMOUNT)
    /// - `Overflow` when the tax rate is too large to apply
    ///
    /// The item is left unchanged on error.
    pub fn set_net_amount(&mut self, value: Decimal) -> CoreResult<()> {
        validate_amount("net_amount", value)?;
        let net = quantize(value, self.decimal_places);
        let (gross, tax) = net_to_gross(net, self.tax_rate, self.decimal_places)?;
        validate_amount("gross_amount", gross)?;
        validate_amount("tax_amount", tax)?;
        self.net_amount = net;
        self.gross_amount = gross;
        self.tax_amount = tax;
        Ok(())
    }

    /// Sets the unit gross amount and derives net and tax.
    ///
    /// ## Errors
    /// - `InvalidTaxRate` when the item's rate is -100%
    /// - `Validation(OutOfRange)` / `Overflow` as for
    ///   [`set_net_amount`](Self::set_net_amount)
    ///
    /// The item is left unchanged on error.
    pub fn set_gross_amount(&mut self, value: Decimal) -> CoreResult<()> {
        validate_amount("gross_amount", value)?;
        let gross = quantize(value, self.decimal_places);
        let (net, tax) = gross_to_net(gross, self.tax_rate, self.decimal_places)?;
        validate_amount("net_amount", net)?;
        validate_amount("tax_amount", tax)?;
        self.net_amount = net;
        self.gross_amount = gross;
        self.tax_amount = tax;
        Ok(())
    }

    /// Net amount for the whole line.
    pub fn net_sum(&self) -> Decimal {
        self.line_sum(self.net_amount)
    }

    /// Gross amount for the whole line.
    pub fn gross_sum(&self) -> Decimal {
        self.line_sum(self.gross_amount)
    }

    /// Tax amount for the whole line.
    pub fn tax_sum(&self) -> Decimal {
        self.line_sum(self.tax_amount)
    }

    /// Serializable record of this line (unit amounts plus line sums).
    pub fn summary(&self) -> ItemSummary {
        ItemSummary {
            item_type: self.item_type.clone(),
            quantity: self.quantity,
            name: self.name.clone(),
            gross_amount: self.gross_amount,
            net_amount: self.net_amount,
            tax_rate: self.tax_rate.percent(),
            gross_sum: self.gross_sum(),
            net_sum: self.net_sum(),
            tax_sum: self.tax_sum(),
        }
    }

    // Unit amounts and quantity are bounded at construction, so the product
    // stays far inside the decimal range.
    fn line_sum(&self, unit: Decimal) -> Decimal {
        quantize(unit * Decimal::from(self.quantity), self.decimal_places)
    }

    pub(crate) fn stamp_decimal_places(&mut self, places: DecimalPlaces) {
        self.decimal_places = places;
    }

    /// Grows the line by `quantity`, keeping it within `MAX_QUANTITY`.
    pub(crate) fn add_quantity(&mut self, quantity: i64) -> CoreResult<()> {
        let merged = self
            .quantity
            .checked_add(quantity)
            .ok_or(CoreError::Overflow {
                operation: "quantity merge",
            })?;
        validate_quantity(merged)?;
        self.quantity = merged;
        Ok(())
    }

    /// Checks the merge key used by [`TaxRateBucket::find_item`](crate::bucket::TaxRateBucket::find_item).
    pub(crate) fn matches(&self, name: &str, gross: Decimal, item_type: Option<&str>) -> bool {
        self.name == name
            && self.gross_amount == gross
            && item_type.map_or(true, |t| self.item_type == t)
    }
}

/// One-line debug rendering: `[food] 2x Egg 21.00 (tax 5%: 20.00 + 1.00)`.
impl<P> fmt::Display for InvoiceItem<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}x {} {} (tax {}%: {} + {})",
            self.item_type,
            self.quantity,
            self.name,
            self.gross_sum(),
            self.tax_rate,
            self.net_sum(),
            self.tax_sum()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use rust_decimal_macros::dec;

    fn egg() -> InvoiceItem {
        ItemDraft::new("Egg", "food")
            .with_quantity(2)
            .with_net_amount(dec!(10.00))
            .with_tax_rate(dec!(5))
            .build()
            .unwrap()
    }

    #[test]
    fn test_net_construction_derives_gross_and_tax() {
        let item = egg();
        assert_eq!(item.net_amount(), dec!(10.00));
        assert_eq!(item.gross_amount(), dec!(10.50));
        assert_eq!(item.tax_amount(), dec!(0.50));
        assert_eq!(item.gross_sum(), dec!(21.00));
        assert_eq!(item.net_sum(), dec!(20.00));
        assert_eq!(item.tax_sum(), dec!(1.00));
    }

    #[test]
    fn test_gross_construction_derives_net_and_tax() {
        let item = ItemDraft::new("Mop", "household")
            .with_gross_amount(dec!(11.50))
            .with_tax_rate(dec!(15))
            .build()
            .unwrap();
        assert_eq!(item.net_amount(), dec!(10.00));
        assert_eq!(item.tax_amount(), dec!(1.50));
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_input_is_quantized_before_deriving() {
        let item = ItemDraft::new("Ham", "food")
            .with_gross_amount(dec!(12.3456789))
            .with_tax_rate(dec!(5))
            .build()
            .unwrap();
        assert_eq!(item.gross_amount(), dec!(12.35));
        assert_eq!(item.net_amount() + item.tax_amount(), item.gross_amount());
    }

    #[test]
    fn test_setters_overwrite_all_amounts() {
        let mut item = egg();

        item.set_gross_amount(dec!(21.00)).unwrap();
        assert_eq!(item.gross_amount(), dec!(21.00));
        assert_eq!(item.net_amount(), dec!(20.00));
        assert_eq!(item.tax_amount(), dec!(1.00));

        item.set_net_amount(dec!(1.99)).unwrap();
        assert_eq!(item.net_amount(), dec!(1.99));
        assert_eq!(item.tax_amount(), dec!(0.10));
        assert_eq!(item.gross_amount(), dec!(2.09));
    }

    #[test]
    fn test_setters_are_idempotent() {
        let mut item = egg();
        let before = item.clone();
        item.set_net_amount(dec!(10.00)).unwrap();
        assert_eq!(item, before);
        item.set_gross_amount(dec!(10.50)).unwrap();
        assert_eq!(item, before);
    }

    #[test]
    fn test_line_sums_quantize_the_product() {
        // 0.335 per unit at 3 places, summed at 2 places: 3 × 0.335 = 1.005 → 1.01
        let mut item = ItemDraft::new("Nail", "hardware")
            .with_quantity(3)
            .with_net_amount(dec!(0.335))
            .with_decimal_places(DecimalPlaces::new(3).unwrap())
            .build()
            .unwrap();
        assert_eq!(item.net_sum(), dec!(1.005));

        item.stamp_decimal_places(DecimalPlaces::default());
        assert_eq!(item.net_sum(), dec!(1.01));
    }

    #[test]
    fn test_negative_and_zero_quantity() {
        let reversal = egg_with_quantity(-1);
        assert_eq!(reversal.gross_sum(), dec!(-10.50));

        let nothing = egg_with_quantity(0);
        assert!(nothing.gross_sum().is_zero());
    }

    fn egg_with_quantity(quantity: i64) -> InvoiceItem {
        ItemDraft::new("Egg", "food")
            .with_quantity(quantity)
            .with_net_amount(dec!(10.00))
            .with_tax_rate(dec!(5))
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_amount_is_rejected() {
        let result = ItemDraft::new("Egg", "food").build();
        assert!(matches!(result, Err(CoreError::InvalidConstruction { .. })));
    }

    #[test]
    fn test_both_amounts_are_rejected() {
        let result = ItemDraft::new("Egg", "food")
            .with_net_amount(dec!(1))
            .with_gross_amount(dec!(1))
            .build();
        assert!(matches!(result, Err(CoreError::InvalidConstruction { .. })));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let result = ItemDraft::new("  ", "food").with_net_amount(dec!(1)).build();
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_gross_with_minus_hundred_rate_is_rejected() {
        let result = ItemDraft::new("Void", "misc")
            .with_gross_amount(dec!(5))
            .with_tax_rate(dec!(-100))
            .build();
        assert!(matches!(result, Err(CoreError::InvalidTaxRate { .. })));
    }

    #[test]
    fn test_failed_gross_setter_leaves_item_unchanged() {
        let mut item = ItemDraft::new("Void", "misc")
            .with_net_amount(dec!(5))
            .with_tax_rate(dec!(-100))
            .build()
            .unwrap();
        let before = item.clone();
        assert!(item.set_gross_amount(dec!(1)).is_err());
        assert_eq!(item, before);
    }

    #[test]
    fn test_amounts_beyond_range_are_rejected() {
        let huge = ItemDraft::new("Egg", "food")
            .with_quantity(1_000_000)
            .with_net_amount(dec!(100000000000000000000))
            .build();
        assert!(matches!(
            huge,
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        // The input fits, the derived gross does not.
        let derived = ItemDraft::new("Egg", "food")
            .with_tax_rate(dec!(500))
            .with_net_amount(crate::validation::MAX_AMOUNT)
            .build();
        assert!(matches!(
            derived,
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));

        let overflow = ItemDraft::new("Egg", "food")
            .with_tax_rate(Decimal::MAX)
            .with_net_amount(dec!(1000.00))
            .build();
        assert!(matches!(overflow, Err(CoreError::Overflow { .. })));

        let half_max = ItemDraft::new("Egg", "food")
            .with_tax_rate(dec!(500))
            .with_net_amount(Decimal::MAX / dec!(2))
            .build();
        assert!(half_max.is_err());
    }

    #[test]
    fn test_quantity_beyond_range_is_rejected() {
        let result = ItemDraft::new("Egg", "food")
            .with_quantity(crate::MAX_QUANTITY + 1)
            .with_net_amount(dec!(1.00))
            .build();
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_failed_net_setter_leaves_item_unchanged() {
        let mut item = egg();
        let before = item.clone();
        assert!(item.set_net_amount(Decimal::MAX).is_err());
        assert_eq!(item, before);
    }

    #[test]
    fn test_add_quantity_is_bounded() {
        let mut item = egg();
        item.add_quantity(3).unwrap();
        assert_eq!(item.quantity(), 5);

        assert!(item.add_quantity(crate::MAX_QUANTITY).is_err());
        assert_eq!(item.quantity(), 5);
    }

    #[test]
    fn test_line_sums_at_the_limits() {
        let item = ItemDraft::new("Yacht", "luxury")
            .with_quantity(crate::MAX_QUANTITY)
            .with_gross_amount(crate::validation::MAX_AMOUNT)
            .build()
            .unwrap();
        assert_eq!(item.gross_sum(), dec!(1000000000000000.00));
    }

    #[test]
    fn test_payload_is_carried_untouched() {
        let mut item = ItemDraft::new("Egg", "food")
            .with_net_amount(dec!(1))
            .build_with_payload(vec![42u32])
            .unwrap();
        assert_eq!(item.payload(), Some(&vec![42]));
        if let Some(payload) = item.payload_mut() {
            payload.push(7);
        }
        assert_eq!(item.into_payload(), Some(vec![42, 7]));
    }

    #[test]
    fn test_display() {
        assert_eq!(egg().to_string(), "[food] 2x Egg 21.00 (tax 5%: 20.00 + 1.00)");
    }

    #[test]
    fn test_summary_fields() {
        let summary = egg().summary();
        assert_eq!(summary.name, "Egg");
        assert_eq!(summary.item_type, "food");
        assert_eq!(summary.quantity, 2);
        assert_eq!(summary.gross_amount, dec!(10.50));
        assert_eq!(summary.net_amount, dec!(10.00));
        assert_eq!(summary.tax_rate, dec!(5));
        assert_eq!(summary.gross_sum, dec!(21.00));
        assert_eq!(summary.net_sum, dec!(20.00));
        assert_eq!(summary.tax_sum, dec!(1.00));
    }

    #[test]
    fn test_draft_from_json_defaults() {
        let draft: ItemDraft =
            serde_json::from_str(r#"{ "name": "Broom", "gross_amount": "7.99" }"#).unwrap();
        assert_eq!(draft.quantity, 1);
        assert!(draft.tax_rate.is_zero());
        assert_eq!(draft.decimal_places, DecimalPlaces::default());
        assert!(!draft.storno);

        let item = draft.build().unwrap();
        assert_eq!(item.net_amount(), dec!(7.99));
    }
}
