//! # Money Module
//!
//! Fixed-precision rounding and net/gross conversion.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    1.005 rounded to 2 places = 1.00  ❌ (1.005 is really 1.00499...)     │
//! │                                                                         │
//! │  OUR SOLUTION: exact base-10 Decimal                                    │
//! │    1.005 rounded half-up to 2 places = 1.01  ✅                          │
//! │                                                                         │
//! │  Every derived amount is quantized right after the step producing it,  │
//! │  so aggregation never drifts beyond per-step rounding.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conversion Formulas
//! ```text
//! net → gross:  tax   = quantize(net × rate / 100)
//!               gross = net + tax
//!
//! gross → net:  net   = quantize(gross / (1 + rate / 100))
//!               tax   = gross - net
//! ```
//!
//! ## Usage
//! ```rust
//! use invoicer_core::money::{net_to_gross, quantize, DecimalPlaces};
//! use invoicer_core::TaxRate;
//! use rust_decimal::Decimal;
//!
//! let places = DecimalPlaces::default(); // 2
//! let net = quantize(Decimal::new(1000, 2), places); // 10.00
//!
//! let (gross, tax) = net_to_gross(net, TaxRate::from_percent(Decimal::from(5)), places)?;
//! assert_eq!(gross.to_string(), "10.50");
//! assert_eq!(tax.to_string(), "0.50");
//! # Ok::<(), invoicer_core::CoreError>(())
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::TaxRate;

// =============================================================================
// Decimal Places
// =============================================================================

/// Number of fractional digits every monetary amount is quantized to.
///
/// ## Design Decisions
/// - **Validated newtype**: a negative or unrepresentable precision is
///   rejected once, where the value enters the engine, so every rounding
///   call afterwards is infallible
/// - **Deserializes from a signed integer**: JSON input of `-1` yields
///   `InvalidPrecision` instead of a type error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct DecimalPlaces(u32);

impl DecimalPlaces {
    /// Largest supported precision.
    ///
    /// With amounts capped at [`MAX_AMOUNT`](crate::validation::MAX_AMOUNT),
    /// quantities at [`MAX_QUANTITY`](crate::MAX_QUANTITY), and lines at
    /// [`MAX_INVOICE_LINES`](crate::MAX_INVOICE_LINES), every total still fits
    /// the 96-bit mantissa at this scale.
    pub const MAX: u32 = 8;

    /// Creates a precision, failing when it exceeds [`DecimalPlaces::MAX`].
    ///
    /// ## Example
    /// ```rust
    /// use invoicer_core::money::DecimalPlaces;
    ///
    /// assert_eq!(DecimalPlaces::new(4).unwrap().get(), 4);
    /// assert!(DecimalPlaces::new(9).is_err());
    /// ```
    pub fn new(places: u32) -> CoreResult<Self> {
        if places > Self::MAX {
            return Err(CoreError::InvalidPrecision {
                places: i64::from(places),
                max: Self::MAX,
            });
        }
        Ok(DecimalPlaces(places))
    }

    /// Returns the number of fractional digits.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Two places (cents).
impl Default for DecimalPlaces {
    fn default() -> Self {
        DecimalPlaces(2)
    }
}

impl TryFrom<i64> for DecimalPlaces {
    type Error = CoreError;

    fn try_from(places: i64) -> Result<Self, Self::Error> {
        let places = u32::try_from(places).map_err(|_| CoreError::InvalidPrecision {
            places,
            max: Self::MAX,
        })?;
        DecimalPlaces::new(places)
    }
}

impl From<DecimalPlaces> for u32 {
    fn from(places: DecimalPlaces) -> Self {
        places.0
    }
}

impl fmt::Display for DecimalPlaces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Rounding
// =============================================================================

/// Rounds `value` half-up (ties away from zero) to `places` fractional digits.
///
/// The result carries exactly `places` digits, so `10` becomes `10.00`, as
/// long as `value × 10^places` fits the 96-bit mantissa. Amounts within
/// [`MAX_AMOUNT`](crate::validation::MAX_AMOUNT) always fit at
/// [`DecimalPlaces::MAX`]; beyond that `rescale` keeps the largest scale that
/// fits.
///
/// ## Example
/// ```rust
/// use invoicer_core::money::{quantize, DecimalPlaces};
/// use rust_decimal::Decimal;
///
/// let places = DecimalPlaces::default();
/// assert_eq!(quantize(Decimal::new(2345, 3), places).to_string(), "2.35");
/// assert_eq!(quantize(Decimal::new(-2345, 3), places).to_string(), "-2.35");
/// assert_eq!(quantize(Decimal::from(10), places).to_string(), "10.00");
/// ```
pub fn quantize(value: Decimal, places: DecimalPlaces) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(places.get(), RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places.get());
    rounded
}

/// Zero carrying `places` fractional digits.
#[inline]
pub fn zero(places: DecimalPlaces) -> Decimal {
    quantize(Decimal::ZERO, places)
}

// =============================================================================
// Net / Gross Conversion
// =============================================================================

/// Derives `(gross, tax)` from a net amount.
///
/// Only the tax is quantized; the gross inherits the precision of `net` and
/// the quantized tax.
///
/// ## Errors
/// `Overflow` when `net × rate` does not fit the decimal type.
pub fn net_to_gross(
    net: Decimal,
    rate: TaxRate,
    places: DecimalPlaces,
) -> CoreResult<(Decimal, Decimal)> {
    let overflow = || CoreError::Overflow {
        operation: "net to gross conversion",
    };
    let product = net.checked_mul(rate.percent()).ok_or_else(overflow)?;
    let tax = quantize(product / Decimal::ONE_HUNDRED, places);
    let gross = net.checked_add(tax).ok_or_else(overflow)?;
    Ok((gross, tax))
}

/// Derives `(net, tax)` from a gross amount.
///
/// ## Errors
/// - `InvalidTaxRate` when `1 + rate / 100` is zero (rate = -100%)
/// - `Overflow` when the quotient does not fit the decimal type
pub fn gross_to_net(
    gross: Decimal,
    rate: TaxRate,
    places: DecimalPlaces,
) -> CoreResult<(Decimal, Decimal)> {
    let divisor = Decimal::ONE + rate.percent() / Decimal::ONE_HUNDRED;
    if divisor.is_zero() {
        return Err(CoreError::InvalidTaxRate {
            rate: rate.percent(),
        });
    }

    let overflow = || CoreError::Overflow {
        operation: "gross to net conversion",
    };
    let unrounded = gross.checked_div(divisor).ok_or_else(overflow)?;
    let net = quantize(unrounded, places);
    let tax = gross.checked_sub(net).ok_or_else(overflow)?;
    Ok((net, tax))
}

// =============================================================================
// Unit Tests
// =============================================================================
