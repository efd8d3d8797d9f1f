//! # Error Types
//!
//! Domain-specific error types for invoicer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  invoicer-core errors (this file)                                      │
//! │  ├── CoreError        - Arithmetic and construction failures           │
//! │  └── ValidationError  - Input shape and range failures                 │
//! │                                                                         │
//! │  invoice-demo errors (app)                                             │
//! │  └── ConfigError      - Environment configuration failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item name, rate, places)
//! 3. Errors are enum variants, never String
//! 4. Every error is returned to the caller at the offending call; the engine
//!    never retries, recovers, or logs them

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core invoice engine errors.
///
/// All of these are programmer/input errors surfaced synchronously by the
/// constructor or setter that received the bad value.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested decimal precision cannot be represented.
    ///
    /// ## When This Occurs
    /// - Negative number of decimal places (from config or JSON input)
    /// - More places than the decimal type can hold (28)
    #[error("Invalid decimal precision {places}: must be between 0 and {max}")]
    InvalidPrecision { places: i64, max: u32 },

    /// Tax rate makes the gross-to-net divisor zero.
    ///
    /// ## When This Occurs
    /// A gross amount is set on an item whose tax rate is -100%:
    /// ```text
    /// net = gross / (1 + rate / 100)
    ///                └─────┬─────┘
    ///             rate = -100 → 0
    /// ```
    #[error("Invalid tax rate {rate}%: gross amount cannot be converted to net")]
    InvalidTaxRate { rate: Decimal },

    /// Item cannot be priced from the supplied inputs.
    ///
    /// ## When This Occurs
    /// - Neither net nor gross amount supplied
    /// - Both net and gross amount supplied
    #[error("Invalid invoice item '{name}': {reason}")]
    InvalidConstruction { name: String, reason: String },

    /// Decimal arithmetic left the representable range.
    ///
    /// ## When This Occurs
    /// A tax rate so large that `net × rate` or `gross / (1 + rate / 100)`
    /// cannot be represented.
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },

    /// Invoice already holds the maximum number of lines.
    #[error("Invoice cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// JSON rendering of a summary failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when item input doesn't meet shape requirements.
/// Checked before any arithmetic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value outside `-limit..=limit`.
    #[error("{field} must be between -{limit} and {limit}")]
    OutOfRange { field: String, limit: Decimal },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
