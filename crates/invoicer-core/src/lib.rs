//! # invoicer-core: Invoice Aggregation Engine
//!
//! Builds invoices out of line items, keeps every amount at a fixed decimal
//! precision, groups lines by tax rate, and produces totals and serializable
//! summaries. The crate does no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Invoicer Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Embedders (invoice-demo, POS, billing jobs)           │   │
//! │  │      ItemDraft ──► Invoice::add ──► totals / serialize          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ invoicer-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   item    │  │  bucket   │  │  invoice  │  │   │
//! │  │   │ quantize  │  │ InvoiceIt │  │ per tax   │  │ add/merge │  │   │
//! │  │   │ net↔gross │  │ ItemDraft │  │   rate    │  │ queries   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   summary records ──► serde / JSON / TypeScript bindings        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Decimal precision, half-up quantization, net/gross conversion
//! - [`types`] - `TaxRate` and `ItemTypeFilter`
//! - [`item`] - Invoice lines and their builder
//! - [`bucket`] - Items sharing one tax rate
//! - [`invoice`] - The aggregate: add/merge, filters, totals, grouping
//! - [`summary`] - Serializable records
//! - [`error`] - Domain error types
//! - [`validation`] - Input shape checks
//!
//! ## Design Principles
//!
//! 1. **Decimal Money**: amounts are `rust_decimal::Decimal`, never floats
//! 2. **Quantize Every Step**: each derived amount is rounded half-up right away
//! 3. **Explicit Errors**: invalid input is a typed [`CoreError`], never a panic
//!
//! ## Example Usage
//!
//! ```rust
//! use invoicer_core::{Invoice, ItemDraft};
//! use rust_decimal::Decimal;
//!
//! let mut invoice = Invoice::new();
//! invoice.add(
//!     ItemDraft::new("Mop", "household")
//!         .with_tax_rate(Decimal::from(15))
//!         .with_gross_amount(Decimal::new(1150, 2))
//!         .build()?,
//! )?;
//!
//! assert_eq!(invoice.net_sum(None).to_string(), "10.00");
//! assert_eq!(invoice.tax_sum("household").to_string(), "1.50");
//! # Ok::<(), invoicer_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bucket;
pub mod error;
pub mod invoice;
pub mod item;
pub mod money;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bucket::TaxRateBucket;
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::Invoice;
pub use item::{InvoiceItem, ItemDraft};
pub use money::DecimalPlaces;
pub use summary::{InvoiceSummary, ItemSummary, SummaryTotals, TaxRateGroup};
pub use types::{ItemTypeFilter, TaxRate};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line, in either sign
///
/// Also applies after merging, so repeated adds cannot grow a line past it.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Maximum number of lines in one invoice
pub const MAX_INVOICE_LINES: usize = 10_000;
