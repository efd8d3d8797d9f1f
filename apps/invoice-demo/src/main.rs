//! # Invoice Demo
//!
//! Builds an invoice from the sample catalog (or `INVOICER_ITEMS_PATH`) and
//! prints it three ways.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DemoConfig::load() ──► catalog drafts ──► Invoice::add (each draft)    │
//! │                                                  │                      │
//! │                    ┌─────────────────────────────┼──────────────────┐   │
//! │                    ▼                             ▼                  ▼   │
//! │            complete table            filtered table          JSON     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```bash
//! cargo run -p invoice-demo
//! INVOICER_FILTER=household,discount INVOICER_JSON_PRETTY=true cargo run -p invoice-demo
//! RUST_LOG=invoicer_core=trace cargo run -p invoice-demo
//! ```

mod catalog;
mod config;
mod report;

use invoicer_core::{Invoice, ItemTypeFilter};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::DemoConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = DemoConfig::load()?;
    info!(
        decimal_places = %config.decimal_places,
        items_path = ?config.items_path,
        filter = ?config.filter,
        "Starting invoice demo"
    );

    let drafts = match &config.items_path {
        Some(path) => catalog::load_drafts(path)?,
        None => catalog::sample_drafts(),
    };
    info!(count = drafts.len(), "Loaded item drafts");

    let mut invoice = Invoice::with_decimal_places(config.decimal_places);
    for draft in drafts {
        invoice.add(draft.build()?)?;
    }
    info!(
        buckets = invoice.buckets().len(),
        lines = invoice.all_items(None).len(),
        "Invoice built"
    );

    println!("** Complete invoice");
    println!("{}", report::render_table(&invoice, &ItemTypeFilter::All));

    println!("** Invoice filtered by {:?}", config.filter);
    println!("{}", report::render_table(&invoice, &config.filter));

    println!("** Serialized invoice as json");
    println!("{}", invoice.to_json(None, config.json_pretty)?);

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=invoicer_core=trace` - Show every merge decision
/// - Default: INFO, with engine routing at DEBUG
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,invoicer_core=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
