//! Plain-text invoice printout.
//!
//! ```text
//! Product                         Tax rate %       Price     Qty         Sum
//! --------------------------------------------------------------------------
//! Egg                                      5       10.50       2       21.00
//! --------------------------------------------------------------------------
//! Total sum                                                            21.00
//! Total tax                                                             1.00
//! Tax rate                                 5                            1.00
//! ```

use invoicer_core::{Invoice, ItemTypeFilter};

/// Renders the items passing `filter` with their totals and per-rate tax.
pub fn render_table<P>(invoice: &Invoice<P>, filter: &ItemTypeFilter) -> String {
    let header = format!(
        "{:<30}{:>12}{:>12}{:>8}{:>12}",
        "Product", "Tax rate %", "Price", "Qty", "Sum"
    );
    let separator = "-".repeat(header.len());

    let mut lines = vec![header, separator.clone()];

    lines.extend(invoice.all_items(filter.clone()).into_iter().map(|item| {
        format!(
            "{:<30}{:>12}{:>12}{:>8}{:>12}",
            item.name(),
            item.tax_rate().to_string(),
            item.gross_amount().to_string(),
            item.quantity(),
            item.gross_sum().to_string()
        )
    }));

    lines.push(separator);
    lines.push(format!(
        "{:<30}{:>44}",
        "Total sum",
        invoice.gross_sum(filter.clone()).to_string()
    ));
    lines.push(format!(
        "{:<30}{:>44}",
        "Total tax",
        invoice.tax_sum(filter.clone()).to_string()
    ));

    lines.extend(invoice.group_by_tax_rate(filter.clone()).into_iter().map(|group| {
        format!(
            "{:<30}{:>12}{:>32}",
            "Tax rate",
            group.tax_rate.normalize().to_string(),
            group.tax_total.to_string()
        )
    }));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
