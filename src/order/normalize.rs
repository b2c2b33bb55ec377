use std::sync::LazyLock;

use regex::Regex;

use crate::date_util::parse_flexible_date;
use crate::order::{Category, DeliveryStatus, Order, PaymentStatus};
use crate::source::RawRow;

/// First run of digits with optional separators inside a price cell.
/// Cells arrive as "₱1,250.00", "1250", "PHP 1,250" and similar.
static RE_NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9][0-9.,]*").unwrap());

/// Result of normalizing a batch of raw rows.
#[derive(Debug, Clone)]
pub struct NormalizeOutcome {
    pub orders: Vec<Order>,
    /// Rows skipped for a missing required field, unparseable date, or
    /// non-numeric/negative quantity or price.
    pub discarded: usize,
}

/// Convert raw spreadsheet rows into typed orders, in input order.
///
/// Never fails: a malformed row is dropped and counted, and normalization
/// continues with the next row. Parse failures are logged at debug level
/// only — they are routine in a hand-maintained sheet.
pub fn normalize_rows(rows: &[RawRow]) -> NormalizeOutcome {
    let mut orders = Vec::with_capacity(rows.len());
    let mut discarded = 0;

    for (i, row) in rows.iter().enumerate() {
        match normalize_row(row) {
            Some(order) => orders.push(order),
            None => {
                log::debug!("Skipping malformed row {}", i + 1);
                discarded += 1;
            }
        }
    }

    NormalizeOutcome { orders, discarded }
}

fn normalize_row(row: &RawRow) -> Option<Order> {
    let date = parse_flexible_date(field(row, "Order Date")?)?;
    let customer = field(row, "Customer")?.trim().to_string();
    if customer.is_empty() {
        return None;
    }
    let category = Category::parse(field(row, "Category")?)?;
    let flavor = field(row, "Flavor")?.trim().to_string();
    if flavor.is_empty() {
        return None;
    }

    let quantity = parse_quantity(field(row, "Quantity")?)?;
    let unit_price = parse_price(field(row, "Unit Price")?)?;

    // Status columns are optional; missing means unpaid/pending.
    let payment = PaymentStatus::parse(field(row, "Payment Status").unwrap_or(""));
    let delivery = DeliveryStatus::parse(field(row, "Delivery Status").unwrap_or(""));

    Some(Order {
        date,
        customer,
        category,
        flavor,
        quantity,
        unit_price,
        payment,
        delivery,
    })
}

fn field<'a>(row: &'a RawRow, name: &str) -> Option<&'a str> {
    row.get(name).map(String::as_str)
}

/// A quantity cell must be a non-negative integer. A leading minus sign
/// fails the parse, which is what rejects negative quantities.
fn parse_quantity(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok()
}

/// Extract a numeric price from a cell that may carry a currency symbol
/// and thousands separators.
fn parse_price(s: &str) -> Option<f64> {
    let m = RE_NUMERIC.find(s)?;
    let cleaned = m.as_str().replace(',', "");
    cleaned.parse::<f64>().ok().filter(|p| *p >= 0.0)
}
