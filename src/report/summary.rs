use std::collections::BTreeSet;

use serde::Serialize;

use crate::order::{Category, DeliveryStatus, Order, PaymentStatus};
use crate::report::period::ReportPeriod;

/// Units sold for one (category, flavor) pair. Kept in first-seen order so
/// the report breakdown mirrors the sheet, not the alphabet.
#[derive(Debug, Clone, Serialize)]
pub struct ProductLine {
    pub category: Category,
    pub flavor: String,
    pub units: u32,
}

/// Aggregated figures over a date predicate. Immutable once computed; a new
/// period always yields a new summary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SalesSummary {
    pub total_revenue: f64,
    /// Revenue from orders marked Paid. Partial payments count as unpaid —
    /// the money is not in hand yet.
    pub paid_revenue: f64,
    pub unpaid_revenue: f64,
    pub order_count: usize,
    pub customer_count: usize,
    /// Distinct customer names, sorted. The report enumerates these.
    pub customers: Vec<String>,
    pub paid_customers: Vec<String>,
    pub unpaid_customers: Vec<String>,
    /// Customers with at least one order not yet delivered (cancelled
    /// orders don't count as awaiting delivery).
    pub undelivered_customers: Vec<String>,
    pub products: Vec<ProductLine>,
}

impl SalesSummary {
    /// Single-pass aggregation of `orders` matching `period`.
    ///
    /// An empty match yields a zero-valued summary, not an error; the
    /// formatter renders it as a no-sales report.
    pub fn aggregate(orders: &[Order], period: &ReportPeriod) -> SalesSummary {
        let mut summary = SalesSummary::default();
        let mut customers = BTreeSet::new();
        let mut paid = BTreeSet::new();
        let mut unpaid = BTreeSet::new();
        let mut undelivered = BTreeSet::new();

        for order in orders.iter().filter(|o| period.contains(o.date)) {
            summary.order_count += 1;
            let revenue = order.revenue();
            summary.total_revenue += revenue;

            match order.payment {
                PaymentStatus::Paid => {
                    summary.paid_revenue += revenue;
                    paid.insert(order.customer.clone());
                }
                PaymentStatus::Unpaid | PaymentStatus::Partial => {
                    summary.unpaid_revenue += revenue;
                    unpaid.insert(order.customer.clone());
                }
            }

            if order.delivery == DeliveryStatus::Pending {
                undelivered.insert(order.customer.clone());
            }

            customers.insert(order.customer.clone());
            summary.add_units(order.category, &order.flavor, order.quantity);
        }

        summary.customer_count = customers.len();
        summary.customers = customers.into_iter().collect();
        summary.paid_customers = paid.into_iter().collect();
        summary.unpaid_customers = unpaid.into_iter().collect();
        summary.undelivered_customers = undelivered.into_iter().collect();
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Total units for one category across flavors.
    pub fn units_for(&self, category: Category) -> u32 {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .map(|p| p.units)
            .sum()
    }

    fn add_units(&mut self, category: Category, flavor: &str, quantity: u32) {
        if let Some(line) = self
            .products
            .iter_mut()
            .find(|p| p.category == category && p.flavor == flavor)
        {
            line.units += quantity;
        } else {
            self.products.push(ProductLine {
                category,
                flavor: flavor.to_string(),
                units: quantity,
            });
        }
    }
}
