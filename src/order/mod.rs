pub mod normalize;

pub use normalize::{normalize_rows, NormalizeOutcome};

use chrono::NaiveDate;
use serde::Serialize;

/// Product category. The catalog sells chips in pouches and tubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Pouch,
    Tub,
}

impl Category {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pouch" | "pouches" => Some(Category::Pouch),
            "tub" | "tubs" => Some(Category::Tub),
            _ => None,
        }
    }

    /// Plural label used in the product breakdown section.
    pub fn plural(&self) -> &'static str {
        match self {
            Category::Pouch => "Pouches",
            Category::Tub => "Tubs",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Pouch => write!(f, "Pouch"),
            Category::Tub => write!(f, "Tub"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Partial,
}

impl PaymentStatus {
    /// Anything that isn't literally "Paid" or "Partial" is treated as
    /// unpaid, including a blank cell.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "paid" => PaymentStatus::Paid,
            "partial" | "partially paid" => PaymentStatus::Partial,
            _ => PaymentStatus::Unpaid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeliveryStatus {
    Delivered,
    Pending,
    Cancelled,
}

impl DeliveryStatus {
    /// Only the literal "Delivered" counts as delivered; a blank cell is
    /// pending.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "delivered" => DeliveryStatus::Delivered,
            "cancelled" | "canceled" => DeliveryStatus::Cancelled,
            _ => DeliveryStatus::Pending,
        }
    }
}

/// One normalized sale line.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub date: NaiveDate,
    pub customer: String,
    pub category: Category,
    pub flavor: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub payment: PaymentStatus,
    pub delivery: DeliveryStatus,
}

impl Order {
    pub fn revenue(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}
