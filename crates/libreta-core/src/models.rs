//! Core data models for the bookkeeping records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::types::TransactionKind;

/// A single priced line of a transaction.
///
/// `subtotal` is always `quantity * price`; it is recomputed by every
/// setter and cannot be assigned directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    name: String,
    quantity: u32,
    price: Decimal,
    subtotal: Decimal,
}

impl LineItem {
    /// Create a line item. A quantity of 0 is raised to 1.
    pub fn new(name: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        let mut item = Self {
            name: name.into(),
            quantity: quantity.max(1),
            price,
            subtotal: Decimal::ZERO,
        };
        item.recompute();
        item
    }

    /// Item description
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of units, at least 1
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// `quantity * price`
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Change the quantity (0 is raised to 1) and refresh the subtotal
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
        self.recompute();
    }

    /// Change the unit price and refresh the subtotal
    pub fn set_price(&mut self, price: Decimal) {
        self.price = price;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.subtotal = self.price * Decimal::from(self.quantity);
    }
}

/// A normalized income or expense record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// Opaque identifier assigned by the document store
    pub id: String,
    /// Income or expense
    pub kind: TransactionKind,
    /// Date exactly as stored; used as the day key in reports
    pub date: String,
    /// Parsed calendar date
    pub calendar_date: NaiveDate,
    /// Client name (income only)
    pub client_name: Option<String>,
    /// Line items in entry order
    pub items: Vec<LineItem>,
    /// Effective total: the stored total when present, else the sum of subtotals
    pub total: Decimal,
}

impl Transaction {
    /// Sum of the line-item subtotals
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Check whether `total` agrees with the line items
    pub fn has_consistent_total(&self) -> bool {
        self.total == self.items_total()
    }

    /// Check if this is an income record
    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        match &self.client_name {
            Some(client) if !client.is_empty() => format!("{} - {}", self.date, client),
            _ => {
                let names: Vec<&str> = self.items.iter().map(LineItem::name).collect();
                format!("{} - {}", self.date, names.join(", "))
            }
        }
    }
}

// ==================== Tests ====================
