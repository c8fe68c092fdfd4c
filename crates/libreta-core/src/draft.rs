//! Entry drafts
//!
//! An [`EntryDraft`] holds the state of an income or expense entry while
//! it is being filled in or edited. The id of the record being edited is
//! part of the draft itself, so several drafts can be open at once.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::models::{LineItem, Transaction};
use crate::records::parse_record_date;
use crate::types::TransactionKind;

/// A line item being entered
#[derive(Debug, Clone, PartialEq)]
pub struct DraftItem {
    pub name: String,
    quantity: u32,
    price: Option<Decimal>,
}

impl DraftItem {
    fn empty() -> Self {
        Self {
            name: String::new(),
            quantity: 1,
            price: None,
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price, `None` until entered
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// `quantity * price`, counting a missing price as 0
    pub fn subtotal(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO) * Decimal::from(self.quantity)
    }
}

/// Edit session for a single income or expense entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    kind: TransactionKind,
    editing: Option<String>,
    date: String,
    client_name: String,
    items: Vec<DraftItem>,
}

impl EntryDraft {
    /// Start a blank entry with one empty item
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            editing: None,
            date: String::new(),
            client_name: String::new(),
            items: vec![DraftItem::empty()],
        }
    }

    /// Start editing an existing transaction
    pub fn edit(tx: &Transaction) -> Self {
        let mut items: Vec<DraftItem> = tx
            .items
            .iter()
            .map(|item| DraftItem {
                name: item.name().to_string(),
                quantity: item.quantity(),
                price: Some(item.price()),
            })
            .collect();
        if items.is_empty() {
            items.push(DraftItem::empty());
        }

        Self {
            kind: tx.kind,
            editing: Some(tx.id.clone()),
            date: tx.calendar_date.format("%Y-%m-%d").to_string(),
            client_name: tx.client_name.clone().unwrap_or_default(),
            items,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Id of the record being edited, if any
    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn items(&self) -> &[DraftItem] {
        &self.items
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn set_client_name(&mut self, name: impl Into<String>) {
        self.client_name = name.into();
    }

    /// Append an empty item and return its index
    pub fn add_item(&mut self) -> usize {
        self.items.push(DraftItem::empty());
        self.items.len() - 1
    }

    /// Remove an item. The last remaining item is never removed.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if self.items.len() <= 1 || index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    pub fn set_item_name(&mut self, index: usize, name: impl Into<String>) -> CoreResult<()> {
        self.item_mut(index)?.name = name.into();
        Ok(())
    }

    pub fn set_item_quantity(&mut self, index: usize, quantity: u32) -> CoreResult<()> {
        if quantity == 0 {
            return Err(CoreError::ValidationError {
                message: "Quantity must be at least 1".to_string(),
            });
        }
        self.item_mut(index)?.quantity = quantity;
        Ok(())
    }

    pub fn set_item_price(&mut self, index: usize, price: Decimal) -> CoreResult<()> {
        if price < Decimal::ZERO {
            return Err(CoreError::ValidationError {
                message: format!("Price must be a non-negative number, got {}", price),
            });
        }
        self.item_mut(index)?.price = Some(price);
        Ok(())
    }

    /// Sum of the item subtotals
    pub fn total(&self) -> Decimal {
        self.items.iter().map(DraftItem::subtotal).sum()
    }

    /// Check that every required field is filled in.
    ///
    /// Returns the parsed date on success.
    pub fn validate(&self) -> CoreResult<NaiveDate> {
        if self.date.trim().is_empty() {
            return Err(missing("date"));
        }
        if self.kind == TransactionKind::Income && self.client_name.trim().is_empty() {
            return Err(missing("clientName"));
        }
        for (i, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(missing(&format!("items[{}].name", i)));
            }
            if item.price.is_none() {
                return Err(missing(&format!("items[{}].price", i)));
            }
        }

        parse_record_date(self.date.trim()).ok_or_else(|| CoreError::ValidationError {
            message: format!("'{}' is not a valid date", self.date),
        })
    }

    /// Validate and produce the transaction to store
    pub fn submit(self) -> CoreResult<Transaction> {
        let calendar_date = self.validate()?;

        let items: Vec<LineItem> = self
            .items
            .iter()
            .map(|item| LineItem::new(item.name.trim(), item.quantity, item.price.unwrap_or(Decimal::ZERO)))
            .collect();
        let total: Decimal = items.iter().map(LineItem::subtotal).sum();

        let client_name = match self.kind {
            TransactionKind::Income => Some(self.client_name.trim().to_string()),
            TransactionKind::Expense => None,
        };

        let id = self.editing.unwrap_or_else(libreta_utils::generate_id);
        log::debug!("Submitting {} {} dated {}", self.kind, id, calendar_date);

        Ok(Transaction {
            id,
            kind: self.kind,
            date: calendar_date.format("%Y-%m-%d").to_string(),
            calendar_date,
            client_name,
            items,
            total,
        })
    }

    fn item_mut(&mut self, index: usize) -> CoreResult<&mut DraftItem> {
        let count = self.items.len();
        self.items.get_mut(index).ok_or_else(|| CoreError::ValidationError {
            message: format!("No item at position {} (draft has {})", index, count),
        })
    }
}

fn missing(field: &str) -> CoreError {
    CoreError::MissingField {
        field: field.to_string(),
    }
}

// ==================== Tests ====================
