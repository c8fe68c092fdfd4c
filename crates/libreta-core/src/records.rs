//! Stored record shapes and their normalization
//!
//! Documents in the store come in more than one shape: current records
//! carry an `items` (or `products`) list, older expense records carry a
//! single flat `product`/`price` pair, prices may have been saved as text,
//! and `total` may be absent. Everything is converted once, here, into
//! the canonical [`Transaction`] before any report is built.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::models::{LineItem, Transaction};
use crate::types::TransactionKind;

/// A line item as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
}

/// A transaction document as stored.
///
/// Scalar fields are kept as raw JSON so that one badly typed document
/// is reported on its own instead of failing the whole export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub client_name: Option<Value>,
    #[serde(default, alias = "products")]
    pub items: Option<Vec<RawItem>>,
    /// Legacy flat shape: product name
    #[serde(default)]
    pub product: Option<Value>,
    /// Legacy flat shape: price
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub total: Option<Value>,
}

impl RawRecord {
    /// Whether the record uses the legacy flat `product`/`price` shape
    pub fn is_legacy(&self) -> bool {
        self.items.is_none()
    }

    /// Record id as text, empty when absent
    pub fn id_text(&self) -> String {
        self.id.as_ref().and_then(value_text).unwrap_or_default()
    }

    /// Convert into the canonical transaction shape.
    ///
    /// Fails with `MalformedRecord` when the date is missing, is not a
    /// string, or is not a calendar date. Everything else falls back to
    /// defaults.
    pub fn normalize(&self, kind: TransactionKind) -> CoreResult<Transaction> {
        let id = self.id_text();

        let date = match &self.date {
            Some(Value::String(date)) => date.clone(),
            None | Some(Value::Null) => {
                return Err(CoreError::MalformedRecord {
                    id,
                    date: String::new(),
                    reason: "is missing".to_string(),
                })
            }
            Some(other) => {
                return Err(CoreError::MalformedRecord {
                    id,
                    date: other.to_string(),
                    reason: "is not a date string".to_string(),
                })
            }
        };

        let calendar_date = parse_record_date(&date).ok_or_else(|| CoreError::MalformedRecord {
            id: id.clone(),
            date: date.clone(),
            reason: "is not a calendar date".to_string(),
        })?;

        let items: Vec<LineItem> = match &self.items {
            Some(items) => items.iter().map(|item| item.to_line_item(&id)).collect(),
            None => vec![LineItem::new(
                self.product.as_ref().and_then(value_text).unwrap_or_default(),
                1,
                price_or_zero(self.price.as_ref(), &id),
            )],
        };

        let items_total: Decimal = items.iter().map(LineItem::subtotal).sum();
        let stored_total = match &self.total {
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            _ => None,
        };
        let total = match stored_total {
            Some(stored) => {
                if stored != items_total {
                    log::warn!(
                        "Record {} ({}) stores total {} but its items add up to {}; using the stored total",
                        id, date, stored, items_total
                    );
                }
                stored
            }
            None => items_total,
        };

        let client_name = match kind {
            TransactionKind::Income => self.client_name.as_ref().and_then(value_text),
            TransactionKind::Expense => None,
        };

        Ok(Transaction {
            id,
            kind,
            date,
            calendar_date,
            client_name,
            items,
            total,
        })
    }
}

impl RawItem {
    fn to_line_item(&self, record_id: &str) -> LineItem {
        let quantity = match &self.quantity {
            None => 1,
            Some(value) => read_quantity(value).unwrap_or_else(|| {
                log::warn!(
                    "Record {}: quantity {} is not a whole number of units, counting 1",
                    record_id, value
                );
                1
            }),
        };
        let price = price_or_zero(self.price.as_ref(), record_id);

        LineItem::new(self.name.as_ref().and_then(value_text).unwrap_or_default(), quantity, price)
    }
}

/// Text of a string or number value
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_decimal(literal: &str) -> Option<Decimal> {
    literal
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(literal).ok())
}

/// Read an amount stored as a JSON number or as text.
///
/// Text is read the way the entry forms summed it: the number at the
/// start counts and anything after it (a currency sign, a unit) is
/// ignored.
fn read_amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => {
            let text = s.trim();
            if let Some(amount) = parse_decimal(text) {
                return Some(amount);
            }
            let amount = libreta_utils::leading_number(text).and_then(|literal| parse_decimal(&literal))?;
            log::debug!("Reading amount {:?} as {}", s, amount);
            Some(amount)
        }
        _ => None,
    }
}

/// Price of an item; absent counts as 0, unreadable counts as 0 with a warning
fn price_or_zero(value: Option<&Value>, record_id: &str) -> Decimal {
    let Some(value) = value else {
        return Decimal::ZERO;
    };
    if value.is_null() {
        return Decimal::ZERO;
    }
    read_amount(value).unwrap_or_else(|| {
        log::warn!("Record {}: price {} is not a number, counting 0", record_id, value);
        Decimal::ZERO
    })
}

/// Whole number of units; 0 counts as 1, fractions and negatives are rejected
fn read_quantity(value: &Value) -> Option<u32> {
    if value.is_null() {
        return Some(1);
    }
    let quantity = read_amount(value)?;
    if quantity.is_zero() {
        return Some(1);
    }
    if quantity.is_sign_negative() || !quantity.fract().is_zero() {
        return None;
    }
    quantity.to_u32()
}

/// Parse a stored date literal.
///
/// Accepts `YYYY-MM-DD` and ISO-8601 datetimes; for datetimes the calendar
/// date as written is used.
pub fn parse_record_date(literal: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(literal, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(literal) {
        return Some(datetime.date_naive());
    }
    NaiveDateTime::parse_from_str(literal, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Decode a JSON export of records.
///
/// An export is either a list of documents or an object mapping document
/// ids to documents; in the latter case the key fills in a missing `id`.
pub fn parse_records(json: &str) -> CoreResult<Vec<RawRecord>> {
    let export: Value = serde_json::from_str(json)?;

    if export.is_array() {
        return Ok(serde_json::from_value(export)?);
    }

    if export.is_object() {
        let keyed: BTreeMap<String, RawRecord> = serde_json::from_value(export)?;
        let records = keyed
            .into_iter()
            .map(|(key, mut record)| {
                if record.id.is_none() {
                    record.id = Some(Value::String(key));
                }
                record
            })
            .collect();
        return Ok(records);
    }

    Err(CoreError::InvalidFormat {
        message: format!("expected a list of records or a map of id to record, found {}", export),
    })
}

/// Normalize every record of one kind, failing on the first malformed one
pub fn normalize_all(records: &[RawRecord], kind: TransactionKind) -> CoreResult<Vec<Transaction>> {
    records.iter().map(|record| record.normalize(kind)).collect()
}

// ==================== Tests ====================
