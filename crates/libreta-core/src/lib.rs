//! Core bookkeeping logic
//!
//! Stored income and expense documents are normalized into
//! [`Transaction`]s and folded into a [`Report`] grouped by billing
//! period and day.

pub mod draft;
pub mod error;
pub mod models;
pub mod records;
pub mod reports;
pub mod time;
pub mod types;

pub use draft::{DraftItem, EntryDraft};
pub use error::{CoreError, CoreResult, ErrorSeverity};
pub use models::{LineItem, Transaction};
pub use records::{normalize_all, parse_record_date, parse_records, RawItem, RawRecord};
pub use reports::{DailyBucket, Entries, MonthlyBucket, Report};
pub use time::{period_label, BillingCycle, DEFAULT_CYCLE_START_DAY};
pub use types::TransactionKind;

// ==================== Aggregation ====================

/// Build the history report from stored income and expense records using
/// the default billing cycle.
///
/// Fails on the first record whose date cannot be parsed; no partial
/// report is returned.
pub fn aggregate(incomes: &[RawRecord], expenses: &[RawRecord]) -> CoreResult<Report> {
    aggregate_with_cycle(incomes, expenses, BillingCycle::default())
}

/// Same as [`aggregate`] with an explicit billing cycle
pub fn aggregate_with_cycle(
    incomes: &[RawRecord],
    expenses: &[RawRecord],
    cycle: BillingCycle,
) -> CoreResult<Report> {
    let incomes = normalize_all(incomes, TransactionKind::Income)?;
    let expenses = normalize_all(expenses, TransactionKind::Expense)?;

    Ok(Report::build(&incomes, &expenses, cycle))
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn records(value: serde_json::Value) -> Vec<RawRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_aggregate_empty() {
        let report = aggregate(&[], &[]).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_aggregate_mixed_shapes() {
        let incomes = records(json!([
            {"id": "i1", "date": "2024-03-06", "clientName": "Ana",
             "items": [{"name": "Corte", "price": 15, "quantity": 2}], "total": 30},
            {"id": "i2", "date": "2024-03-05", "clientName": "Luis",
             "products": [{"name": "Tinte", "price": "40"}]}
        ]));
        let expenses = records(json!([
            {"id": "g1", "date": "2024-05-10", "product": "Ink", "price": 50},
            {"id": "g2", "date": "2024-03-06", "items": [{"name": "Champú", "price": 8}]}
        ]));

        let report = aggregate(&incomes, &expenses).unwrap();
        let keys: Vec<&str> = report.months().iter().map(|m| m.period_key.as_str()).collect();
        assert_eq!(keys, vec!["2024-05", "2024-03", "2024-02"]);

        let may = report.month("2024-05").unwrap();
        assert_eq!(may.entries.total_expense, dec("50"));
        assert_eq!(may.entries.balance, dec("-50"));
        assert_eq!(may.entries.expenses[0].items[0].name(), "Ink");

        let march = report.month("2024-03").unwrap();
        assert_eq!(march.entries.total_income, dec("30"));
        assert_eq!(march.entries.total_expense, dec("8"));
        assert_eq!(march.entries.balance, dec("22"));
        assert_eq!(march.days.len(), 1);
        assert_eq!(march.days[0].date, "2024-03-06");

        let february = report.month("2024-02").unwrap();
        assert_eq!(february.entries.total_income, dec("40"));
        assert_eq!(february.entries.incomes[0].client_name.as_deref(), Some("Luis"));

        assert_eq!(report.total_income(), dec("70"));
        assert_eq!(report.total_expense(), dec("58"));
    }

    #[test]
    fn test_aggregate_fails_on_malformed_date() {
        let incomes = records(json!([{"id": "ok", "date": "2024-03-06"}]));
        let expenses = records(json!([{"id": "bad", "date": "not a date", "product": "x"}]));

        match aggregate(&incomes, &expenses) {
            Err(CoreError::MalformedRecord { id, .. }) => assert_eq!(id, "bad"),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_names_record_with_non_string_date() {
        let incomes = parse_records(r#"[{"id":"n","date":20240305,"product":"Ink","price":5}]"#).unwrap();
        match aggregate(&incomes, &[]) {
            Err(CoreError::MalformedRecord { id, date, .. }) => {
                assert_eq!(id, "n");
                assert_eq!(date, "20240305");
            }
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_text_amounts_sum_exactly() {
        let incomes = records(json!([
            {"date": "2024-03-10", "items": [{"name": "a", "price": "0.1"}]},
            {"date": "2024-04-10", "items": [{"name": "b", "price": 0.2}]},
            {"date": "2024-03-11", "items": [{"name": "c", "price": "2.675 €"}]}
        ]));
        let report = aggregate(&incomes, &[]).unwrap();
        assert_eq!(report.total_income(), dec("2.975"));
    }

    #[test]
    fn test_aggregate_with_calendar_cycle() {
        let incomes = records(json!([{"date": "2024-03-05", "product": "x", "price": 1}]));
        let report = aggregate_with_cycle(&incomes, &[], BillingCycle::new(1)).unwrap();
        assert!(report.month("2024-03").is_some());

        let report = aggregate(&incomes, &[]).unwrap();
        assert!(report.month("2024-02").is_some());
    }
}
