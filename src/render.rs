//! Report rendering for the terminal

use libreta_config::{Config, CurrencyConfig};
use libreta_core::{period_label, BillingCycle, DailyBucket, MonthlyBucket, Report, Transaction};
use libreta_csv::CsvSummary;
use rust_decimal::Decimal;
use std::fmt::Write;

/// Amount formatter built from the currency settings
pub struct Money<'a> {
    currency: &'a CurrencyConfig,
}

impl<'a> Money<'a> {
    pub fn new(currency: &'a CurrencyConfig) -> Self {
        Self { currency }
    }

    pub fn format(&self, value: Decimal) -> String {
        let amount = libreta_utils::format_amount(
            value,
            self.currency.decimal_places,
            &self.currency.thousands_separator,
            &self.currency.decimal_separator,
        );
        match amount.strip_prefix('-') {
            Some(digits) => format!("-{}{}", self.currency.symbol, digits),
            None => format!("{}{}", self.currency.symbol, amount),
        }
    }
}

/// Render the history report as indented text
pub fn report_text(report: &Report, config: &Config) -> String {
    let money = Money::new(&config.currency);
    let cycle = BillingCycle::new(config.report.cycle_start_day);
    let mut out = String::new();

    if report.is_empty() {
        out.push_str("No hay movimientos registrados.\n");
        return out;
    }

    for month in report.months() {
        write_month(&mut out, month, &cycle, &money);
    }

    let _ = writeln!(
        out,
        "Total: Ingresos {} | Gastos {} | Balance {}",
        money.format(report.total_income()),
        money.format(report.total_expense()),
        money.format(report.balance())
    );
    out
}

fn write_month(out: &mut String, month: &MonthlyBucket, cycle: &BillingCycle, money: &Money) {
    let label = period_label(&month.period_key).unwrap_or_else(|| month.period_key.clone());
    match cycle.period_range(&month.period_key) {
        Some((start, end)) => {
            let _ = writeln!(out, "== {} ({} a {}) ==", label, start, end);
        }
        None => {
            let _ = writeln!(out, "== {} ==", label);
        }
    }
    let _ = writeln!(
        out,
        "Ingresos {} | Gastos {} | Balance {}",
        money.format(month.entries.total_income),
        money.format(month.entries.total_expense),
        money.format(month.entries.balance)
    );

    for day in &month.days {
        write_day(out, day, money);
    }
    out.push('\n');
}

fn write_day(out: &mut String, day: &DailyBucket, money: &Money) {
    let _ = writeln!(out, "  {}  balance {}", day.date, money.format(day.entries.balance));
    for tx in &day.entries.incomes {
        write_transaction(out, "+", tx, money);
    }
    for tx in &day.entries.expenses {
        write_transaction(out, "-", tx, money);
    }
}

fn write_transaction(out: &mut String, sign: &str, tx: &Transaction, money: &Money) {
    match &tx.client_name {
        Some(client) if !client.is_empty() => {
            let _ = writeln!(out, "    {} {} {}", sign, money.format(tx.total), client);
        }
        _ => {
            let _ = writeln!(out, "    {} {}", sign, money.format(tx.total));
        }
    }
    for item in &tx.items {
        let _ = writeln!(
            out,
            "        {} x{} @ {} = {}",
            item.name(),
            item.quantity(),
            money.format(item.price()),
            money.format(item.subtotal())
        );
    }
}

/// Render a CSV summary as two lines of text
pub fn summary_text(summary: &CsvSummary) -> String {
    format!(
        "Average level: {}\nAverage temperature: {}\n",
        summary.level, summary.temperature
    )
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use libreta_core::{aggregate, RawRecord};
    use libreta_csv::Metric;

    fn records(value: serde_json::Value) -> Vec<RawRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_money_format() {
        let currency = CurrencyConfig::default();
        let money = Money::new(&currency);
        let dec = |s: &str| s.parse::<Decimal>().unwrap();
        assert_eq!(money.format(dec("1234.5")), "$1,234.50");
        assert_eq!(money.format(dec("-50")), "-$50.00");
        assert_eq!(money.format(Decimal::ZERO), "$0.00");
        assert_eq!(money.format(dec("-0.001")), "$0.00");
        assert_eq!(money.format(dec("2.675")), "$2.68");
    }

    #[test]
    fn test_report_text_empty() {
        let text = report_text(&Report::default(), &Config::default());
        assert_eq!(text, "No hay movimientos registrados.\n");
    }

    #[test]
    fn test_report_text_lists_periods_and_items() {
        let incomes = records(serde_json::json!([
            {"id": "i1", "date": "2024-03-06", "clientName": "Ana",
             "items": [{"name": "Corte", "price": 15, "quantity": 2}]}
        ]));
        let expenses = records(serde_json::json!([
            {"id": "g1", "date": "2024-03-06", "product": "Ink", "price": 50}
        ]));
        let report = aggregate(&incomes, &expenses).unwrap();
        let text = report_text(&report, &Config::default());

        assert!(text.contains("== Marzo 2024 (2024-03-06 a 2024-04-05) =="));
        assert!(text.contains("Ingresos $30.00 | Gastos $50.00 | Balance -$20.00"));
        assert!(text.contains("    + $30.00 Ana"));
        assert!(text.contains("        Corte x2 @ $15.00 = $30.00"));
        assert!(text.contains("    - $50.00\n"));
    }

    #[test]
    fn test_summary_text() {
        let summary = CsvSummary {
            level: Metric::Value(10.0),
            temperature: Metric::NotAvailable,
        };
        assert_eq!(summary_text(&summary), "Average level: 10\nAverage temperature: N/A\n");
    }
}
