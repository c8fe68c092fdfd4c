//! History report structures
//!
//! A [`Report`] groups income and expense transactions by billing period
//! and, inside each period, by day. Both levels are sorted most recent
//! first. Amounts are summed as decimals, so the period totals add up to
//! exactly the sum of the transaction totals.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Transaction;
use crate::time::BillingCycle;
use crate::types::TransactionKind;

/// Transactions of a bucket split by kind, with their totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entries {
    pub incomes: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// `total_income - total_expense`
    pub balance: Decimal,
}

impl Entries {
    fn record(&mut self, kind: TransactionKind, tx: &Transaction) {
        match kind {
            TransactionKind::Income => {
                self.incomes.push(tx.clone());
                self.total_income += tx.total;
            }
            TransactionKind::Expense => {
                self.expenses.push(tx.clone());
                self.total_expense += tx.total;
            }
        }
    }

    fn close(&mut self) {
        self.balance = self.total_income - self.total_expense;
    }

    /// Number of transactions in the bucket
    pub fn transaction_count(&self) -> usize {
        self.incomes.len() + self.expenses.len()
    }
}

/// Transactions of a single day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBucket {
    /// Day key (the stored date literal)
    pub date: String,
    #[serde(flatten)]
    pub entries: Entries,
}

/// Transactions of a billing period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    /// `"YYYY-MM"` key of the period
    pub period_key: String,
    #[serde(flatten)]
    pub entries: Entries,
    /// Days of the period, most recent first
    pub days: Vec<DailyBucket>,
}

impl MonthlyBucket {
    /// Look up a day by its key
    pub fn day(&self, date: &str) -> Option<&DailyBucket> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Number of transactions in the period
    pub fn transaction_count(&self) -> usize {
        self.entries.transaction_count()
    }
}

/// Period totals while folding, with its days still keyed
#[derive(Default)]
struct PeriodAccumulator {
    entries: Entries,
    days: BTreeMap<String, Entries>,
}

/// History report, most recent period first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    months: Vec<MonthlyBucket>,
}

impl Report {
    /// Build a report from canonical transactions.
    ///
    /// Every transaction in `incomes` is counted as income and every one in
    /// `expenses` as expense, keeping input order inside each bucket.
    /// Balances are computed in a final pass from the accumulated totals.
    pub fn build(incomes: &[Transaction], expenses: &[Transaction], cycle: BillingCycle) -> Self {
        let mut periods: BTreeMap<String, PeriodAccumulator> = BTreeMap::new();

        let tagged = incomes
            .iter()
            .map(|tx| (TransactionKind::Income, tx))
            .chain(expenses.iter().map(|tx| (TransactionKind::Expense, tx)));

        for (kind, tx) in tagged {
            let period = periods.entry(cycle.period_key(tx.calendar_date)).or_default();
            period.entries.record(kind, tx);
            period.days.entry(tx.date.clone()).or_default().record(kind, tx);
        }

        let months: Vec<MonthlyBucket> = periods
            .into_iter()
            .rev()
            .map(|(period_key, mut period)| {
                period.entries.close();
                let days = period
                    .days
                    .into_iter()
                    .rev()
                    .map(|(date, mut entries)| {
                        entries.close();
                        DailyBucket { date, entries }
                    })
                    .collect();
                MonthlyBucket {
                    period_key,
                    entries: period.entries,
                    days,
                }
            })
            .collect();

        log::debug!(
            "Aggregated {} incomes and {} expenses into {} periods",
            incomes.len(),
            expenses.len(),
            months.len()
        );

        Self { months }
    }

    /// Periods, most recent first
    pub fn months(&self) -> &[MonthlyBucket] {
        &self.months
    }

    pub fn into_months(self) -> Vec<MonthlyBucket> {
        self.months
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Look up a period by its key
    pub fn month(&self, period_key: &str) -> Option<&MonthlyBucket> {
        self.months.iter().find(|m| m.period_key == period_key)
    }

    /// Income over all periods
    pub fn total_income(&self) -> Decimal {
        self.months.iter().map(|m| m.entries.total_income).sum()
    }

    /// Expense over all periods
    pub fn total_expense(&self) -> Decimal {
        self.months.iter().map(|m| m.entries.total_expense).sum()
    }

    pub fn balance(&self) -> Decimal {
        self.total_income() - self.total_expense()
    }

    /// Number of transactions in the report
    pub fn transaction_count(&self) -> usize {
        self.months.iter().map(MonthlyBucket::transaction_count).sum()
    }
}

// ==================== Tests ====================
