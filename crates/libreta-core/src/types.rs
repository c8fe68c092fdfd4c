//! Basic types for the core module

use serde::{Deserialize, Serialize};

/// Kind of a bookkeeping transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received from a client ("ingreso")
    Income,
    /// Money spent ("gasto")
    Expense,
}

impl TransactionKind {
    /// Name of the document collection this kind is stored in
    pub fn collection(&self) -> &'static str {
        match self {
            TransactionKind::Income => "ingresos",
            TransactionKind::Expense => "gastos",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}
