//! Transaction record types shared across FINZ surfaces

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Money direction of a transaction.
///
/// Only these two values are ever stored. "Unclear" is a transient
/// classification outcome (see [`crate::interpreter::Classification`]),
/// never a persisted direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl Direction {
    /// Portuguese label used in user-facing replies
    pub fn label_pt(&self) -> &'static str {
        match self {
            Direction::Income => "receita",
            Direction::Expense => "despesa",
        }
    }
}

/// A finalized financial transaction.
///
/// `amount` is always positive; the direction is carried separately.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Unique identifier within one ledger
    pub id: String,
    /// Date of the transaction (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Original free-text description as the user typed it
    pub description: String,
    /// Positive amount in the user's currency
    pub amount: f64,
    pub direction: Direction,
    /// Category label (`alimentação`, `transporte`, ..., `outros`)
    pub category: String,
    /// Owning user
    pub owner: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        direction: Direction,
        category: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            description: description.into(),
            amount,
            direction,
            category: category.into(),
            owner: owner.into(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.direction == Direction::Income
    }

    pub fn is_expense(&self) -> bool {
        self.direction == Direction::Expense
    }

    /// Income positive, expense negative. Used by balance aggregation.
    pub fn signed_amount(&self) -> f64 {
        match self.direction {
            Direction::Income => self.amount,
            Direction::Expense => -self.amount,
        }
    }
}

/// Format an amount the Brazilian way: `1234.5` -> `R$ 1.234,50`.
pub fn format_brl(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let whole = cents / 100;
    let frac = (cents % 100).abs();

    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        let remaining = digits.len() - i;
        grouped.push(c);
        if remaining > 1 && (remaining - 1) % 3 == 0 {
            grouped.push('.');
        }
    }

    let sign = if whole < 0 { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_amount() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let income = Transaction::new("t1", date, "salário", 800.0, Direction::Income, "renda", "u1");
        let expense = Transaction::new("t2", date, "mercado", 40.0, Direction::Expense, "alimentação", "u1");
        assert_eq!(income.signed_amount(), 800.0);
        assert_eq!(expense.signed_amount(), -40.0);
        assert!(income.is_income());
        assert!(expense.is_expense());
    }

    #[test]
    fn test_direction_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Income).unwrap(), "\"income\"");
        assert_eq!(serde_json::to_string(&Direction::Expense).unwrap(), "\"expense\"");
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(40.0), "R$ 40,00");
        assert_eq!(format_brl(45.9), "R$ 45,90");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1234567.0), "R$ 1.234.567,00");
    }
}
