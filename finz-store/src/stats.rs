//! Aggregate statistics recomputed from the transaction list.

use std::collections::BTreeMap;

use finz_core::Transaction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    pub income: f64,
    pub expense: f64,
    /// income - expense
    pub net: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthBreakdown {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerStats {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub transaction_count: usize,
    pub average_income: f64,
    pub average_expense: f64,
    pub by_category: BTreeMap<String, CategoryBreakdown>,
    /// Keyed by `YYYY-MM`
    pub by_month: BTreeMap<String, MonthBreakdown>,
}

impl LedgerStats {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let mut stats = LedgerStats {
            transaction_count: transactions.len(),
            ..Default::default()
        };
        let mut income_count = 0usize;
        let mut expense_count = 0usize;

        for t in transactions {
            let by_cat = stats.by_category.entry(t.category.clone()).or_default();
            let month = t.date.format("%Y-%m").to_string();
            let by_month = stats.by_month.entry(month).or_default();

            if t.is_income() {
                income_count += 1;
                stats.total_income += t.amount;
                by_cat.income += t.amount;
                by_month.income += t.amount;
            } else {
                expense_count += 1;
                stats.total_expense += t.amount;
                by_cat.expense += t.amount;
                by_month.expense += t.amount;
            }
            by_cat.net = by_cat.income - by_cat.expense;
            by_month.balance = by_month.income - by_month.expense;
        }

        stats.balance = stats.total_income - stats.total_expense;
        if income_count > 0 {
            stats.average_income = stats.total_income / income_count as f64;
        }
        if expense_count > 0 {
            stats.average_expense = stats.total_expense / expense_count as f64;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finz_core::Direction;

    fn txn(id: &str, ymd: (i32, u32, u32), amount: f64, direction: Direction, category: &str) -> Transaction {
        Transaction::new(
            id,
            NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap(),
            "desc",
            amount,
            direction,
            category,
            "u1",
        )
    }

    #[test]
    fn test_totals_and_breakdowns() {
        let txns = vec![
            txn("t1", (2026, 3, 1), 800.0, Direction::Income, "renda"),
            txn("t2", (2026, 3, 5), 45.9, Direction::Expense, "alimentação"),
            txn("t3", (2026, 4, 2), 54.1, Direction::Expense, "alimentação"),
        ];
        let stats = LedgerStats::compute(&txns);

        assert_eq!(stats.total_income, 800.0);
        assert_eq!(stats.total_expense, 100.0);
        assert_eq!(stats.balance, 700.0);
        assert_eq!(stats.transaction_count, 3);
        assert_eq!(stats.average_expense, 50.0);

        let food = &stats.by_category["alimentação"];
        assert_eq!(food.expense, 100.0);
        assert_eq!(food.net, -100.0);

        assert_eq!(stats.by_month["2026-03"].balance, 800.0 - 45.9);
        assert_eq!(stats.by_month["2026-04"].expense, 54.1);
    }

    #[test]
    fn test_empty_ledger() {
        let stats = LedgerStats::compute(&[]);
        assert_eq!(stats.balance, 0.0);
        assert_eq!(stats.average_income, 0.0);
        assert!(stats.by_category.is_empty());
    }
}
