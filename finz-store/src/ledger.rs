//! Per-user transaction ledger.
//!
//! Every accepted transaction enters through [`Ledger::append`], which
//! recomputes budget consumption and routes notifications in the same
//! call — there is no bypass path around the recompute step.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use finz_core::{Direction, Transaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::budget::{Budget, BudgetPeriod};
use crate::goal::Goal;
use crate::notify::{LedgerEvent, NotificationSink};
use crate::stats::LedgerStats;

/// Partial update applied by [`Ledger::update`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub direction: Option<Direction>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    owner: String,
    next_id: u64,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    goals: Vec<Goal>,
}

impl Ledger {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            next_id: 0,
            transactions: Vec::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn next_transaction_id(&mut self) -> String {
        self.next_id += 1;
        format!("txn-{:04}", self.next_id)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Append a finalized transaction and recompute budget consumption.
    ///
    /// Emits a recorded event, plus one budget-exceeded event per budget
    /// whose limit this append crosses (crossing fires once; staying over
    /// the limit does not re-fire).
    pub fn append(&mut self, transaction: Transaction, sink: &mut dyn NotificationSink) {
        info!(
            owner = %self.owner,
            id = %transaction.id,
            amount = transaction.amount,
            "transaction recorded"
        );
        sink.notify(LedgerEvent::TransactionRecorded {
            id: transaction.id.clone(),
            direction: transaction.direction,
            amount: transaction.amount,
            category: transaction.category.clone(),
        });

        if transaction.is_expense() {
            for budget in self
                .budgets
                .iter_mut()
                .filter(|b| b.category == transaction.category)
            {
                let before = budget.spent;
                budget.spent += transaction.amount;
                if before <= budget.limit && budget.spent > budget.limit {
                    sink.notify(LedgerEvent::BudgetExceeded {
                        category: budget.category.clone(),
                        spent: budget.spent,
                        limit: budget.limit,
                    });
                }
            }
        }

        self.transactions.push(transaction);
    }

    /// Apply a patch to an existing transaction. Returns `false` when the
    /// id is unknown. Budget consumption is recomputed from scratch since
    /// amount/category/direction may all have moved.
    pub fn update(&mut self, id: &str, patch: TransactionPatch) -> bool {
        let Some(t) = self.transactions.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        if let Some(description) = patch.description {
            t.description = description;
        }
        if let Some(amount) = patch.amount {
            t.amount = amount;
        }
        if let Some(direction) = patch.direction {
            t.direction = direction;
        }
        if let Some(category) = patch.category {
            t.category = category;
        }
        self.recompute_budget_consumption();
        true
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        let removed = self.transactions.len() != before;
        if removed {
            self.recompute_budget_consumption();
        }
        removed
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats::compute(&self.transactions)
    }

    /// Upsert the budget for a category.
    pub fn set_budget(&mut self, category: impl Into<String>, limit: f64, period: BudgetPeriod) {
        let category = category.into();
        if let Some(b) = self.budgets.iter_mut().find(|b| b.category == category) {
            b.limit = limit;
            b.period = period;
        } else {
            self.budgets.push(Budget::new(category, limit, period));
        }
        self.recompute_budget_consumption();
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn add_goal(&mut self, goal: Goal) {
        self.goals.push(goal);
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Contribute to a named goal. Returns `false` when no goal has that
    /// name; emits a goal-reached event on first completion.
    pub fn contribute(&mut self, name: &str, amount: f64, sink: &mut dyn NotificationSink) -> bool {
        let Some(goal) = self.goals.iter_mut().find(|g| g.name == name) else {
            return false;
        };
        if goal.contribute(amount) {
            info!(owner = %self.owner, goal = %goal.name, "savings goal reached");
            sink.notify(LedgerEvent::GoalReached {
                name: goal.name.clone(),
            });
        }
        true
    }

    fn recompute_budget_consumption(&mut self) {
        for b in &mut self.budgets {
            b.spent = 0.0;
        }
        for t in &self.transactions {
            if t.direction != Direction::Expense {
                continue;
            }
            if let Some(b) = self.budgets.iter_mut().find(|b| b.category == t.category) {
                b.spent += t.amount;
            }
        }
    }
}

/// Per-user ledger registry.
///
/// Each ledger sits behind its own mutex, so two surfaces submitting for
/// the same user (web form + chat message) apply their read-modify-write
/// atomically. The interpreter itself stays lock-free.
#[derive(Debug, Default)]
pub struct LedgerSet {
    ledgers: Mutex<HashMap<String, Arc<Mutex<Ledger>>>>,
}

impl LedgerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self, owner: &str) -> Arc<Mutex<Ledger>> {
        let mut map = self
            .ledgers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        map.entry(owner.to_string())
            .or_insert_with(|| {
                debug!(owner, "created ledger");
                Arc::new(Mutex::new(Ledger::new(owner)))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.ledgers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
