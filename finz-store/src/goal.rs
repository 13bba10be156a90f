//! Savings goals with single-fire completion detection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,
}

impl Goal {
    pub fn new(name: impl Into<String>, target_amount: f64, deadline: NaiveDate) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// Add a contribution. Returns `true` only on the call that first
    /// crosses the target, so a completion notification fires exactly once.
    pub fn contribute(&mut self, amount: f64) -> bool {
        let was_completed = self.is_completed();
        self.current_amount += amount;
        !was_completed && self.is_completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_fires_once() {
        let deadline = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let mut g = Goal::new("reserva", 100.0, deadline);
        assert!(!g.contribute(60.0));
        assert!(g.contribute(50.0));
        assert!(g.is_completed());
        // already completed: further contributions do not re-fire
        assert!(!g.contribute(10.0));
    }
}
