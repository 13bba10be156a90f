//! Notification sink contract.
//!
//! The ledger routes events here after append/contribute; the interpreter
//! never notifies directly.

use finz_core::Direction;
use serde::{Deserialize, Serialize};

/// Events emitted by ledger recomputation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LedgerEvent {
    TransactionRecorded {
        id: String,
        direction: Direction,
        amount: f64,
        category: String,
    },
    BudgetExceeded {
        category: String,
        spent: f64,
        limit: f64,
    },
    GoalReached {
        name: String,
    },
}

pub trait NotificationSink {
    fn notify(&mut self, event: LedgerEvent);
}

/// In-memory sink; surfaces read the accumulated events to build replies.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<LedgerEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl NotificationSink for MemorySink {
    fn notify(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}
