//! finz-store: per-user transaction ledger, budgets, savings goals and the
//! notification sink the ledger feeds after every recompute.

pub mod budget;
pub mod goal;
pub mod ledger;
pub mod notify;
pub mod stats;

pub use budget::{Budget, BudgetPeriod, BudgetStatus};
pub use goal::Goal;
pub use ledger::{Ledger, LedgerSet, TransactionPatch};
pub use notify::{LedgerEvent, MemorySink, NotificationSink};
pub use stats::{CategoryBreakdown, LedgerStats, MonthBreakdown};
