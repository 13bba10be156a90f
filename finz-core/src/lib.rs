//! finz-core: the FINZ transaction text interpreter and shared record types.
//!
//! One canonical classification pipeline for every input surface (web form,
//! chat): Brazilian-format amount extraction, keyword direction/category
//! classification, and an explicit ambiguity contract.

pub mod amount;
pub mod category;
pub mod interpreter;
pub mod lexicon;
pub mod transaction;

pub use amount::AmountExtractor;
pub use category::{CategoryRule, CategoryRules, FALLBACK_CATEGORY};
pub use interpreter::{Classification, Interpreter, NO_AMOUNT, ResolvedTransaction};
pub use lexicon::{DirectionHint, DirectionLexicon};
pub use transaction::{Direction, Transaction, format_brl};
