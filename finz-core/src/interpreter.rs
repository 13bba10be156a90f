//! The transaction text interpreter: one canonical pipeline from free text
//! to a classification every input surface shares.
//!
//! Composition: amount extraction, then direction, then category. Ambiguity
//! is a first-class outcome — the interpreter never guesses a direction and
//! holds no conversational state between calls.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::amount::AmountExtractor;
use crate::category::CategoryRules;
use crate::lexicon::{DirectionHint, DirectionLexicon};
use crate::transaction::Direction;

/// `Rejected` reason for input with no usable numeric token.
pub const NO_AMOUNT: &str = "no amount found";

/// A fully classified input, ready for storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTransaction {
    pub amount: f64,
    pub direction: Direction,
    pub category: String,
    pub raw_text: String,
}

/// Interpreter output for one input string.
///
/// Serializes to the wire shape used across the chat-webhook/HTTP boundary:
/// a `status` tag plus camelCase fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Classification {
    /// Ready for storage.
    Resolved(ResolvedTransaction),
    /// Needs a user decision before it may be committed. The suggested
    /// direction is a pre-selected UI default, never auto-committed.
    #[serde(rename_all = "camelCase")]
    Ambiguous {
        amount: f64,
        raw_text: String,
        suggested_direction: Direction,
    },
    /// Unusable input; the caller should prompt for a corrected message.
    Rejected { reason: String },
}

/// The canonical free-text interpreter.
///
/// Pure and synchronous: no I/O, no shared mutable state. Safe to call
/// concurrently from every input surface without coordination.
#[derive(Debug)]
pub struct Interpreter {
    amounts: AmountExtractor,
    lexicon: DirectionLexicon,
    categories: CategoryRules,
}

impl Interpreter {
    pub fn new(lexicon: DirectionLexicon, categories: CategoryRules) -> Result<Self> {
        Ok(Self {
            amounts: AmountExtractor::new()?,
            lexicon,
            categories,
        })
    }

    /// Interpreter with the default Brazilian keyword configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            DirectionLexicon::brazilian_defaults(),
            CategoryRules::brazilian_defaults(),
        )
    }

    /// Classify one input string.
    pub fn interpret(&self, text: &str) -> Classification {
        let Some(amount) = self.amounts.extract(text) else {
            return Classification::Rejected {
                reason: NO_AMOUNT.to_string(),
            };
        };

        match self.lexicon.classify(text) {
            DirectionHint::Income => {
                Classification::Resolved(self.resolve_with_direction(text, amount, Direction::Income))
            }
            DirectionHint::Expense => {
                Classification::Resolved(self.resolve_with_direction(text, amount, Direction::Expense))
            }
            DirectionHint::Unclear => Classification::Ambiguous {
                amount,
                raw_text: text.to_string(),
                // statistically the dominant case in this domain
                suggested_direction: Direction::Expense,
            },
        }
    }

    /// Re-entry point after the user answered a confirmation: the direction
    /// is fixed, only the category classifier runs again.
    pub fn resolve_with_direction(
        &self,
        text: &str,
        amount: f64,
        direction: Direction,
    ) -> ResolvedTransaction {
        ResolvedTransaction {
            amount,
            direction,
            category: self.categories.classify(text),
            raw_text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> Interpreter {
        Interpreter::with_defaults().unwrap()
    }

    #[test]
    fn test_unambiguous_expense() {
        match interpreter().interpret("paguei 50 na conta de luz") {
            Classification::Resolved(r) => {
                assert_eq!(r.amount, 50.0);
                assert_eq!(r.direction, Direction::Expense);
                assert_eq!(r.category, "contas");
            }
            other => panic!("expected resolved, got {other:?}"),
        }
    }

    #[test]
    fn test_unambiguous_income() {
        match interpreter().interpret("recebi 800 do salário") {
            Classification::Resolved(r) => {
                assert_eq!(r.amount, 800.0);
                assert_eq!(r.direction, Direction::Income);
                assert_eq!(r.category, "renda");
            }
            other => panic!("expected resolved, got {other:?}"),
        }
    }

    #[test]
    fn test_no_amount_rejected() {
        assert_eq!(
            interpreter().interpret("gastei no mercado"),
            Classification::Rejected { reason: NO_AMOUNT.to_string() }
        );
    }

    #[test]
    fn test_mixed_keywords_stay_ambiguous() {
        match interpreter().interpret("paguei 50 que tinha recebido") {
            Classification::Ambiguous { amount, suggested_direction, .. } => {
                assert_eq!(amount, 50.0);
                assert_eq!(suggested_direction, Direction::Expense);
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_no_direction_keyword_is_ambiguous() {
        match interpreter().interpret("40 no cinema") {
            Classification::Ambiguous { amount, raw_text, .. } => {
                assert_eq!(amount, 40.0);
                assert_eq!(raw_text, "40 no cinema");
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_category_fallback() {
        match interpreter().interpret("gastei 10 numa coisa qualquer") {
            Classification::Resolved(r) => assert_eq!(r.category, "outros"),
            other => panic!("expected resolved, got {other:?}"),
        }
    }

    #[test]
    fn test_idempotent() {
        let it = interpreter();
        assert_eq!(it.interpret("gastei 45,90 em comida"), it.interpret("gastei 45,90 em comida"));
    }

    #[test]
    fn test_resolve_with_direction_runs_categories() {
        let r = interpreter().resolve_with_direction("40 no cinema", 40.0, Direction::Expense);
        assert_eq!(r.direction, Direction::Expense);
        assert_eq!(r.category, "lazer");
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(
            interpreter().interpret("gastei 45,90 em comida"),
        )
        .unwrap();
        assert_eq!(json["status"], "resolved");
        assert_eq!(json["amount"], 45.9);
        assert_eq!(json["direction"], "expense");
        assert_eq!(json["category"], "alimentação");

        let json = serde_json::to_value(interpreter().interpret("40 no cinema")).unwrap();
        assert_eq!(json["status"], "ambiguous");
        assert_eq!(json["rawText"], "40 no cinema");

        let json = serde_json::to_value(interpreter().interpret("sem valor")).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"], NO_AMOUNT);
    }
}
