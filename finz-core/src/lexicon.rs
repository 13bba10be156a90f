//! Direction classification: does the text describe money coming in or
//! going out?
//!
//! Deliberately non-guessing: when both keyword sets match, or neither
//! does, the result is `Unclear` and the caller must ask the user. A wrong
//! automatic direction silently corrupts financial totals.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Outcome of direction classification. `Unclear` is transient and never
/// stored; see [`crate::transaction::Direction`] for the persisted type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionHint {
    Income,
    Expense,
    Unclear,
}

/// The two keyword sets, matched case-insensitively as substrings of the
/// lowercased input. Treated as configuration data: build your own with
/// [`DirectionLexicon::new`] or start from the Brazilian defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionLexicon {
    income: Vec<String>,
    expense: Vec<String>,
}

impl DirectionLexicon {
    pub fn new(
        income: impl IntoIterator<Item = impl Into<String>>,
        expense: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let income: Vec<String> = income.into_iter().map(|k| k.into().to_lowercase()).collect();
        let expense: Vec<String> = expense.into_iter().map(|k| k.into().to_lowercase()).collect();
        if income.is_empty() || expense.is_empty() {
            bail!("direction lexicon needs keywords on both sides");
        }
        Ok(Self { income, expense })
    }

    /// Default Brazilian-Portuguese marker sets.
    ///
    /// "pagamento" is deliberately in both: it cuts both ways in pt-BR
    /// ("pagamento recebido" vs "fiz um pagamento") and must surface as
    /// `Unclear` on its own.
    pub fn brazilian_defaults() -> Self {
        let income = [
            "recebi", "recebido", "ganho", "ganhei", "salário", "salario",
            "pagamento", "renda", "lucro", "venda", "vendido", "entrada",
            "crédito", "credito", "deposito", "depósito", "transferência recebida",
        ];
        let expense = [
            "paguei", "pago", "gastei", "gasto", "comprei", "compra",
            "conta", "fatura", "débito", "debito", "despesa", "saída",
            "pagamento", "boleto", "aluguel", "luz", "água", "internet",
            "mercado", "supermercado", "restaurante", "combustível",
        ];
        Self {
            income: income.iter().map(|k| k.to_string()).collect(),
            expense: expense.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Classify the direction of `text`.
    ///
    /// Exactly one set matching wins; a conflict or no match at all is
    /// `Unclear`.
    pub fn classify(&self, text: &str) -> DirectionHint {
        let lower = text.to_lowercase();
        let income = self.income.iter().any(|k| lower.contains(k.as_str()));
        let expense = self.expense.iter().any(|k| lower.contains(k.as_str()));
        match (income, expense) {
            (true, false) => DirectionHint::Income,
            (false, true) => DirectionHint::Expense,
            _ => DirectionHint::Unclear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unambiguous_expense() {
        let lex = DirectionLexicon::brazilian_defaults();
        assert_eq!(lex.classify("gastei 40 no cinema hoje"), DirectionHint::Expense);
        assert_eq!(lex.classify("PAGUEI a fatura"), DirectionHint::Expense);
    }

    #[test]
    fn test_unambiguous_income() {
        let lex = DirectionLexicon::brazilian_defaults();
        assert_eq!(lex.classify("recebi 800 do cliente"), DirectionHint::Income);
        assert_eq!(lex.classify("caiu o salário"), DirectionHint::Income);
    }

    #[test]
    fn test_conflict_is_unclear() {
        let lex = DirectionLexicon::brazilian_defaults();
        // "paguei" (expense) and "recebi" (income) in one sentence
        assert_eq!(
            lex.classify("paguei 50 e recebi 30 de troco"),
            DirectionHint::Unclear
        );
        // "pagamento" alone sits in both sets
        assert_eq!(lex.classify("pagamento de 100"), DirectionHint::Unclear);
    }

    #[test]
    fn test_no_keyword_is_unclear() {
        let lex = DirectionLexicon::brazilian_defaults();
        assert_eq!(lex.classify("40 no cinema"), DirectionHint::Unclear);
    }

    #[test]
    fn test_empty_side_rejected() {
        let none: Vec<String> = vec![];
        assert!(DirectionLexicon::new(none, ["paguei"]).is_err());
    }
}
