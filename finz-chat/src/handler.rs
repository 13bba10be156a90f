//! The chat message handler: one incoming message in, one pt-BR reply out.
//!
//! Drives the interpreter's confirmation round-trip against the session's
//! pending slot and appends resolved transactions to the user's ledger.

use chrono::NaiveDate;
use finz_core::{Classification, Direction, Interpreter, ResolvedTransaction, Transaction, format_brl};
use finz_store::{Ledger, LedgerEvent, MemorySink};
use tracing::debug;

use crate::session::{ChatSession, PendingConfirmation, Speaker};

pub struct MessageHandler {
    interpreter: Interpreter,
}

impl MessageHandler {
    pub fn new(interpreter: Interpreter) -> Self {
        Self { interpreter }
    }

    /// Process one incoming message and return the reply text.
    ///
    /// `today` is the transaction date in the user's timezone; the handler
    /// itself never looks at the clock.
    pub fn handle(
        &self,
        session: &mut ChatSession,
        ledger: &mut Ledger,
        sink: &mut MemorySink,
        text: &str,
        today: NaiveDate,
    ) -> String {
        let trimmed = text.trim();
        let first_contact = session.is_first_contact();
        session.push_turn(Speaker::User, trimmed);

        let reply = if trimmed.is_empty() {
            "Envie uma mensagem como \"gastei 45,90 em comida\".".to_string()
        } else if let Some(pending) = session.take_pending() {
            match parse_confirmation(trimmed) {
                Some(direction) => {
                    let draft =
                        self.interpreter
                            .resolve_with_direction(&pending.raw_text, pending.amount, direction);
                    self.record(ledger, sink, draft, today)
                }
                None => {
                    debug!(answer = trimmed, "unrecognized confirmation answer");
                    session.set_pending(pending);
                    "Não entendi. Responda 1 para receita ou 2 para despesa.".to_string()
                }
            }
        } else if is_greeting(trimmed) {
            welcome().to_string()
        } else {
            match self.interpreter.interpret(trimmed) {
                Classification::Resolved(draft) => self.record(ledger, sink, draft, today),
                Classification::Ambiguous {
                    amount,
                    raw_text,
                    suggested_direction,
                } => {
                    session.set_pending(PendingConfirmation {
                        raw_text,
                        amount,
                    });
                    ambiguity_prompt(amount, suggested_direction)
                }
                Classification::Rejected { .. } => {
                    if first_contact {
                        welcome().to_string()
                    } else {
                        "Não consegui identificar um valor válido. Por favor, inclua um número na descrição.".to_string()
                    }
                }
            }
        };

        session.push_turn(Speaker::Assistant, reply.clone());
        reply
    }

    fn record(
        &self,
        ledger: &mut Ledger,
        sink: &mut MemorySink,
        draft: ResolvedTransaction,
        today: NaiveDate,
    ) -> String {
        let id = ledger.next_transaction_id();
        let owner = ledger.owner().to_string();
        let events_before = sink.events().len();
        ledger.append(
            Transaction::new(
                id,
                today,
                draft.raw_text,
                draft.amount,
                draft.direction,
                &draft.category,
                owner,
            ),
            sink,
        );

        let mut reply = format!(
            "✅ {} de {} registrada em {}.",
            match draft.direction {
                Direction::Income => "Receita",
                Direction::Expense => "Despesa",
            },
            format_brl(draft.amount),
            draft.category,
        );
        for event in &sink.events()[events_before..] {
            if let LedgerEvent::BudgetExceeded { category, spent, limit } = event {
                reply.push_str(&format!(
                    "\n⚠️ Você ultrapassou o orçamento de {} ({} de {}).",
                    category,
                    format_brl(*spent),
                    format_brl(*limit),
                ));
            }
        }
        reply
    }
}

fn parse_confirmation(answer: &str) -> Option<Direction> {
    match answer.to_lowercase().as_str() {
        "1" | "receita" | "entrada" => Some(Direction::Income),
        "2" | "despesa" | "saída" | "saida" | "gasto" => Some(Direction::Expense),
        _ => None,
    }
}

fn is_greeting(text: &str) -> bool {
    matches!(
        text.to_lowercase().as_str(),
        "oi" | "olá" | "ola" | "bom dia" | "boa tarde" | "boa noite" | "menu" | "ajuda"
    )
}

fn welcome() -> &'static str {
    "Olá! Eu sou o assistente do FINZ. 💰\n\
Registre transações em linguagem natural:\n\
• \"gastei 45,90 em comida\"\n\
• \"recebi 800 do salário\"\n\
• \"paguei R$ 50 na conta de luz\""
}

fn ambiguity_prompt(amount: f64, suggested: Direction) -> String {
    let (income_mark, expense_mark) = match suggested {
        Direction::Income => (" (sugerido)", ""),
        Direction::Expense => ("", " (sugerido)"),
    };
    format!(
        "Identifiquei {}, mas não sei se é receita ou despesa.\n\
1️⃣ Receita{income_mark}\n\
2️⃣ Despesa{expense_mark}\n\
Responda 1 ou 2.",
        format_brl(amount),
    )
}
