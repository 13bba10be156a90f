//! End-to-end conversation regression: greeting, direct record, ambiguous
//! confirmation round-trip and budget warning, all through one session.

use chrono::{NaiveDate, TimeZone, Utc};
use finz_chat::{MessageHandler, SessionRegistry};
use finz_core::{Direction, Interpreter};
use finz_store::{BudgetPeriod, Ledger, LedgerEvent, MemorySink};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

#[test]
fn test_full_conversation() {
    let handler = MessageHandler::new(Interpreter::with_defaults().unwrap());
    let mut registry = SessionRegistry::with_defaults();
    let mut ledger = Ledger::new("5511999990000");
    let mut sink = MemorySink::new();
    ledger.set_budget("alimentação", 100.0, BudgetPeriod::Monthly);

    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let session = registry.session_mut("5511999990000", now);

    // greeting
    let reply = handler.handle(session, &mut ledger, &mut sink, "oi", today());
    assert!(reply.contains("assistente do FINZ"));

    // unambiguous expense goes straight in
    let reply = handler.handle(session, &mut ledger, &mut sink, "gastei 45,90 em comida", today());
    assert!(reply.contains("R$ 45,90"));
    assert_eq!(ledger.transactions().len(), 1);

    // ambiguous input needs the round-trip
    let reply = handler.handle(session, &mut ledger, &mut sink, "40 no cinema", today());
    assert!(reply.contains("Responda 1 ou 2"));
    assert_eq!(ledger.transactions().len(), 1, "not committed yet");

    let reply = handler.handle(session, &mut ledger, &mut sink, "2", today());
    assert!(reply.contains("Despesa"));
    assert_eq!(ledger.transactions().len(), 2);
    assert_eq!(ledger.transactions()[1].direction, Direction::Expense);
    assert_eq!(ledger.transactions()[1].category, "lazer");

    // this one crosses the alimentação budget (45,90 + 60 > 100)
    let reply = handler.handle(session, &mut ledger, &mut sink, "gastei 60 no mercado", today());
    assert!(reply.contains("ultrapassou o orçamento de alimentação"), "reply: {reply}");

    let exceeded = sink
        .events()
        .iter()
        .filter(|e| matches!(e, LedgerEvent::BudgetExceeded { .. }))
        .count();
    assert_eq!(exceeded, 1);

    // aggregate state after the whole conversation
    let stats = ledger.stats();
    assert_eq!(stats.transaction_count, 3);
    assert!((stats.total_expense - 145.9).abs() < 1e-9);
    assert_eq!(stats.total_income, 0.0);
}

#[test]
fn test_sessions_are_independent_per_phone() {
    let handler = MessageHandler::new(Interpreter::with_defaults().unwrap());
    let mut registry = SessionRegistry::with_defaults();
    let mut sink = MemorySink::new();
    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();

    let mut ledger_a = Ledger::new("a");
    let session = registry.session_mut("a", now);
    handler.handle(session, &mut ledger_a, &mut sink, "40 no cinema", today());
    assert!(session.pending().is_some());

    // a second phone number starts clean: no pending confirmation leaks
    let mut ledger_b = Ledger::new("b");
    let session_b = registry.session_mut("b", now);
    assert!(session_b.pending().is_none());
    let reply = handler.handle(session_b, &mut ledger_b, &mut sink, "oi", today());
    assert!(reply.contains("assistente do FINZ"), "reply: {reply}");
    assert!(ledger_b.transactions().is_empty());
    assert_eq!(registry.len(), 2);
}
