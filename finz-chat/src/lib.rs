//! finz-chat: chat-style message surface for the FINZ interpreter.
//!
//! Sessions are explicit objects with bounded history and TTL eviction;
//! the handler owns the income/expense confirmation round-trip.

pub mod handler;
pub mod session;

pub use handler::MessageHandler;
pub use session::{ChatSession, ChatTurn, PendingConfirmation, SessionRegistry, Speaker};
