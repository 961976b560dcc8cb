//! Conversation turns and their durable per-speaker logs

mod turn;
mod turn_logger;

pub use turn::{TokenUsage, Turn};
pub use turn_logger::{LogRecord, TurnLogger};
