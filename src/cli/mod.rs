//! Interactive session over stdin/stdout.

pub mod output;
mod session;

pub use session::{parse_line, Command, Session, SessionEnd, TurnRunner, BYE_COMMAND};
