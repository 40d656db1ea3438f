use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use super::output;
use crate::application::{TurnOrchestrator, TurnReport};
use crate::domain::DomainError;

pub const BYE_COMMAND: &str = "/bye";

/// Something that can answer one question at a time.
#[async_trait]
pub trait TurnRunner: Send {
    async fn run_turn(&mut self, question: &str) -> Result<TurnReport, DomainError>;

    fn end_session(&mut self) {}
}

#[async_trait]
impl TurnRunner for TurnOrchestrator {
    async fn run_turn(&mut self, question: &str) -> Result<TurnReport, DomainError> {
        TurnOrchestrator::run_turn(self, question).await
    }

    fn end_session(&mut self) {
        TurnOrchestrator::end_session(self);
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Bye,
    Blank,
    Question(&'a str),
}

pub fn parse_line(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        Command::Blank
    } else if line.eq_ignore_ascii_case(BYE_COMMAND) {
        Command::Bye
    } else {
        Command::Question(line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Bye,
    EndOfInput,
}

/// Reads questions line by line and runs one turn per question.
pub struct Session<T> {
    runner: T,
    interactive: bool,
}

impl<T: TurnRunner> Session<T> {
    pub fn new(runner: T) -> Self {
        Self {
            runner,
            interactive: false,
        }
    }

    /// Prints a prompt before every read.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn runner(&self) -> &T {
        &self.runner
    }

    /// Invalid UTF-8 in a line is replaced rather than ending the session.
    pub async fn run<R, W>(&mut self, mut input: R, out: &mut W) -> anyhow::Result<SessionEnd>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut buf = Vec::new();
        loop {
            if self.interactive {
                output::prompt(out)?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                self.runner.end_session();
                return Ok(SessionEnd::EndOfInput);
            }
            let line = String::from_utf8_lossy(&buf);

            match parse_line(&line) {
                Command::Blank => continue,
                Command::Bye => {
                    output::farewell(out)?;
                    self.runner.end_session();
                    return Ok(SessionEnd::Bye);
                }
                Command::Question(question) => {
                    output::thinking(out)?;
                    match self.runner.run_turn(question).await {
                        Ok(report) => output::report(out, &report)?,
                        Err(e) => {
                            warn!(error = %e, "turn failed");
                            output::error(out, &e)?;
                        }
                    }
                }
            }
        }
    }
}
