//! Console output for the session loop.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::application::{CacheStatus, ReasoningMode, TurnReport};
use crate::domain::DomainError;

pub fn banner(out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{} Ask a question, or type {} to quit.",
        "wiki-rag".bold().cyan(),
        "/bye".yellow()
    )
}

pub fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "{} ", ">".bold().green())?;
    out.flush()
}

pub fn thinking(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "Thinking...".dimmed())?;
    out.flush()
}

pub fn report(out: &mut impl Write, report: &TurnReport) -> io::Result<()> {
    if let Some(term) = &report.search_term {
        writeln!(out, "{} {}", "Searched Wikipedia for".dimmed(), term.cyan())?;
    } else if report.mode == ReasoningMode::FollowUp {
        writeln!(out, "{}", "Answering from earlier context".dimmed())?;
    }

    if let Some(index) = report.index {
        let status = match index.cache {
            CacheStatus::Hit => "Index cache hit",
            CacheStatus::Miss => "Index cache miss, embedded",
        };
        writeln!(
            out,
            "{} ({} chunks, {} retrieved)",
            status.dimmed(),
            index.chunks,
            report.context_chunks
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", report.answer)?;
    writeln!(out)
}

pub fn error(out: &mut impl Write, err: &DomainError) -> io::Result<()> {
    writeln!(out, "{} {}", "Error:".bold().red(), err.red())
}

pub fn farewell(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", "Goodbye!".bold().cyan())
}
