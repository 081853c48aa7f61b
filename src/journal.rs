//! Run journal.
//!
//! The pipeline reports every stage transition to a [`Journal`]. Entries are
//! plain text lines; the journal decides where they go and how they are
//! stamped.

use std::io::{self, Write};

use chrono::Local;
use log::warn;

/// Sink for progress lines of an analysis run.
pub trait Journal {
    /// Append one line.
    fn append(&mut self, message: &str);
}

/// Journal that writes `HH.MM.SS|message` lines to a writer.
#[derive(Debug)]
pub struct TimestampedJournal<W: Write> {
    /// Destination of the lines.
    writer: W,
}

impl<W: Write> TimestampedJournal<W> {
    /// Wrap `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give the writer back.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TimestampedJournal<io::Stdout> {
    /// Journal printing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Journal for TimestampedJournal<W> {
    fn append(&mut self, message: &str) {
        let stamp = Local::now().format("%H.%M.%S");
        // A lost progress line must not abort the run.
        if let Err(error) = writeln!(self.writer, "{stamp}|{message}") {
            warn!("unable to write journal entry: {error}");
        }
    }
}

/// Journal that keeps its lines in memory, without timestamps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryJournal {
    /// Lines in the order they were appended.
    lines: Vec<String>,
}

impl MemoryJournal {
    /// Empty journal.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Appended lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Journal for MemoryJournal {
    fn append(&mut self, message: &str) {
        self.lines.push(message.to_owned());
    }
}
