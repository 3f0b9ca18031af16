//! Event Logger
//!
//! Append-only JSONL log of tick events.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use town_events::{generate_event_id, EventKind, SimTimestamp, TickEvent};

/// Writes one JSON line per tick event
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    run_id: String,
    event_count: u64,
    next_event_id: u64,
}

impl EventLogger {
    /// Create a new event logger writing to the specified path
    pub fn new(path: impl AsRef<Path>, run_id: impl Into<String>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut logger = Self::null(run_id);
        logger.writer = Some(BufWriter::new(file));
        Ok(logger)
    }

    /// Create a logger that counts events but discards them
    pub fn null(run_id: impl Into<String>) -> Self {
        Self {
            writer: None,
            run_id: run_id.into(),
            event_count: 0,
            next_event_id: 1,
        }
    }

    /// Generate the next event ID
    pub fn next_id(&mut self) -> String {
        let id = generate_event_id(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Build an event for `agent` and log it
    pub fn emit(
        &mut self,
        timestamp: SimTimestamp,
        agent: &str,
        location: &str,
        kind: EventKind,
    ) -> std::io::Result<()> {
        let event = TickEvent::new(self.next_id(), timestamp, agent, location, kind)
            .with_run_id(self.run_id.clone());
        self.log(&event)
    }

    /// Log an event to the file
    pub fn log(&mut self, event: &TickEvent) -> std::io::Result<()> {
        self.event_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = event.to_jsonl()?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to flush event logger");
        }
    }
}
