//! Transcript
//!
//! Plain-text run log. Each tick is written as an optional location listing
//! followed by one section per location, in directory order.

use indexmap::IndexMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::{LogToggles, PrintToggles, Topic};

/// One location's part of a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub location: String,
    pub tick: u64,
    /// Header line included
    pub text: String,
    /// Whether anything was recorded under the header
    pub has_entries: bool,
}

pub fn section_header(location: &str, tick: u64) -> String {
    format!("====================== {location} TICK {tick} ======================")
}

pub fn listing_header(tick: u64) -> String {
    format!("=== LOCATIONS AT START OF TICK {tick} ===")
}

/// Append-only transcript writer.
///
/// Entries are filtered by the log toggles for the file and independently by
/// the print toggles for stdout.
pub struct Transcript {
    writer: Option<BufWriter<File>>,
    log: LogToggles,
    print: PrintToggles,
    tick: u64,
    preamble: String,
    sections: IndexMap<String, Section>,
}

impl Transcript {
    /// Create a transcript that overwrites `path`
    pub fn create(
        path: impl AsRef<Path>,
        log: LogToggles,
        print: PrintToggles,
    ) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut transcript = Self::null(log, print);
        transcript.writer = Some(BufWriter::new(file));
        Ok(transcript)
    }

    /// Create a transcript that keeps sections in memory but writes nothing
    pub fn null(log: LogToggles, print: PrintToggles) -> Self {
        Self {
            writer: None,
            log,
            print,
            tick: 0,
            preamble: String::new(),
            sections: IndexMap::new(),
        }
    }

    /// Open empty sections for `tick`, one per location in the given order.
    ///
    /// Anything not yet written by [`Transcript::finish_tick`] is discarded.
    pub fn begin_tick<'a>(&mut self, tick: u64, locations: impl IntoIterator<Item = &'a str>) {
        self.tick = tick;
        self.preamble.clear();
        self.sections.clear();

        for location in locations {
            let header = section_header(location, tick);
            self.sections.insert(
                location.to_string(),
                Section {
                    location: location.to_string(),
                    tick,
                    text: format!("{header}\n"),
                    has_entries: false,
                },
            );
        }
    }

    /// Add a tick-level entry written before the location sections
    pub fn note(&mut self, topic: Topic, text: &str) {
        if self.log.shows(topic) {
            self.preamble.push_str(text);
            self.preamble.push('\n');
        }
        if self.print.shows(topic) {
            println!("{text}");
        }
    }

    /// Add an entry to `location`'s section.
    ///
    /// A location with no open section gets one appended after the others.
    pub fn record(&mut self, location: &str, topic: Topic, text: &str) {
        if self.log.shows(topic) {
            let tick = self.tick;
            let section = self.sections.entry(location.to_string()).or_insert_with(|| Section {
                location: location.to_string(),
                tick,
                text: format!("{}\n", section_header(location, tick)),
                has_entries: false,
            });
            section.text.push_str(text);
            section.text.push('\n');
            section.has_entries = true;
        }
        if self.print.shows(topic) {
            println!("{text}");
        }
    }

    /// Write the tick's listing and sections and hand the sections back
    pub fn finish_tick(&mut self) -> std::io::Result<Vec<Section>> {
        let sections: Vec<Section> = self.sections.drain(..).map(|(_, s)| s).collect();

        if let Some(ref mut writer) = self.writer {
            writer.write_all(self.preamble.as_bytes())?;
            for section in &sections {
                writeln!(writer, "{}", section.text)?;
            }
        }
        self.preamble.clear();
        Ok(sections)
    }

    /// Append a summary of `section`; always written and printed
    pub fn summary(&mut self, section: &Section, summary: &str) -> std::io::Result<()> {
        let footer = format!(
            "----------------------- SUMMARY FOR {} TICK {} -----------------------",
            section.location, section.tick
        );
        if let Some(ref mut writer) = self.writer {
            writeln!(writer, "{footer}\n{summary}\n")?;
        }
        println!("{footer}\n{summary}\n");
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

impl Drop for Transcript {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to flush transcript");
        }
    }
}
