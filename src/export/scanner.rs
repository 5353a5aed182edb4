use tracing::{debug, warn};

use super::markers::{self, Marker};
use crate::entry::{Entry, EntryCounter};
use crate::error::{ExportError, Result};
use crate::store::EntrySink;

const BODY_MARKER: &str = "BODY:";
const BODY_END: &str = "-----";
const RECORD_END: &str = "--------";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub lines: usize,
    pub entries: usize,
    /// The last entry had content but no closing `--------`.
    pub flushed_trailing: bool,
}

/// Line-at-a-time decoder for Movable Type exports.
///
/// Feed every line (terminator included) through [`Scanner::feed`], then call
/// [`Scanner::finish`]. Each `--------` outside a body hands the current entry
/// to the sink and starts a new one.
pub struct Scanner {
    timezone: String,
    counter: EntryCounter,
    entry: Entry,
    in_body: bool,
    stop_reading: bool,
    stats: ScanStats,
}

impl Scanner {
    pub fn new(timezone: impl Into<String>) -> Self {
        let mut counter = EntryCounter::new();
        let entry = Entry::exported(&mut counter);
        Scanner {
            timezone: timezone.into(),
            counter,
            entry,
            in_body: false,
            stop_reading: false,
            stats: ScanStats::default(),
        }
    }

    pub fn feed<S: EntrySink + ?Sized>(&mut self, raw: &str, sink: &mut S) -> Result<()> {
        self.stats.lines += 1;
        let line = raw.trim();

        if line == BODY_MARKER {
            self.in_body = true;
            return Ok(());
        }

        if self.in_body {
            if line == BODY_END || line == RECORD_END {
                self.in_body = false;
                self.stop_reading = true;
                return Ok(());
            }
            self.entry.append_body(raw);
        }

        if !self.in_body && line == RECORD_END {
            self.emit(sink)?;
            self.stop_reading = false;
        }

        if self.stop_reading {
            return Ok(());
        }

        if let Some((marker, value)) = markers::match_marker(line) {
            self.apply(marker, value)?;
        }
        Ok(())
    }

    /// End of input. A trailing entry that picked up content is flushed;
    /// an untouched one (the usual case after a final `--------`) is dropped.
    pub fn finish<S: EntrySink + ?Sized>(mut self, sink: &mut S) -> Result<ScanStats> {
        if self.entry.has_content() {
            warn!(
                parsed_num = ?self.entry.parsed_num,
                "export ended without a closing separator, flushing last entry"
            );
            self.emit(sink)?;
            self.stats.flushed_trailing = true;
        }
        Ok(self.stats)
    }

    fn emit<S: EntrySink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let next = Entry::exported(&mut self.counter);
        let done = std::mem::replace(&mut self.entry, next);
        debug!(uuid = %done.uuid, parsed_num = ?done.parsed_num, title = ?done.title, "entry complete");
        sink.accept(done)?;
        self.stats.entries += 1;
        Ok(())
    }

    fn apply(&mut self, marker: Marker, value: &str) -> Result<()> {
        let e = &mut self.entry;
        match marker {
            Marker::Title => e.title = Some(value.to_string()),
            Marker::Basename => e.basename = Some(value.to_string()),
            Marker::Status => e.status = Some(value.to_lowercase()),
            Marker::ConvertBreaks => e.format = Some(markers::format_for(value).to_string()),
            Marker::Tags => e.tags = Some(markers::split_tags(value)),
            Marker::Category => e.push_category(value.to_lowercase()),
            Marker::Date => {
                let stamp = markers::reformat_date(value, &self.timezone).map_err(|source| {
                    ExportError::Date {
                        line: self.stats.lines,
                        value: value.to_string(),
                        source,
                    }
                })?;
                e.set_dates(stamp);
            }
        }
        Ok(())
    }
}

/// Scan a whole export held in memory.
pub fn scan_str<S: EntrySink + ?Sized>(text: &str, timezone: &str, sink: &mut S) -> Result<ScanStats> {
    let mut scanner = Scanner::new(timezone);
    for raw in text.split_inclusive('\n') {
        scanner.feed(raw, sink)?;
    }
    scanner.finish(sink)
}

// ── Tests ──
