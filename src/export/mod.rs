pub mod markers;
pub mod scanner;

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ExportError, Result};
use crate::store::EntrySink;
pub use scanner::{scan_str, ScanStats, Scanner};

/// Decode export bytes as UTF-8, or as Latin-1 when that fails.
///
/// Returns the text and whether the Latin-1 path was taken.
pub fn decode_export(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(e) => (e.into_bytes().iter().map(|&b| b as char).collect(), true),
    }
}

/// Read an export file and feed its entries to `sink`.
pub fn scan_file<S: EntrySink + ?Sized>(path: &Path, timezone: &str, sink: &mut S) -> Result<ScanStats> {
    let bytes = fs::read(path).map_err(|e| ExportError::io(path, e))?;
    let (text, latin1) = decode_export(bytes);
    if latin1 {
        warn!(input = %path.display(), "export is not valid UTF-8, decoded as Latin-1");
    }
    let stats = scan_str(&text, timezone, sink)?;
    info!(
        input = %path.display(),
        lines = stats.lines,
        entries = stats.entries,
        "export scanned"
    );
    Ok(stats)
}
