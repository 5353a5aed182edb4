//! Tools for moving a Movable Type blog into a directory of JSON entries.
//!
//! `dump_mt_export` splits an export into one `<uuid>.post` file per entry;
//! `create_post` writes an empty draft in the same layout.

pub mod entry;
pub mod error;
pub mod export;
pub mod settings;
pub mod store;

pub use entry::{Entry, EntryCounter, EntryType};
pub use error::{ExportError, Result};
pub use export::{scan_file, scan_str, ScanStats, Scanner};
pub use settings::Settings;
pub use store::{DirStore, EntrySink};

/// Shared `tracing` setup for the binaries. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
