use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use mt_export::{init_tracing, store, DirStore, Settings};

#[derive(Parser)]
#[command(name = "dump_mt_export", about = "Parse a MoveableType export into JSON entry files")]
struct Cli {
    /// The input export file
    #[arg(short, long, value_name = "INPUT", required_unless_present = "check")]
    input: Option<PathBuf>,

    /// The output directory (default: MT_OUTPUT_DIR or ".")
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Load every entry in DIR and check its dates instead of parsing
    #[arg(long, value_name = "DIR", conflicts_with = "input")]
    check: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let settings = Settings::load();
    info!(settings = ?settings, "starting export dump");

    let t0 = Instant::now();
    let cli = Cli::parse();

    if let Some(dir) = cli.check {
        return check(&dir, &settings.timezone);
    }

    let input = cli.input.context("--input is required")?;
    let output = cli.output.unwrap_or(settings.output_dir);

    let mut sink = DirStore::new(&output)
        .with_context(|| format!("Failed to prepare output directory {}", output.display()))?;
    let stats = mt_export::scan_file(&input, &settings.timezone, &mut sink)
        .with_context(|| format!("Failed to dump {}", input.display()))?;

    println!(
        "Wrote {} entries to {} ({} lines read) in {:.1}s",
        sink.written(),
        sink.dir().display(),
        stats.lines,
        t0.elapsed().as_secs_f64()
    );
    if stats.flushed_trailing {
        println!("Note: the last entry had no closing separator and was written anyway.");
    }
    Ok(())
}

fn check(dir: &Path, timezone: &str) -> Result<()> {
    let entries = store::load_dir(dir).with_context(|| format!("Failed to load {}", dir.display()))?;
    let problems = store::check_dates(&entries, timezone);
    for p in &problems {
        println!("{}: bad {}: {}", p.file, p.field, p.error);
    }
    println!("Checked {} entries in {}", entries.len(), dir.display());
    if !problems.is_empty() {
        bail!("{} unreadable dates", problems.len());
    }
    Ok(())
}
