use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;

use mt_export::{init_tracing, DirStore, Entry, EntryType, Settings};

#[derive(Parser)]
#[command(name = "create_post", about = "Create a skeleton post")]
struct Cli {
    /// The input body
    #[arg(short, long, value_name = "BODY", default_value = "")]
    body: String,

    /// The title
    #[arg(short, long, value_name = "TITLE", default_value = "")]
    title: String,

    /// The post type
    #[arg(short = 'y', long = "type", value_name = "TYPE", value_enum, default_value_t = EntryType::Post)]
    post_type: EntryType,

    /// The output directory (default: MT_OUTPUT_DIR or ".")
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let settings = Settings::load();
    info!(settings = ?settings, "starting skeleton post");

    let cli = Cli::parse();
    let output = cli.output.unwrap_or(settings.output_dir);

    let entry = Entry::skeleton(
        &cli.title,
        &cli.body,
        cli.post_type,
        Local::now().naive_local(),
        &settings.timezone,
    );
    let mut store = DirStore::new(&output)
        .with_context(|| format!("Failed to prepare output directory {}", output.display()))?;
    let path = store.write(&entry).context("Failed to write skeleton")?;

    println!("{}", path.display());
    Ok(())
}
