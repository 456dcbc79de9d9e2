use anyhow::Result;
use clap::Args;
use colored::Colorize;
use modelprice_core::*;
use modelprice_ingest as ingest;
use modelprice_report::{json as jreport, terminal};
use std::path::{Path, PathBuf};

use super::{write_or_print, AppContext, OutputFormat};

#[derive(Args)]
pub struct ChangesArgs {
    /// Earlier catalog or history snapshot; a directory picks its newest
    /// YYYY-MM-DD.json snapshot
    #[arg(long)]
    pub previous: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Output file for json
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn load_previous(path: &Path) -> Result<CatalogStore> {
    let file = if path.is_dir() {
        ingest::latest_snapshot(path)?
    } else {
        path.to_path_buf()
    };
    eprintln!("{} Comparing against {}", "→".cyan(), ingest::short_path(&file));
    ingest::load_catalog(&file)
}

pub fn run(args: ChangesArgs, ctx: &AppContext) -> Result<()> {
    args.format.ensure(
        "changes",
        &[OutputFormat::Table, OutputFormat::Json],
        args.out.as_deref(),
    )?;

    let previous = load_previous(&args.previous)?;
    let changes = diff_catalogs(&previous, &ctx.catalog);

    match args.format {
        OutputFormat::Json => {
            let content = jreport::render_changes(&changes, &previous, &ctx.catalog)?;
            write_or_print(&content, args.out.as_deref(), "modelprice-changes.json")?;
        }
        _ => terminal::print_changes(&changes, &ctx.catalog),
    }
    Ok(())
}
