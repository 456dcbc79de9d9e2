use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod settings;
use commands::{calc, changes, compare, interactive, list, AppContext};

#[derive(Parser)]
#[command(
    name = "modelprice",
    version = "0.1.0",
    author,
    about = "Estimate and compare monthly LLM API costs across providers",
    long_about = r#"modelprice reads a consolidated pricing catalog (per-million-token input/output
prices for models across providers) and projects monthly and annual spend for a
usage scenario, ranking the selected models cheapest first.

Presets: small, medium, large, enterprise

Quick start:
  modelprice list models --sort price-asc               # browse the catalog
  modelprice list providers                             # providers and price ranges
  modelprice calc --provider anthropic --preset large   # cost projection
  modelprice calc --all --format html --out costs.html  # HTML report
  modelprice compare --models gpt-4o,claude-3-5-sonnet  # side-by-side specs
  modelprice changes --previous data/history            # price moves since a snapshot
  modelprice interactive                                # live recalculation"#
)]
pub struct Cli {
    /// Catalog JSON file, or a directory containing consolidated.json
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse models and providers in the catalog
    List(list::ListArgs),

    /// Project monthly cost for a selection of models
    Calc(calc::CalcArgs),

    /// Side-by-side comparison of up to five models
    Compare(compare::CompareArgs),

    /// Price changes and new models since an earlier catalog snapshot
    Changes(changes::ChangesArgs),

    /// Line-oriented calculator session with live recalculation
    Interactive(interactive::InteractiveArgs),
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,modelprice=debug,modelprice_core=debug,modelprice_ingest=debug"
    } else {
        "warn,modelprice=info,modelprice_core=info,modelprice_ingest=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // a second init only happens under test harnesses
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = settings::load_settings()?;
    let ctx = AppContext::open(settings, cli.catalog)?;
    match cli.command {
        Commands::List(args) => list::run(args, &ctx),
        Commands::Calc(args) => calc::run(args, &ctx),
        Commands::Compare(args) => compare::run(args, &ctx),
        Commands::Changes(args) => changes::run(args, &ctx),
        Commands::Interactive(args) => interactive::run(args, &ctx),
    }
}
