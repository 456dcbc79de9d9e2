pub mod calc;
pub mod changes;
pub mod compare;
pub mod interactive;
pub mod list;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use modelprice_core::CatalogStore;
use modelprice_ingest as ingest;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::settings::Settings;

/// What every command needs: resolved settings and the loaded catalog.
pub struct AppContext {
    pub settings: Settings,
    pub catalog: Arc<CatalogStore>,
}

impl AppContext {
    /// `catalog_override` (the `--catalog` flag) wins over the configured
    /// path. A missing or unreadable catalog falls back to sample data.
    pub fn open(mut settings: Settings, catalog_override: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = catalog_override {
            settings.catalog = path;
        }
        let catalog = Arc::new(ingest::load_catalog_or_sample(&settings.catalog));
        Ok(Self { settings, catalog })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Html,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }

    /// Fail on a format the command cannot render, or on an output file
    /// for table output (tables only go to the terminal).
    pub fn ensure(self, command: &str, supported: &[OutputFormat], out: Option<&Path>) -> Result<()> {
        if !supported.contains(&self) {
            let names: Vec<&str> = supported.iter().map(|f| f.as_str()).collect();
            anyhow::bail!(
                "'{}' does not support --format {} (use {})",
                command,
                self.as_str(),
                names.join(" or ")
            );
        }
        if self == OutputFormat::Table && out.is_some() {
            anyhow::bail!("--out needs --format json or html");
        }
        Ok(())
    }
}

/// Split a comma-separated id list, dropping blanks.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn write_or_print(content: &str, out: Option<&Path>, default_file: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, content)?;
            eprintln!("{} Written to {}", "✓".green(), path.display());
        }
        None if content.starts_with("<!DOCTYPE") => {
            let path = PathBuf::from(default_file);
            std::fs::write(&path, content)?;
            eprintln!("{} Written to {}", "✓".green(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
