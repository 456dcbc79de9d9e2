pub mod consolidated;
pub mod sample;

pub use consolidated::{parse_catalog, parse_timestamp};
pub use sample::sample_catalog;

use anyhow::{Context, Result};
use modelprice_core::CatalogStore;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

pub const CATALOG_FILE_NAME: &str = "consolidated.json";

/// Resolve a catalog location: a file is used as-is, a directory is
/// searched (up to three levels deep) for `consolidated.json`.
pub fn resolve_catalog_path(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        anyhow::bail!("catalog not found at {}", short_path(path));
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(path)
        .max_depth(3)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str() == Some(CATALOG_FILE_NAME))
        .map(|e| e.into_path())
        .collect();

    // shallowest first, then lexical for a stable pick
    candidates.sort_by(|a, b| {
        a.components()
            .count()
            .cmp(&b.components().count())
            .then_with(|| a.cmp(b))
    });

    candidates.into_iter().next().ok_or_else(|| {
        anyhow::anyhow!("no {} under {}", CATALOG_FILE_NAME, short_path(path))
    })
}

/// Most recent history snapshot in `dir`. Snapshots are named by date
/// (`YYYY-MM-DD.json`), so the lexically last file wins.
pub fn latest_snapshot(dir: &Path) -> Result<PathBuf> {
    let mut snapshots: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|x| x.to_str()) == Some("json"))
        .collect();
    snapshots.sort();
    snapshots
        .pop()
        .ok_or_else(|| anyhow::anyhow!("no snapshots under {}", short_path(dir)))
}

/// Read and normalize the catalog at `path` (file or directory).
pub fn load_catalog(path: &Path) -> Result<CatalogStore> {
    let file = resolve_catalog_path(path)?;
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
    let store =
        parse_catalog(&content).with_context(|| format!("loading catalog {}", file.display()))?;

    let stats = store.statistics();
    info!(
        models = stats.total_models,
        providers = stats.providers,
        path = %short_path(&file),
        "catalog loaded"
    );
    Ok(store)
}

/// Like [`load_catalog`], falling back to the built-in sample catalog when
/// the file is missing or unreadable.
pub fn load_catalog_or_sample(path: &Path) -> CatalogStore {
    match load_catalog(path) {
        Ok(store) => store,
        Err(e) => {
            warn!("{:#}; using sample data", e);
            sample_catalog()
        }
    }
}

/// Shorten a path for display purposes
pub fn short_path(path: &Path) -> String {
    let home = std::env::var("HOME").unwrap_or_default();
    let s = path.to_string_lossy();
    if !home.is_empty() && s.starts_with(&home) {
        format!("~{}", &s[home.len()..])
    } else {
        s.to_string()
    }
}
