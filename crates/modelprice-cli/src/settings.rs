use anyhow::{Context, Result};
use modelprice_core::Preset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_STEM: &str = "modelprice";
pub const ENV_PREFIX: &str = "MODELPRICE";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Catalog JSON, or a directory holding `consolidated.json`.
    pub catalog: PathBuf,
    pub debounce_ms: u64,
    pub default_preset: Option<String>,
}

impl Settings {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn preset(&self) -> Result<Option<Preset>> {
        self.default_preset
            .as_deref()
            .map(|name| name.parse::<Preset>().map_err(anyhow::Error::from))
            .transpose()
            .context("invalid default_preset in configuration")
    }
}

/// `modelprice.toml` in the working directory, then `MODELPRICE__*`
/// environment variables. Both are optional.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new(CONFIG_FILE_STEM))
}

pub fn load_settings_from(file_stem: &Path) -> Result<Settings> {
    let stem = file_stem.to_string_lossy();
    let config = config::Config::builder()
        .set_default("catalog", "data")?
        .set_default("debounce_ms", 500)?
        .add_source(config::File::with_name(&stem).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .with_context(|| format!("reading configuration from {}.toml", stem))?;

    let settings: Settings = config.try_deserialize()?;
    settings.preset()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("modelprice")).unwrap();
        assert_eq!(settings.catalog, PathBuf::from("data"));
        assert_eq!(settings.debounce_window(), Duration::from_millis(500));
        assert_eq!(settings.default_preset, None);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("modelprice.toml"),
            "catalog = \"/srv/pricing/consolidated.json\"\ndebounce_ms = 150\ndefault_preset = \"large\"\n",
        )
        .unwrap();

        let settings = load_settings_from(&dir.path().join("modelprice")).unwrap();
        assert_eq!(settings.catalog, PathBuf::from("/srv/pricing/consolidated.json"));
        assert_eq!(settings.debounce_ms, 150);
        assert_eq!(settings.preset().unwrap(), Some(Preset::Large));
    }

    #[test]
    fn unknown_default_preset_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("modelprice.toml"), "default_preset = \"huge\"\n").unwrap();
        assert!(load_settings_from(&dir.path().join("modelprice")).is_err());
    }
}
