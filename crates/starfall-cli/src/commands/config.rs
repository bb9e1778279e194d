//! Config validation command

use anyhow::{Context, Result};
use starfall_game::{load_config, GameConfig};
use std::path::Path;

/// Load `path` (or the stock settings) and return the validated config
pub fn resolve(path: Option<&str>) -> Result<GameConfig> {
    match path {
        Some(path) => load_config(Path::new(path))
            .with_context(|| format!("Failed to load config '{}'", path)),
        None => {
            log::info!("no config given, using defaults");
            Ok(GameConfig::default())
        }
    }
}

pub fn run(path: Option<&str>, format: &str) -> Result<()> {
    let config = resolve(path)?;

    let output = match format {
        "json" => serde_json::to_string_pretty(&config).context("Failed to serialize config")?,
        _ => toml::to_string_pretty(&config).context("Failed to serialize config")?,
    };
    println!("{}", output);
    Ok(())
}
