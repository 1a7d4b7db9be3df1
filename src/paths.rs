use anyhow::{Context, Result};
use std::path::PathBuf;

/// Centralized path management for quotewall
/// This module provides a single source of truth for all application paths

/// Get the quotewall config directory
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("quotewall");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}

/// Get the directory generated wallpapers are written to
pub fn wallpaper_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("Unable to determine user data directory")?
        .join("quotewall")
        .join("wallpapers");

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating wallpaper directory at {}", dir.display()))?;

    Ok(dir)
}

/// Default location of the quote source file
pub fn default_quotes_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("quotes.txt"))
}
