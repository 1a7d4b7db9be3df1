use anyhow::{Context, Result};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::paths;

fn default_text_color() -> String {
    "#363636".to_string()
}

fn default_shadow_color() -> String {
    "#000000".to_string()
}

fn default_margin_ratio() -> f32 {
    0.1
}

fn default_keep_per_display() -> usize {
    5
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QuotewallConfig {
    /// Optional backdrop picture; the gradient is used when unset or unreadable
    pub background: Option<String>,
    #[serde(default = "default_text_color")]
    pub text_color: String,
    #[serde(default = "default_shadow_color")]
    pub shadow_color: String,
    #[serde(default = "default_margin_ratio")]
    pub margin_ratio: f32,
    /// How many generated files to keep around per display
    #[serde(default = "default_keep_per_display")]
    pub keep_per_display: usize,
}

impl Default for QuotewallConfig {
    fn default() -> Self {
        Self {
            background: None,
            text_color: default_text_color(),
            shadow_color: default_shadow_color(),
            margin_ratio: default_margin_ratio(),
            keep_per_display: default_keep_per_display(),
        }
    }
}

impl QuotewallConfig {
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(paths::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let cfg_path = Self::config_file_path()?;
        if !cfg_path.exists() {
            return Ok(Self::default());
        }

        let s = fs::read_to_string(&cfg_path)
            .with_context(|| format!("reading config {}", cfg_path.display()))?;
        toml::from_str(&s).context("parsing config toml")
    }

    pub fn save(&self) -> Result<()> {
        let cfg_path = Self::config_file_path()?;
        if let Some(parent) = cfg_path.parent() {
            fs::create_dir_all(parent).context("creating config directory")?;
        }

        let toml = toml::to_string_pretty(self).context("serializing config to toml")?;
        fs::write(&cfg_path, toml).context("writing config file")?;
        Ok(())
    }

    pub fn set_background(&mut self, path: String) -> Result<()> {
        // Resolve absolute path if possible
        let path_buf = PathBuf::from(&path);
        let abs_path = if path_buf.is_absolute() {
            path
        } else {
            std::env::current_dir()
                .context("getting current directory")?
                .join(path)
                .to_string_lossy()
                .to_string()
        };

        self.background = Some(abs_path);
        self.save()
    }
}

/// Parse a `#rrggbb` hex string into RGB components
pub fn parse_hex_color(value: &str) -> Result<Rgb<u8>> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("invalid color '{}': expected #rrggbb", value);
    }

    let r = u8::from_str_radix(&hex[0..2], 16)?;
    let g = u8::from_str_radix(&hex[2..4], 16)?;
    let b = u8::from_str_radix(&hex[4..6], 16)?;
    Ok(Rgb([r, g, b]))
}
