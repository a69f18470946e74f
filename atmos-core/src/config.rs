use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    endpoint::Endpoint,
    style::{IconAssets, RenderStyle, Variant},
};

const DEFAULT_REPORT_LENGTH: u32 = 200;

fn default_report_lengths() -> Vec<u32> {
    vec![100, 200, 300, 500]
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// base_url = "https://atmos.example.com"
/// variant = "classic"
/// precision = 2
/// report_lengths = [100, 200, 300]
///
/// [icons]
/// rainy = "./rainy.svg"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the forecast server. Unset means the local loopback server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default)]
    pub variant: Variant,

    /// Overrides the variant's number of decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,

    /// Word counts offered by the report length selector.
    #[serde(default = "default_report_lengths")]
    pub report_lengths: Vec<u32>,

    #[serde(default)]
    pub icons: IconAssets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            variant: Variant::default(),
            precision: None,
            report_lengths: default_report_lengths(),
            icons: IconAssets::default(),
        }
    }
}

impl Config {
    pub fn endpoint(&self) -> Endpoint {
        match &self.base_url {
            Some(url) => Endpoint::served(url.as_str()),
            None => Endpoint::local(),
        }
    }

    /// Store a base URL; blank input goes back to the loopback default.
    pub fn set_base_url(&mut self, url: &str) {
        let trimmed = url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
    }

    /// Preset for the configured variant with file overrides applied.
    pub fn render_style(&self) -> RenderStyle {
        self.render_style_for(self.variant)
    }

    pub fn render_style_for(&self, variant: Variant) -> RenderStyle {
        let mut style = RenderStyle::for_variant(variant);
        if let Some(precision) = self.precision {
            style.precision = precision;
        }
        style.icons = self.icons.clone();
        style
    }

    /// Index of the selection the form starts on.
    pub fn default_report_length_index(&self) -> usize {
        self.report_lengths
            .iter()
            .position(|&len| len == DEFAULT_REPORT_LENGTH)
            .unwrap_or(0)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if cfg.report_lengths.is_empty() {
            return Err(anyhow!(
                "Config file {} lists no report lengths.\n\
                 Hint: remove `report_lengths` to use the defaults.",
                path.display()
            ));
        }

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "atmos", "atmos-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
