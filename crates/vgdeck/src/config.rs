use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::deck::Canvas;
use crate::layout::Spacing;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "vgdeck";

pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Canvas width used when neither the deck nor the display provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windowed: Option<bool>,

    /// Gap between wrapped words, as a multiple of the width of "m".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_spacing: Option<f64>,

    /// Distance between wrapped lines, as a multiple of the font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f64>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `vgdeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# vgdeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.width" => defaults.width = Some(parse_dimension(key, value)?),
            "defaults.height" => defaults.height = Some(parse_dimension(key, value)?),
            "defaults.windowed" => {
                let windowed = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!("Invalid windowed: {value}. Must be 'true' or 'false'."),
                };
                defaults.windowed = Some(windowed);
            }
            "defaults.word_spacing" => defaults.word_spacing = Some(parse_factor(key, value)?),
            "defaults.line_spacing" => defaults.line_spacing = Some(parse_factor(key, value)?),
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.width, defaults.height, defaults.windowed, defaults.word_spacing, defaults.line_spacing"
            ),
        }
        Ok(())
    }

    fn defaults(&self) -> DefaultsConfig {
        self.defaults.clone().unwrap_or_default()
    }

    /// Canvas size for decks that declare none and displays that report none.
    pub fn fallback_canvas(&self) -> Canvas {
        let defaults = self.defaults();
        Canvas {
            width: defaults.width.unwrap_or(DEFAULT_WIDTH),
            height: defaults.height.unwrap_or(DEFAULT_HEIGHT),
        }
    }

    pub fn spacing(&self) -> Spacing {
        let defaults = self.defaults();
        let standard = Spacing::default();
        Spacing {
            word: defaults.word_spacing.unwrap_or(standard.word),
            line: defaults.line_spacing.unwrap_or(standard.line),
        }
    }

    pub fn windowed(&self) -> bool {
        self.defaults().windowed.unwrap_or(false)
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => anyhow::bail!("Invalid {key}: {value}. Must be a positive whole number of pixels."),
    }
}

fn parse_factor(key: &str, value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => Ok(f),
        _ => anyhow::bail!("Invalid {key}: {value}. Must be a positive number."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_builtin_defaults() {
        let config = Config::default();
        assert_eq!(
            config.fallback_canvas(),
            Canvas {
                width: 1920,
                height: 1080
            }
        );
        assert_eq!(config.spacing(), Spacing::default());
        assert!(!config.windowed());
    }

    #[test]
    fn test_set_valid_values() {
        let mut config = Config::default();
        config.set("defaults.width", "1024").unwrap();
        config.set("defaults.height", "768").unwrap();
        config.set("defaults.windowed", "yes").unwrap();
        config.set("defaults.line_spacing", "1.5").unwrap();
        assert_eq!(
            config.fallback_canvas(),
            Canvas {
                width: 1024,
                height: 768
            }
        );
        assert!(config.windowed());
        assert_eq!(config.spacing().line, 1.5);
        assert_eq!(config.spacing().word, 0.3);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.width", "0").is_err());
        assert!(config.set("defaults.height", "tall").is_err());
        assert!(config.set("defaults.windowed", "maybe").is_err());
        assert!(config.set("defaults.word_spacing", "-1").is_err());
        assert!(config.set("defaults.theme", "dark").is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let mut config = Config::default();
        config.set("defaults.word_spacing", "0.5").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.defaults, config.defaults);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }

    #[test]
    fn test_partial_yaml() {
        let config: Config = serde_yaml::from_str("defaults:\n  height: 600\n").unwrap();
        assert_eq!(config.fallback_canvas().width, 1920);
        assert_eq!(config.fallback_canvas().height, 600);
    }
}
