use anyhow::{Context, Result};
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "colored_square.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: LevelFilter,
    pub window: WindowConfig,
    pub shader: ShaderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            window: WindowConfig::default(),
            shader: ShaderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "Colored Square".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub path: PathBuf,
    /// Value written to the `uColor` uniform.
    pub color: [f32; 4],
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("basicShaderFile.shader"),
            color: [0.0, 1.0, 0.0, 1.0],
        }
    }
}

impl AppConfig {
    /// Loads `path` if it exists, otherwise falls back to the defaults.
    /// Nothing is ever written back.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
