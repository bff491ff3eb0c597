use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use lumen_corona::CoronaConfig;
use lumen_light::SamplerConfig;
use lumen_lightmap::LightmapConfig;
use serde::Deserialize;

/// Top-level configuration file: one section per subsystem.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LumenConfig {
    #[serde(default)]
    pub lighting: SamplerConfig,
    #[serde(default)]
    pub lightmaps: LightmapConfig,
    #[serde(default)]
    pub corona: CoronaConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

impl LumenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let mut cfg: LumenConfig = toml::from_str(s)?;
        cfg.sync();
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Lightmap grayscale follows the lighting switch.
    fn sync(&mut self) {
        self.lightmaps.grayscale = self.lighting.grayscale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_light::DynamicLightMode;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = LumenConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.lighting.dynamic, DynamicLightMode::On);
        assert!(cfg.lightmaps.packing);
        assert_eq!(cfg.corona.scale, 0.4);
    }

    #[test]
    fn sections_and_grayscale_sync() {
        let cfg = LumenConfig::from_toml_str(
            r#"
            [lighting]
            grayscale = true
            dynamic = "full"

            [lightmaps]
            overbright_bits = 2
            packing = false

            [corona]
            scale = 1.0
        "#,
        )
        .unwrap();
        assert!(cfg.lighting.grayscale);
        assert!(cfg.lightmaps.grayscale);
        assert_eq!(cfg.lightmaps.overbright_bits, 2);
        assert!(!cfg.lightmaps.packing);
        assert_eq!(cfg.lighting.dynamic, DynamicLightMode::Full);
        assert_eq!(cfg.corona.scale, 1.0);
    }

    #[test]
    fn bad_values_are_parse_errors() {
        assert!(LumenConfig::from_toml_str("[lighting]\ndynamic = \"sometimes\"").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LumenConfig::load("/nonexistent/lumen.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/lumen.toml"));
    }
}
