//! Dashboard configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::{Formatter, Locale};
use crate::palette::{Palette, PaletteError};
use crate::policy::RenderPolicy;
use crate::renderer::TabularRenderer;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid palette: {0}")]
    Palette(#[from] PaletteError),
}

/// Top-level config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub format: FormatConfig,
    pub palette: PaletteConfig,
    /// Default policy for tables that bring none of their own.
    pub table: RenderPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub locale: Locale,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// `#RRGGBB` overrides; empty keeps the built-in colors.
    pub colors: Vec<String>,
}

impl DashboardConfig {
    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.format.locale)
    }

    pub fn palette(&self) -> Result<Palette, ConfigError> {
        if self.palette.colors.is_empty() {
            return Ok(Palette::default());
        }
        Ok(Palette::from_hex(self.palette.colors.as_slice())?)
    }

    /// Renderer for `policy`, or for the configured default table policy.
    pub fn renderer(&self, policy: Option<RenderPolicy>) -> Result<TabularRenderer, ConfigError> {
        Ok(TabularRenderer::new(
            policy.unwrap_or_else(|| self.table.clone()),
            self.palette()?,
            self.formatter(),
        ))
    }
}

/// Load a config file. A missing path yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig, ConfigError> {
    match path {
        Some(path) => load_toml(path),
        None => Ok(DashboardConfig::default()),
    }
}

/// Load a standalone render policy file.
pub fn load_policy(path: &Path) -> Result<RenderPolicy, ConfigError> {
    load_toml(path)
}

fn load_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = load_config(None).unwrap();
        assert_eq!(config.format.locale, Locale::PlPl);
        assert_eq!(config.palette().unwrap(), Palette::default());
        assert!(config.table.row_number_column);
    }

    #[test]
    fn test_parse_full_config() {
        let config: DashboardConfig = toml::from_str(
            r##"
            [format]
            locale = "en-us"

            [palette]
            colors = ["#000000", "#FFFFFF"]

            [table]
            bold_last_row = true
            currency_column_index = 2
            color_column_index = -1
            "##,
        )
        .unwrap();
        assert_eq!(config.format.locale, Locale::EnUs);
        assert_eq!(config.palette().unwrap().len(), 2);
        assert!(config.table.bold_last_row);
        assert_eq!(config.table.currency_column_index, Some(2));
        assert_eq!(config.table.color_column_index, None);
    }

    #[test]
    fn test_bad_palette_is_error() {
        let config = DashboardConfig {
            palette: PaletteConfig {
                colors: vec!["red".into()],
            },
            ..DashboardConfig::default()
        };
        assert!(matches!(config.palette(), Err(ConfigError::Palette(_))));
    }

    #[test]
    fn test_load_policy_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "has_header_row = true").unwrap();
        writeln!(file, "row_ids = [\"a\"]").unwrap();
        let policy = load_policy(file.path()).unwrap();
        assert!(policy.has_header_row);
        assert_eq!(policy.row_ids, vec!["a"]);
    }

    #[test]
    fn test_load_policy_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "has_header_row = maybe").unwrap();
        assert!(matches!(
            load_policy(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
