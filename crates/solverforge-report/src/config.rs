//! Report configuration.
//!
//! Load report settings from TOML or YAML so output layout and colors can be
//! changed without code changes.
//!
//! ```
//! use solverforge_report::{HexStyle, ReportConfig};
//!
//! let config = ReportConfig::from_toml_str(r##"
//!     output_directory = "target/report"
//!     hex_style = "padded"
//!
//!     [palette]
//!     light = ["#8ae234", "#fce94f", "#729fcf", "#e9b96e", "#ad7fa8"]
//!     dark = ["#73d216", "#edd400", "#3465a4", "#c17d11", "#75507b"]
//! "##).unwrap();
//!
//! assert_eq!(config.hex_style, HexStyle::Padded);
//! assert_eq!(config.max_chart_width, 3840);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorSequence, HexStyle, Palette, RgbColor, PALETTE_SIZE};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Report settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ReportConfig {
    /// Directory the report files are written to.
    pub output_directory: PathBuf,

    /// Hex rendering of series colors.
    pub hex_style: HexStyle,

    /// Custom base palettes; Tango when absent.
    pub palette: Option<PaletteConfig>,

    /// Maximum points per dataset before downsampling.
    pub max_chart_width: usize,

    /// Minimum distinct values before a logarithmic axis is considered.
    pub log_scale_min_datasets: usize,

    /// Number of score levels that get their own chart.
    pub charted_score_level_size: usize,

    pub csv: bool,
    pub markdown: bool,
    pub charts: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("benchmark-report"),
            hex_style: HexStyle::Unpadded,
            palette: None,
            max_chart_width: 3840,
            log_scale_min_datasets: 5,
            charted_score_level_size: 15,
            csv: true,
            markdown: true,
            charts: true,
        }
    }
}

/// Two palettes of five hex colors each.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaletteConfig {
    pub light: Vec<String>,
    pub dark: Vec<String>,
}

impl ReportConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML, or
    /// fails [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Loads a file, picking YAML for `.yaml`/`.yml` and TOML otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = dir.into();
        self
    }

    pub fn with_hex_style(mut self, hex_style: HexStyle) -> Self {
        self.hex_style = hex_style;
        self
    }

    pub fn with_palette(mut self, palette: PaletteConfig) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chart_width < 3 {
            return Err(ConfigError::Invalid(format!(
                "max_chart_width must be at least 3, got {}",
                self.max_chart_width
            )));
        }
        if self.charted_score_level_size == 0 {
            return Err(ConfigError::Invalid(
                "charted_score_level_size must be positive".to_string(),
            ));
        }
        if let Some(palette) = &self.palette {
            palette.resolve()?;
        }
        Ok(())
    }

    /// Builds an empty color sequence from the configured palettes and hex style.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_report::ReportConfig;
    ///
    /// let mut colors = ReportConfig::default().color_sequence().unwrap();
    /// assert_eq!(colors.color_for("Late Acceptance"), "#8ae234");
    /// ```
    pub fn color_sequence(&self) -> Result<ColorSequence, ConfigError> {
        let sequence = match &self.palette {
            Some(palette) => {
                let (light, dark) = palette.resolve()?;
                ColorSequence::with_palettes(light, dark)
            }
            None => ColorSequence::new(),
        };
        Ok(sequence.with_hex_style(self.hex_style))
    }
}

impl PaletteConfig {
    /// Parses both palettes.
    pub fn resolve(&self) -> Result<(Palette, Palette), ConfigError> {
        Ok((
            parse_palette("light", &self.light)?,
            parse_palette("dark", &self.dark)?,
        ))
    }
}

fn parse_palette(name: &str, entries: &[String]) -> Result<Palette, ConfigError> {
    if entries.len() != PALETTE_SIZE {
        return Err(ConfigError::Invalid(format!(
            "palette.{} needs {} colors, got {}",
            name,
            PALETTE_SIZE,
            entries.len()
        )));
    }
    let mut palette = [RgbColor::from_packed(0); PALETTE_SIZE];
    for (slot, entry) in palette.iter_mut().zip(entries) {
        *slot = RgbColor::parse_hex(entry).ok_or_else(|| {
            ConfigError::Invalid(format!("palette.{}: {:?} is not a hex color", name, entry))
        })?;
    }
    Ok(palette)
}

#[cfg(test)]
mod tests;
