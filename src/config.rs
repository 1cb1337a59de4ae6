// src/config.rs

use crate::model::Earth;
use crate::rendering::canvas::{Rgb, WHITE};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
  #[error("Invalid setting: {0}")]
  Invalid(String),
}

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
  Png,
  Pdf,
  Svg,
}

impl ExportFormat {
  pub fn extension(self) -> &'static str {
    match self {
      ExportFormat::Png => "png",
      ExportFormat::Pdf => "pdf",
      ExportFormat::Svg => "svg",
    }
  }

  pub fn from_extension(ext: &str) -> Option<Self> {
    match ext.to_lowercase().as_str() {
      "png" => Some(ExportFormat::Png),
      "pdf" => Some(ExportFormat::Pdf),
      "svg" => Some(ExportFormat::Svg),
      _ => None,
    }
  }
}

// --- FigureStyle ---

/// Page geometry and base sizes shared by every frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureStyle {
  pub width_in: f64,
  pub height_in: f64,
  /// Raster resolution. 100 gives 720p, 150 gives 1080p.
  pub dpi: f64,
  /// Points.
  pub font_size: f64,
  /// Points.
  pub line_width: f64,
  pub background: Rgb,
}

impl Default for FigureStyle {
  fn default() -> Self {
    Self {
      width_in: 12.8,
      height_in: 7.2,
      dpi: 150.0,
      font_size: 10.0,
      line_width: 1.5,
      background: WHITE,
    }
  }
}

impl FigureStyle {
  /// Raster size in pixels.
  pub fn pixel_size(&self) -> (i32, i32) {
    (
      (self.width_in * self.dpi).round() as i32,
      (self.height_in * self.dpi).round() as i32,
    )
  }

  /// Vector page size in points.
  pub fn page_size(&self) -> (f64, f64) {
    (self.width_in * 72.0, self.height_in * 72.0)
  }
}

// --- Output ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
  pub dir: PathBuf,
  pub prefix: String,
  pub format: ExportFormat,
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      dir: PathBuf::from("."),
      prefix: "earth".to_string(),
      format: ExportFormat::Png,
    }
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
  #[serde(default)]
  pub earth: Earth,

  #[serde(default)]
  pub style: FigureStyle,

  #[serde(default)]
  pub output: OutputConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      earth: Earth::default(),
      style: FigureStyle::default(),
      output: OutputConfig::default(),
    }
  }
}

impl Config {
  /// Loads config from the standard OS location (e.g., ~/.config/earthtilt/settings.json),
  /// or from `explicit` when given. Falls back to defaults; the message says which,
  /// and is an `Err` when a file existed but could not be read.
  pub fn load(explicit: Option<&Path>) -> (Self, Result<String, String>) {
    let path = explicit.map(Path::to_path_buf).unwrap_or_else(Self::get_path);
    if path.exists() {
      match Self::read_from(&path) {
        Ok(cfg) => (cfg, Ok(format!("Config loaded from {:?}", path))),
        Err(e) => (
          Self::default(),
          Err(format!("Error reading config {:?}: {}. Using defaults.", path, e)),
        ),
      }
    } else {
      (
        Self::default(),
        Ok("No config found. Using defaults.".to_string()),
      )
    }
  }

  pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
  }

  /// Saves config to `explicit` or the standard OS location.
  pub fn save(&self, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = explicit.map(Path::to_path_buf).unwrap_or_else(Self::get_path);
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
      }
    }

    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, self)?;
    Ok(path)
  }

  /// Rejects settings that cannot produce a picture.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let e = &self.earth;
    if !(-90.0..=90.0).contains(&e.latitude) {
      return Err(ConfigError::Invalid(format!("latitude {} outside [-90, 90]", e.latitude)));
    }
    if !(-90.0..=90.0).contains(&e.axial_tilt) {
      return Err(ConfigError::Invalid(format!("axial tilt {} outside [-90, 90]", e.axial_tilt)));
    }
    if !(e.radius > 0.0) || !(e.person_scale > 0.0) {
      return Err(ConfigError::Invalid("radius and person scale must be positive".into()));
    }

    let s = &self.style;
    if !(s.dpi > 0.0) || !(s.width_in > 0.0) || !(s.height_in > 0.0) {
      return Err(ConfigError::Invalid("figure size and dpi must be positive".into()));
    }
    if self.output.prefix.is_empty() {
      return Err(ConfigError::Invalid("output prefix is empty".into()));
    }
    Ok(())
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "mavensgroup", "earthtilt") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_is_1080p() {
    assert_eq!(FigureStyle::default().pixel_size(), (1920, 1080));
  }

  #[test]
  fn test_partial_json_takes_defaults() {
    let cfg: Config = serde_json::from_str(r#"{ "earth": { "latitude": 10.0 } }"#).unwrap();
    assert_eq!(cfg.earth.latitude, 10.0);
    assert_eq!(cfg.earth.axial_tilt, -23.5);
    assert_eq!(cfg.earth.radius, 10.0);
    assert_eq!(cfg.style, FigureStyle::default());
    assert_eq!(cfg.output.prefix, "earth");
  }

  #[test]
  fn test_partial_earth_keeps_storyboard_latitude() {
    let cfg: Config = serde_json::from_str(r#"{ "earth": { "axial_tilt": -10.0 } }"#).unwrap();
    assert_eq!(cfg.earth.axial_tilt, -10.0);
    assert_eq!(cfg.earth.latitude, Config::default().earth.latitude);
    assert_eq!(cfg.earth.latitude, 42.0);

    let empty: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, Config::default());
  }

  #[test]
  fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut cfg = Config::default();
    cfg.earth.latitude = -33.9;
    cfg.output.format = ExportFormat::Svg;
    cfg.save(Some(path.as_path())).unwrap();

    let (loaded, msg) = Config::load(Some(path.as_path()));
    assert!(msg.unwrap().starts_with("Config loaded"));
    assert_eq!(loaded, cfg);
  }

  #[test]
  fn test_broken_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();

    let (cfg, msg) = Config::load(Some(path.as_path()));
    assert_eq!(cfg, Config::default());
    assert!(msg.unwrap_err().starts_with("Error reading config"));
  }

  #[test]
  fn test_missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (cfg, msg) = Config::load(Some(dir.path().join("absent.json").as_path()));
    assert_eq!(cfg, Config::default());
    assert!(msg.is_ok());
  }

  #[test]
  fn test_validate_rejects_bad_values() {
    let mut cfg = Config::default();
    assert!(cfg.validate().is_ok());

    cfg.earth.latitude = 91.0;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.style.dpi = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.earth.radius = f64::NAN;
    assert!(cfg.validate().is_err());
  }

  #[test]
  fn test_format_from_extension() {
    assert_eq!(ExportFormat::from_extension("PNG"), Some(ExportFormat::Png));
    assert_eq!(ExportFormat::from_extension("svg"), Some(ExportFormat::Svg));
    assert_eq!(ExportFormat::from_extension("jpg"), None);
  }
}
