//! A module for loading and validating run configurations.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Smallest plate thickness (mm) accepted in a run.
pub const MIN_THICKNESS: f64 = 1.0;
/// Largest plate thickness (mm) accepted in a run.
pub const MAX_THICKNESS: f64 = 100.0;

/// Represents a run of the S-N curve tool.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Catalog file to use instead of the standard curves.
    pub catalog: Option<String>,
    /// Plate thickness (mm) for every curve without its own.
    pub thickness: f64,
    #[serde(default)]
    pub selection: Selection,
    /// Extra fatigue lives at which to report the stress range.
    #[serde(default)]
    pub lives: Vec<f64>,
    #[serde(default)]
    pub output: Output,
}

impl Config {
    /// Validates the entire configuration.
    pub fn validate(&self) -> Result<()> {
        validate_thickness(self.thickness)?;
        for life in &self.lives {
            if !(life.is_finite() && *life > 0.0) {
                return Err(anyhow!("lives must be greater than 0, got {}", life));
            }
        }
        self.selection.validate()?;
        Ok(())
    }
}

/// Which catalog curves a run evaluates.
///
/// Explicit `curves` take precedence; otherwise every curve matching all
/// `filters` is used.
#[derive(Debug, Default, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub curves: Vec<CurveChoice>,
}

impl Selection {
    pub fn validate(&self) -> Result<()> {
        if self.filters.iter().any(|f| f.trim().is_empty()) {
            return Err(anyhow!("filters must not contain empty keywords"));
        }
        for choice in &self.curves {
            if choice.name.trim().is_empty() {
                return Err(anyhow!("curve name must not be empty"));
            }
            if let Some(t) = choice.thickness {
                validate_thickness(t).with_context(|| format!("curve '{}'", choice.name))?;
            }
        }
        Ok(())
    }
}

/// A curve picked by name, optionally with its own thickness.
#[derive(Debug, Deserialize)]
pub struct CurveChoice {
    pub name: String,
    pub thickness: Option<f64>,
}

/// Output format of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Format {
    #[default]
    Csv,
    Json,
}

/// Where and how results are written.
#[derive(Debug, Default, Deserialize)]
pub struct Output {
    #[serde(default)]
    pub format: Format,
    /// Output file; standard output when absent.
    pub path: Option<String>,
}

/// Checks a thickness against the accepted input range.
pub fn validate_thickness(thickness: f64) -> Result<()> {
    if !(MIN_THICKNESS..=MAX_THICKNESS).contains(&thickness) {
        return Err(anyhow!(
            "thickness must be between {} and {} mm, got {}",
            MIN_THICKNESS,
            MAX_THICKNESS,
            thickness
        ));
    }
    Ok(())
}

/// Loads the configuration from a YAML file.
///
/// # Errors
///
/// This function will return an error if reading or parsing the configuration file fails.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<Config> {
    let path = config_path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config '{}'", path.display()))?;
    let config: Config = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config '{}'", path.display()))?;
    Ok(config)
}
