//! A module for named collections of S-N curves.
//!
//! The catalog is plain data: an ordered list of curve definitions read from
//! YAML, TOML or JSON. The standard design-code curves ship with the crate in
//! `data/standard_curves.yaml`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use log::{debug, warn};
use serde::Deserialize;

use crate::curve::CurveDefinition;
use crate::error::{CurveError, Result};
use crate::segment::breakpoints_in_order;

const STANDARD_CURVES: &str = include_str!("../data/standard_curves.yaml");

/// Keyword groups for comparing related standard curves, e.g. all
/// "DNV 2021 GF" curves across environments.
pub const COMPARISONS: [&str; 16] = [
    "DNV 2021 GF",
    "DNV 2021 AW",
    "DNV 2024 GF",
    "DNV 2024 AW",
    "BS const GF",
    "BS const AW",
    "BS var GF",
    "BS var AW",
    "EC GF",
    "EC AW",
    "GF air",
    "AW air",
    "GF prot",
    "AW prot",
    "GF corr",
    "AW corr",
];

/// On-disk layout of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    curves: Vec<CurveDefinition>,
}

/// An ordered collection of curves with unique names.
#[derive(Debug, Clone, Default)]
pub struct CurveCatalog {
    curves: Vec<CurveDefinition>,
}

impl CurveCatalog {
    /// Builds a catalog, keeping the given order.
    ///
    /// Returns `CurveError::DuplicateCurve` if two curves share a name.
    /// Curves whose breakpoints are not ascending in life are accepted but
    /// logged, since segment selection relies on the stored order.
    pub fn new(curves: Vec<CurveDefinition>) -> Result<Self> {
        let mut names = HashSet::new();
        for curve in &curves {
            if !names.insert(curve.name()) {
                return Err(CurveError::DuplicateCurve(curve.name().to_owned()));
            }
            if !breakpoints_in_order(curve) {
                warn!("curve '{}' has breakpoints out of ascending life order", curve.name());
            }
        }
        debug!("catalog with {} curves", curves.len());
        Ok(CurveCatalog { curves })
    }

    /// The built-in DNV, BS 7608 and Eurocode curves.
    pub fn standard() -> anyhow::Result<Self> {
        Self::from_yaml_str(STANDARD_CURVES).context("Failed to parse the standard curve catalog")
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        Ok(Self::new(file.curves)?)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Ok(Self::new(file.curves)?)
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Ok(Self::new(file.curves)?)
    }

    /// Loads a catalog file, choosing the format from its extension
    /// (`yaml`/`yml`, `toml` or `json`).
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog '{}'", path.display()))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let catalog = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => {
                return Err(anyhow!(
                    "catalog must be a .yaml, .yml, .toml or .json file, got '{}'",
                    path.display()
                ))
            }
        };
        catalog.with_context(|| format!("Failed to parse catalog '{}'", path.display()))
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn curves(&self) -> &[CurveDefinition] {
        &self.curves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CurveDefinition> {
        self.curves.iter()
    }

    /// Looks up a curve by its exact name.
    pub fn find(&self, name: &str) -> Result<&CurveDefinition> {
        self.curves
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| CurveError::UnknownCurve(name.to_owned()))
    }

    /// Curves whose name contains every keyword, ignoring case. No keywords
    /// selects the whole catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use sncurve::catalog::CurveCatalog;
    ///
    /// let catalog = CurveCatalog::standard().unwrap();
    /// let names: Vec<&str> = catalog.filter(&["ec", "AW"]).iter().map(|c| c.name()).collect();
    /// assert_eq!(names, vec!["EC AW (90) air"]);
    /// ```
    pub fn filter<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<&CurveDefinition> {
        let keywords: Vec<String> = keywords.iter().map(|k| k.as_ref().to_lowercase()).collect();
        self.curves
            .iter()
            .filter(|curve| {
                let name = curve.name().to_lowercase();
                keywords.iter().all(|k| name.contains(k.as_str()))
            })
            .collect()
    }

    /// Curves of the comparison group with 1-based `number` in [`COMPARISONS`].
    pub fn comparison(&self, number: usize) -> Result<Vec<&CurveDefinition>> {
        comparison_group(number).map(|group| self.filter(comparison_keywords(group).as_slice()))
    }
}

impl<'a> IntoIterator for &'a CurveCatalog {
    type Item = &'a CurveDefinition;
    type IntoIter = std::slice::Iter<'a, CurveDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

/// Keyword group with 1-based `number`, as listed by `sncurve comparisons`.
pub fn comparison_group(number: usize) -> Result<&'static str> {
    number
        .checked_sub(1)
        .and_then(|i| COMPARISONS.get(i).copied())
        .ok_or(CurveError::UnknownComparison {
            number,
            max: COMPARISONS.len(),
        })
}

/// Splits a space separated keyword group.
pub fn comparison_keywords(group: &str) -> Vec<&str> {
    group.split_whitespace().collect()
}
