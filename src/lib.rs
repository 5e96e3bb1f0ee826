// src/lib.rs
//! Stress-life (S-N) curves of the structural fatigue design codes.
//!
//! A [`curve::CurveDefinition`] holds the segments and breakpoints of one
//! curve. [`stress::calculate_stress`] gives the thickness-corrected stress
//! range at a fatigue life and [`sampler::generate_points`] the points needed
//! to draw the curve on a log-log plot. [`catalog::CurveCatalog`] carries the
//! standard DNV, BS 7608 and Eurocode curves.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

pub mod app_logic;
pub mod catalog;
pub mod config;
pub mod curve;
pub mod error;
pub mod sampler;
pub mod segment;
pub mod stress;
pub mod thickness;

pub use curve::CurveDefinition;
pub use error::CurveError;
pub use sampler::{generate_points, SamplePoint};
pub use stress::calculate_stress;

// When the "wasm" feature is enabled, use wasm_bindgen to expose functions to the host environment.
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn sample_standard_curve(name: &str, thickness: f64) -> Result<Vec<f64>, JsValue> {
    let catalog = catalog::CurveCatalog::standard().map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    let curve = catalog.find(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let points = generate_points(thickness, curve).map_err(|e| JsValue::from_str(&e.to_string()))?;
    // Lives first, then stresses, in one flat array for the JavaScript side.
    Ok(points
        .iter()
        .map(|p| p.fatigue_life)
        .chain(points.iter().map(|p| p.stress_range))
        .collect())
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn standard_curve_names() -> Result<Vec<String>, JsValue> {
    let catalog = catalog::CurveCatalog::standard().map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    Ok(catalog.iter().map(|curve| curve.name().to_owned()).collect())
}
