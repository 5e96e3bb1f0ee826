//! Point sampling for log-log plots of a curve.

use log::debug;
use serde::Serialize;

use crate::curve::CurveDefinition;
use crate::error::{ensure_positive, Result};
use crate::segment::breakpoint_lives;
use crate::stress::calculate_stress;

/// Fixed ends of the sampled life axis, in cycles.
pub const REFERENCE_LIVES: [f64; 2] = [1e4, 1e9];

/// A (fatigue life, stress range) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    pub fatigue_life: f64,
    pub stress_range: f64,
}

/// Samples `curve` at the reference lives and at every breakpoint.
///
/// The points are ascending in fatigue life. Repeated lives are kept, so
/// the result always holds `2 + breakpoints` points.
///
/// # Errors
///
/// Returns `CurveError::InvalidInput` when `nominal_thickness` is not
/// finite and positive.
///
/// # Examples
///
/// ```
/// use sncurve::curve::CurveDefinition;
/// use sncurve::sampler::generate_points;
///
/// let curve = CurveDefinition::new(
///     "DNV 2021 GF (C1) air",
///     vec![3.0, 5.0],
///     vec![12.449, 16.081],
///     0.1,
///     vec![1e7],
///     vec![false],
///     true,
/// ).unwrap();
/// let points = generate_points(25.0, &curve).unwrap();
/// let lives: Vec<f64> = points.iter().map(|p| p.fatigue_life).collect();
/// assert_eq!(lives, vec![1e4, 1e7, 1e9]);
/// ```
pub fn generate_points(nominal_thickness: f64, curve: &CurveDefinition) -> Result<Vec<SamplePoint>> {
    ensure_positive("thickness", nominal_thickness)?;

    let mut lives: Vec<f64> = REFERENCE_LIVES.to_vec();
    lives.extend(breakpoint_lives(curve));
    lives.sort_by(f64::total_cmp);
    debug!("{}: sampling lives {:?}", curve.name(), lives);

    lives
        .into_iter()
        .map(|fatigue_life| {
            Ok(SamplePoint {
                fatigue_life,
                stress_range: calculate_stress(fatigue_life, nominal_thickness, curve)?,
            })
        })
        .collect()
}
