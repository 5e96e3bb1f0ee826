//! Stress range evaluation on an S-N curve.

use log::trace;

use crate::curve::CurveDefinition;
use crate::error::{ensure_positive, Result};
use crate::segment::select_segment;
use crate::thickness::{correction_factor, effective_thickness};

/// Thickness-corrected stress range (MPa) at `fatigue_life` cycles.
///
/// The segment containing `fatigue_life` gives the base stress, which is
/// then divided by `(t_eff / 25)^k` with `k` the curve's thickness exponent.
///
/// # Errors
///
/// Returns `CurveError::InvalidInput` when `fatigue_life` or
/// `nominal_thickness` is not finite and positive.
///
/// # Examples
///
/// ```
/// use sncurve::curve::CurveDefinition;
/// use sncurve::stress::calculate_stress;
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
/// let stress = calculate_stress(1e4, 25.0, &curve).unwrap();
/// assert!((stress - 655.14).abs() < 0.01);
/// assert!(calculate_stress(0.0, 25.0, &curve).is_err());
/// ```
pub fn calculate_stress(
    fatigue_life: f64,
    nominal_thickness: f64,
    curve: &CurveDefinition,
) -> Result<f64> {
    ensure_positive("fatigue life", fatigue_life)?;
    ensure_positive("thickness", nominal_thickness)?;

    let t_eff = effective_thickness(nominal_thickness, curve.dnv_thickness_rule());
    let segment = select_segment(fatigue_life, curve);
    let base = curve.segments()[segment].stress_at(fatigue_life);
    let stress = base / correction_factor(t_eff, curve.thickness_exponent());
    trace!(
        "{}: N={:e} t={} t_eff={} segment={} S={}",
        curve.name(),
        fatigue_life,
        nominal_thickness,
        t_eff,
        segment,
        stress
    );
    Ok(stress)
}
