//! Effective thickness used by the thickness-correction factor.

/// Reference thickness in millimetres. Thinner plates are not credited.
pub const REFERENCE_THICKNESS: f64 = 25.0;

/// Nominal thickness above which the DNV linear correction applies.
pub const DNV_THRESHOLD: f64 = 32.5;

/// Returns the effective thickness (mm) for a nominal plate thickness.
///
/// Thicknesses below the 25 mm reference are floored to it. Above that,
/// the DNV rule replaces thicknesses from 32.5 mm upwards by
/// `15.98 + 0.51 * t`; other curves use the nominal value.
///
/// # Examples
///
/// ```
/// use sncurve::thickness::effective_thickness;
///
/// assert_eq!(effective_thickness(12.0, true), 25.0);
/// assert_eq!(effective_thickness(30.0, true), 30.0);
/// assert!((effective_thickness(50.0, true) - 41.48).abs() < 1e-12);
/// assert_eq!(effective_thickness(50.0, false), 50.0);
/// ```
pub fn effective_thickness(nominal_thickness: f64, dnv_thickness_rule: bool) -> f64 {
    if nominal_thickness < REFERENCE_THICKNESS {
        return REFERENCE_THICKNESS;
    }
    if dnv_thickness_rule && nominal_thickness >= DNV_THRESHOLD {
        15.98 + 0.51 * nominal_thickness
    } else {
        nominal_thickness
    }
}

/// Thickness-correction factor `(t_eff / 25)^k`.
pub fn correction_factor(effective_thickness: f64, thickness_exponent: f64) -> f64 {
    (effective_thickness / REFERENCE_THICKNESS).powf(thickness_exponent)
}
