//! Segment selection for a fatigue life.

use log::debug;

use crate::curve::{Breakpoint, CurveDefinition};

/// Life-equivalent of the breakpoint at `index`.
///
/// Stress breakpoints are converted with the power law of the segment that
/// precedes them, `N = 10^(q_i - m_i * log10(S))`.
///
/// # Panics
///
/// Panics if `index` is not a breakpoint index of `curve`.
pub fn breakpoint_life(curve: &CurveDefinition, index: usize) -> f64 {
    match curve.breakpoints()[index] {
        Breakpoint::Life(life) => life,
        Breakpoint::Stress(stress) => curve.segments()[index].life_at(stress),
    }
}

/// Life-equivalents of all breakpoints, in stored order.
pub fn breakpoint_lives(curve: &CurveDefinition) -> impl Iterator<Item = f64> + '_ {
    (0..curve.breakpoints().len()).map(move |i| breakpoint_life(curve, i))
}

/// Whether the breakpoint lives are non-decreasing.
pub fn breakpoints_in_order(curve: &CurveDefinition) -> bool {
    let lives: Vec<f64> = breakpoint_lives(curve).collect();
    lives.windows(2).all(|w| w[0] <= w[1])
}

/// Index of the segment that applies at `fatigue_life`.
///
/// Breakpoints are scanned in stored order; the scan stops at the first
/// boundary with `fatigue_life < boundary`. A life equal to a boundary
/// belongs to the segment above it.
///
/// # Examples
///
/// ```
/// use sncurve::curve::CurveDefinition;
/// use sncurve::segment::select_segment;
///
/// let curve = CurveDefinition::new(
///     "EC GF (112) air",
///     vec![3.0, 5.0, 0.0],
///     vec![12.449, 16.282, 1.656],
///     0.2,
///     vec![5e6, 1e8],
///     vec![false, false],
///     false,
/// ).unwrap();
/// assert_eq!(select_segment(1e5, &curve), 0);
/// assert_eq!(select_segment(5e6, &curve), 1);
/// assert_eq!(select_segment(1e9, &curve), 2);
/// ```
pub fn select_segment(fatigue_life: f64, curve: &CurveDefinition) -> usize {
    let mut segment = 0;
    for (i, boundary) in breakpoint_lives(curve).enumerate() {
        if fatigue_life < boundary {
            break;
        }
        segment = i + 1;
    }
    debug!("{}: life {:e} in segment {}", curve.name(), fatigue_life, segment);
    segment
}
