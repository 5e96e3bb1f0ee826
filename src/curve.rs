//! A module for the S-N curve data model.
//!
//! A curve is a sequence of segments separated by breakpoints. Each segment
//! follows the log-linear relation `log10(N) = q - m * log10(S)`, or is a flat
//! stress plateau when its slope is zero. Breakpoints are given either as a
//! fatigue life or as a stress range on the segment below them.

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, Result};

/// One piece of a multi-segment S-N curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// `log10(N) = intercept - slope * log10(S)`.
    PowerLaw { slope: f64, intercept: f64 },
    /// Stress independent of life, `S = 10^intercept`.
    Constant { intercept: f64 },
}

impl Segment {
    /// Builds a segment from its slope and log-life intercept. A slope of
    /// exactly zero gives a constant-stress segment.
    pub fn new(slope: f64, intercept: f64) -> Self {
        if slope == 0.0 {
            Segment::Constant { intercept }
        } else {
            Segment::PowerLaw { slope, intercept }
        }
    }

    pub fn slope(&self) -> f64 {
        match *self {
            Segment::PowerLaw { slope, .. } => slope,
            Segment::Constant { .. } => 0.0,
        }
    }

    pub fn intercept(&self) -> f64 {
        match *self {
            Segment::PowerLaw { intercept, .. } | Segment::Constant { intercept } => intercept,
        }
    }

    /// Stress range at `fatigue_life` on this segment, before thickness correction.
    pub fn stress_at(&self, fatigue_life: f64) -> f64 {
        match *self {
            Segment::PowerLaw { slope, intercept } => {
                10f64.powf((intercept - fatigue_life.log10()) / slope)
            }
            Segment::Constant { intercept } => 10f64.powf(intercept),
        }
    }

    /// Fatigue life at `stress_range` following this segment's power law.
    pub fn life_at(&self, stress_range: f64) -> f64 {
        10f64.powf(self.intercept() - self.slope() * stress_range.log10())
    }
}

/// A boundary between two consecutive segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Breakpoint {
    /// Boundary given directly as a number of cycles.
    Life(f64),
    /// Boundary given as a stress range on the preceding segment.
    Stress(f64),
}

impl Breakpoint {
    pub fn value(&self) -> f64 {
        match *self {
            Breakpoint::Life(value) | Breakpoint::Stress(value) => value,
        }
    }

    pub fn is_stress(&self) -> bool {
        matches!(self, Breakpoint::Stress(_))
    }
}

/// Log-life intercept as written in a catalog.
///
/// Design codes quote the intercept either as `log10(a)` or as the
/// coefficient `a` of `N = a * S^-m`; both are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Intercept {
    Log(f64),
    Coefficient { coefficient: f64 },
}

impl Intercept {
    pub fn log_life(&self) -> f64 {
        match *self {
            Intercept::Log(q) => q,
            Intercept::Coefficient { coefficient } => coefficient.log10(),
        }
    }
}

/// Serialized form of a curve, with the segment and breakpoint parameters
/// held in parallel lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    pub name: String,
    pub slopes: Vec<f64>,
    pub intercepts: Vec<Intercept>,
    pub thickness_exponent: f64,
    #[serde(default)]
    pub breakpoints: Vec<f64>,
    /// Missing means every breakpoint is a fatigue life.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakpoint_is_stress: Option<Vec<bool>>,
    #[serde(default)]
    pub dnv_thickness_rule: bool,
}

/// An immutable, validated S-N curve.
///
/// Breakpoints are kept in the order they were supplied. They must already
/// be ascending in fatigue life once stress breakpoints are converted; this
/// is not checked here and nothing re-sorts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveRecord", into = "CurveRecord")]
pub struct CurveDefinition {
    name: String,
    segments: Vec<Segment>,
    thickness_exponent: f64,
    breakpoints: Vec<Breakpoint>,
    dnv_thickness_rule: bool,
}

impl CurveDefinition {
    /// Creates a curve from the parallel parameter lists used by the design codes.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::Configuration` when the lists have inconsistent
    /// lengths or contain values the curve cannot be evaluated with.
    ///
    /// # Examples
    ///
    /// ```
    /// use sncurve::curve::CurveDefinition;
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
    /// assert_eq!(curve.segment_count(), 2);
    ///
    /// let broken = CurveDefinition::new("broken", vec![3.0, 5.0], vec![12.449], 0.1, vec![1e7], vec![false], true);
    /// assert!(broken.is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        slopes: Vec<f64>,
        intercepts: Vec<f64>,
        thickness_exponent: f64,
        breakpoints: Vec<f64>,
        breakpoint_is_stress: Vec<bool>,
        dnv_thickness_rule: bool,
    ) -> Result<Self> {
        CurveRecord {
            name: name.into(),
            slopes,
            intercepts: intercepts.into_iter().map(Intercept::Log).collect(),
            thickness_exponent,
            breakpoints,
            breakpoint_is_stress: Some(breakpoint_is_stress),
            dnv_thickness_rule,
        }
        .try_into()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn thickness_exponent(&self) -> f64 {
        self.thickness_exponent
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Whether the DNV effective-thickness formula applies.
    pub fn dnv_thickness_rule(&self) -> bool {
        self.dnv_thickness_rule
    }
}

impl TryFrom<CurveRecord> for CurveDefinition {
    type Error = CurveError;

    fn try_from(record: CurveRecord) -> Result<Self> {
        let name = record.name;
        if name.trim().is_empty() {
            return Err(CurveError::configuration(&name, "name must not be empty"));
        }
        if record.slopes.is_empty() {
            return Err(CurveError::configuration(&name, "at least one segment is required"));
        }
        if record.slopes.len() != record.intercepts.len() {
            return Err(CurveError::configuration(
                &name,
                format!(
                    "{} slopes but {} intercepts",
                    record.slopes.len(),
                    record.intercepts.len()
                ),
            ));
        }
        if record.breakpoints.len() + 1 != record.slopes.len() {
            return Err(CurveError::configuration(
                &name,
                format!(
                    "{} segments need {} breakpoints, got {}",
                    record.slopes.len(),
                    record.slopes.len() - 1,
                    record.breakpoints.len()
                ),
            ));
        }
        let is_stress = record
            .breakpoint_is_stress
            .unwrap_or_else(|| vec![false; record.breakpoints.len()]);
        if is_stress.len() != record.breakpoints.len() {
            return Err(CurveError::configuration(
                &name,
                format!(
                    "{} breakpoints but {} breakpoint kinds",
                    record.breakpoints.len(),
                    is_stress.len()
                ),
            ));
        }
        if !record.thickness_exponent.is_finite() {
            return Err(CurveError::configuration(&name, "thickness exponent must be finite"));
        }

        let mut segments = Vec::with_capacity(record.slopes.len());
        for (i, (&slope, intercept)) in record.slopes.iter().zip(&record.intercepts).enumerate() {
            if let Intercept::Coefficient { coefficient } = intercept {
                if !(coefficient.is_finite() && *coefficient > 0.0) {
                    return Err(CurveError::configuration(
                        &name,
                        format!("coefficient of segment {} must be positive, got {}", i, coefficient),
                    ));
                }
            }
            let intercept = intercept.log_life();
            if !slope.is_finite() || !intercept.is_finite() {
                return Err(CurveError::configuration(
                    &name,
                    format!("segment {} has non-finite parameters", i),
                ));
            }
            segments.push(Segment::new(slope, intercept));
        }

        let mut breakpoints = Vec::with_capacity(record.breakpoints.len());
        for (i, (&value, &stress)) in record.breakpoints.iter().zip(&is_stress).enumerate() {
            if !(value.is_finite() && value > 0.0) {
                return Err(CurveError::configuration(
                    &name,
                    format!("breakpoint {} must be positive, got {}", i, value),
                ));
            }
            if stress {
                if let Segment::Constant { .. } = segments[i] {
                    return Err(CurveError::configuration(
                        &name,
                        format!("stress breakpoint {} follows a constant-stress segment", i),
                    ));
                }
                let life = segments[i].life_at(value);
                if !(life.is_finite() && life > 0.0) {
                    return Err(CurveError::configuration(
                        &name,
                        format!("stress breakpoint {} converts to life {}", i, life),
                    ));
                }
                breakpoints.push(Breakpoint::Stress(value));
            } else {
                breakpoints.push(Breakpoint::Life(value));
            }
        }

        Ok(CurveDefinition {
            name,
            segments,
            thickness_exponent: record.thickness_exponent,
            breakpoints,
            dnv_thickness_rule: record.dnv_thickness_rule,
        })
    }
}

impl From<CurveDefinition> for CurveRecord {
    fn from(curve: CurveDefinition) -> Self {
        let any_stress = curve.breakpoints.iter().any(Breakpoint::is_stress);
        CurveRecord {
            name: curve.name,
            slopes: curve.segments.iter().map(Segment::slope).collect(),
            intercepts: curve
                .segments
                .iter()
                .map(|s| Intercept::Log(s.intercept()))
                .collect(),
            thickness_exponent: curve.thickness_exponent,
            breakpoints: curve.breakpoints.iter().map(Breakpoint::value).collect(),
            breakpoint_is_stress: any_stress
                .then(|| curve.breakpoints.iter().map(Breakpoint::is_stress).collect()),
            dnv_thickness_rule: curve.dnv_thickness_rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record() -> CurveRecord {
        CurveRecord {
            name: String::from("BS const GF (C) prot"),
            slopes: vec![3.5, 5.0, 0.0],
            intercepts: vec![
                Intercept::Coefficient { coefficient: 1.69e13 },
                Intercept::Coefficient { coefficient: 2.92e16 },
                Intercept::Log(1.89308),
            ],
            thickness_exponent: 0.0,
            breakpoints: vec![144.0, 1e7],
            breakpoint_is_stress: Some(vec![true, false]),
            dnv_thickness_rule: false,
        }
    }

    #[test]
    fn test_segment_kinds() {
        let curve = CurveDefinition::try_from(record()).unwrap();
        assert_eq!(curve.segment_count(), 3);
        assert!(matches!(curve.segments()[0], Segment::PowerLaw { .. }));
        assert!(matches!(curve.segments()[2], Segment::Constant { .. }));
        assert_relative_eq!(curve.segments()[0].intercept(), 1.69e13_f64.log10(), epsilon = 1e-12);
        assert_eq!(curve.breakpoints(), &[Breakpoint::Stress(144.0), Breakpoint::Life(1e7)]);
    }

    #[test]
    fn test_segment_power_law() {
        let segment = Segment::new(3.0, 12.449);
        assert_relative_eq!(segment.stress_at(1e4), 10f64.powf((12.449 - 4.0) / 3.0), epsilon = 1e-9);
        let stress = segment.stress_at(2e6);
        assert_relative_eq!(segment.life_at(stress), 2e6, max_relative = 1e-12);
        let plateau = Segment::new(0.0, 1.656);
        assert_eq!(plateau.stress_at(1e9), 10f64.powf(1.656));
        assert_eq!(plateau.stress_at(1e12), plateau.stress_at(1e9));
    }

    #[test]
    fn test_missing_breakpoint_kinds_default_to_life() {
        let mut record = record();
        record.breakpoint_is_stress = None;
        let curve = CurveDefinition::try_from(record).unwrap();
        assert!(curve.breakpoints().iter().all(|b| !b.is_stress()));
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let mut r = record();
        r.intercepts.pop();
        assert!(CurveDefinition::try_from(r).is_err());

        let mut r = record();
        r.breakpoints.push(5e7);
        assert!(CurveDefinition::try_from(r).is_err());

        let mut r = record();
        r.breakpoint_is_stress = Some(vec![true]);
        assert!(CurveDefinition::try_from(r).is_err());

        let mut r = record();
        r.slopes.clear();
        r.intercepts.clear();
        r.breakpoints.clear();
        r.breakpoint_is_stress = None;
        assert!(CurveDefinition::try_from(r).is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut r = record();
        r.name = String::from("  ");
        assert!(CurveDefinition::try_from(r).is_err());

        let mut r = record();
        r.breakpoints[1] = -1.0;
        assert!(CurveDefinition::try_from(r).is_err());

        let mut r = record();
        r.slopes[0] = f64::NAN;
        assert!(CurveDefinition::try_from(r).is_err());

        let mut r = record();
        r.intercepts[1] = Intercept::Coefficient { coefficient: 0.0 };
        assert!(CurveDefinition::try_from(r).is_err());

        let mut r = record();
        r.thickness_exponent = f64::INFINITY;
        assert!(CurveDefinition::try_from(r).is_err());
    }

    #[test]
    fn test_rejects_stress_breakpoint_after_plateau() {
        let result = CurveDefinition::new(
            "plateau first",
            vec![0.0, 3.0],
            vec![1.9, 12.0],
            0.0,
            vec![80.0],
            vec![true],
            false,
        );
        match result {
            Err(CurveError::Configuration { curve, .. }) => assert_eq!(curve, "plateau first"),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_stress_breakpoint_without_finite_life() {
        let result = CurveDefinition::new(
            "overflowing knee",
            vec![3.0, 5.0],
            vec![300.0, 16.0],
            0.0,
            vec![1e-5],
            vec![true],
            false,
        );
        match result {
            Err(CurveError::Configuration { curve, reason }) => {
                assert_eq!(curve, "overflowing knee");
                assert!(reason.contains("stress breakpoint 0"), "{}", reason);
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_yaml_intercept_notation() {
        let yaml = r#"
name: "BS const/var GF (C) corr"
slopes: [3.5]
intercepts: [{ coefficient: 1.41e13 }]
thickness_exponent: 0.0
"#;
        let curve: CurveDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(curve.segment_count(), 1);
        assert!(curve.breakpoints().is_empty());
        assert!(!curve.dnv_thickness_rule());
        assert_relative_eq!(curve.segments()[0].intercept(), 1.41e13_f64.log10(), epsilon = 1e-12);
    }

    #[test]
    fn test_yaml_rejects_invalid_curve() {
        let yaml = r#"
name: "short"
slopes: [3.0, 5.0]
intercepts: [12.449, 16.081]
thickness_exponent: 0.1
"#;
        assert!(serde_yaml::from_str::<CurveDefinition>(yaml).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let curve = CurveDefinition::try_from(record()).unwrap();
        let json = serde_json::to_string(&curve).unwrap();
        let back: CurveDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);
    }
}
