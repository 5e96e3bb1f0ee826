//! A module for the main application logic of the S-N curve tool.
use std::fs::File;
use std::io::{self, Write};

use anyhow::{anyhow, Context, Result};
use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::CurveCatalog;
use crate::config::{load_config, Config, Format};
use crate::curve::CurveDefinition;
use crate::sampler::{generate_points, SamplePoint};
use crate::stress::calculate_stress;

/// A curve to evaluate at a given plate thickness.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub curve: &'a CurveDefinition,
    pub thickness: f64,
}

/// Evaluation results for one curve.
#[derive(Debug, Clone, Serialize)]
pub struct CurveReport {
    pub curve: String,
    pub thickness: f64,
    /// Plot points from the sampler.
    pub points: Vec<SamplePoint>,
    /// Stress ranges at the requested lives.
    pub queries: Vec<SamplePoint>,
}

#[derive(Serialize)]
struct Row<'a> {
    curve: &'a str,
    thickness: f64,
    kind: &'static str,
    fatigue_life: f64,
    stress_range: f64,
}

/// Loads the catalog at `path`, or the standard curves when there is none.
pub fn load_catalog(path: Option<&str>) -> Result<CurveCatalog> {
    match path {
        Some(path) => CurveCatalog::load(path),
        None => CurveCatalog::standard(),
    }
}

/// Picks the curves a configuration asks for.
pub fn select<'a>(config: &Config, catalog: &'a CurveCatalog) -> Result<Vec<Request<'a>>> {
    let requests: Vec<Request> = if config.selection.curves.is_empty() {
        catalog
            .filter(config.selection.filters.as_slice())
            .into_iter()
            .map(|curve| Request { curve, thickness: config.thickness })
            .collect()
    } else {
        config
            .selection
            .curves
            .iter()
            .map(|choice| -> Result<Request<'a>> {
                Ok(Request {
                    curve: catalog.find(&choice.name)?,
                    thickness: choice.thickness.unwrap_or(config.thickness),
                })
            })
            .collect::<Result<_>>()?
    };
    if requests.is_empty() {
        return Err(anyhow!("no curves match filters {:?}", config.selection.filters));
    }
    Ok(requests)
}

/// Samples every requested curve and evaluates it at `lives`.
pub fn evaluate(requests: &[Request], lives: &[f64]) -> Result<Vec<CurveReport>> {
    requests
        .par_iter()
        .map(|request| -> Result<CurveReport> {
            let points = generate_points(request.thickness, request.curve)?;
            let queries = lives
                .iter()
                .map(|&fatigue_life| {
                    Ok(SamplePoint {
                        fatigue_life,
                        stress_range: calculate_stress(fatigue_life, request.thickness, request.curve)?,
                    })
                })
                .collect::<crate::error::Result<Vec<_>>>()?;
            Ok(CurveReport {
                curve: request.curve.name().to_owned(),
                thickness: request.thickness,
                points,
                queries,
            })
        })
        .collect()
}

/// Writes reports as CSV rows or as a JSON array.
pub fn write_reports<W: Write>(reports: &[CurveReport], format: Format, mut writer: W) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, reports)?;
            writeln!(writer)?;
        }
        Format::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for report in reports {
                let samples = report.points.iter().map(|p| ("sample", p));
                let queries = report.queries.iter().map(|p| ("query", p));
                for (kind, point) in samples.chain(queries) {
                    csv.serialize(Row {
                        curve: &report.curve,
                        thickness: report.thickness,
                        kind,
                        fatigue_life: point.fatigue_life,
                        stress_range: point.stress_range,
                    })?;
                }
            }
            csv.flush()?;
        }
    }
    Ok(())
}

/// Runs a YAML configuration and writes its report.
///
/// `catalog` replaces the catalog named in the configuration.
pub fn run(config_path: &str, catalog: Option<&str>) -> Result<()> {
    info!("Running with configuration: {}", config_path);
    let conf = load_config(config_path)?;
    conf.validate()
        .with_context(|| format!("Invalid configuration '{}'", config_path))?;
    let catalog = load_catalog(catalog.or(conf.catalog.as_deref()))?;
    let requests = select(&conf, &catalog)?;
    info!("Evaluating {} curves", requests.len());
    let reports = evaluate(&requests, &conf.lives)?;

    match &conf.output.path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create '{}'", path))?;
            write_reports(&reports, conf.output.format, file)?;
            info!("Results written to {}", path);
        }
        None => write_reports(&reports, conf.output.format, io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_select_by_filters() {
        let config = load_config("tests/config.yaml").unwrap();
        let catalog = load_catalog(config.catalog.as_deref()).unwrap();
        let requests = select(&config, &catalog).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].curve.name(), "Test GF air");
        assert_eq!(requests[0].thickness, 40.0);
    }

    #[test]
    fn test_select_explicit_curves() {
        let config = load_config("tests/custom.yaml").unwrap();
        assert!(config.validate().is_ok());
        let catalog = load_catalog(None).unwrap();
        let requests = select(&config, &catalog).unwrap();
        let picked: Vec<(&str, f64)> = requests.iter().map(|r| (r.curve.name(), r.thickness)).collect();
        assert_eq!(picked, vec![("DNV 2021 GF (C1) air", 50.0), ("EC AW (90) air", 25.0)]);
    }

    #[test]
    fn test_select_curves_take_precedence_over_filters() {
        let yaml = "thickness: 30\nselection:\n  filters: [BS, prot]\n  curves:\n    - name: \"New AW air\"\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        let catalog = load_catalog(None).unwrap();
        let requests = select(&config, &catalog).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].curve.name(), "New AW air");
        assert_eq!(requests[0].thickness, 30.0);
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = std::env::temp_dir().join(format!("sncurve-run-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let output = dir.join("points.csv");
        let config_path = dir.join("run.yaml");
        let yaml = format!(
            "catalog: tests/catalog.yaml\nthickness: 40.0\nselection:\n  filters: [air]\nlives: [2.0e6]\noutput:\n  format: CSV\n  path: {:?}\n",
            output.display().to_string()
        );
        std::fs::write(&config_path, yaml).unwrap();

        run(config_path.to_str().unwrap(), None).unwrap();
        let text = std::fs::read_to_string(&output).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("curve,thickness,kind,fatigue_life,stress_range"));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 3 + 1);
        assert!(rows.iter().all(|r| r.starts_with("Test GF air,40.0,")));
        assert!(rows[3].starts_with("Test GF air,40.0,query,2000000.0,"));

        // A catalog given to run replaces the one in the file.
        std::fs::remove_file(&output).unwrap();
        assert!(run(config_path.to_str().unwrap(), Some("tests/missing.yaml")).is_err());
        run(config_path.to_str().unwrap(), Some("tests/catalog.json")).unwrap();
        assert!(output.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_select_errors() {
        let catalog = load_catalog(None).unwrap();
        let config: Config = serde_yaml::from_str("thickness: 30\nselection:\n  filters: [EC, prot]\n").unwrap();
        assert!(select(&config, &catalog).is_err());
        let config: Config =
            serde_yaml::from_str("thickness: 30\nselection:\n  curves:\n    - name: unknown\n").unwrap();
        assert!(select(&config, &catalog).is_err());
    }

    #[test]
    fn test_evaluate_and_write() {
        let config = load_config("tests/custom.yaml").unwrap();
        let catalog = load_catalog(None).unwrap();
        let requests = select(&config, &catalog).unwrap();
        let reports = evaluate(&requests, &config.lives).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].curve, "DNV 2021 GF (C1) air");
        assert_eq!(reports[0].points.len(), 3);
        assert_eq!(reports[1].points.len(), 4);
        assert_eq!(reports[1].queries.len(), 2);
        let expected = calculate_stress(2.0e6, 50.0, requests[0].curve).unwrap();
        assert_relative_eq!(reports[0].queries[0].stress_range, expected, epsilon = 1e-12);

        let mut buffer = Vec::new();
        write_reports(&reports, Format::Csv, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("curve,thickness,kind,fatigue_life,stress_range"));
        assert_eq!(text.lines().count(), 1 + 3 + 2 + 4 + 2);
        assert!(text.lines().nth(1).unwrap().starts_with("DNV 2021 GF (C1) air,50.0,sample,10000.0,"));

        let mut buffer = Vec::new();
        write_reports(&reports, Format::Json, &mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1]["curve"], "EC AW (90) air");
        assert_eq!(json[0]["points"][1]["fatigue_life"], 1e7);
    }

    #[test]
    fn test_evaluate_rejects_bad_life() {
        let catalog = load_catalog(None).unwrap();
        let requests = vec![Request { curve: catalog.find("New AW air").unwrap(), thickness: 25.0 }];
        assert!(evaluate(&requests, &[1e6, 0.0]).is_err());
    }
}
