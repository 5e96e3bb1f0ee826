use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::error;
use std::io;

use sncurve::app_logic::{self, Request};
use sncurve::catalog::{comparison_group, comparison_keywords, COMPARISONS};
use sncurve::config::{validate_thickness, Format};
use sncurve::stress::calculate_stress;

fn thickness_arg() -> Arg {
    Arg::new("thickness")
        .short('t')
        .long("thickness")
        .help("Plate thickness in mm")
        .value_parser(value_parser!(f64))
        .default_value("25")
}

fn filter_arg() -> Arg {
    Arg::new("filter")
        .short('f')
        .long("filter")
        .help("Keep curves whose name contains this keyword (repeatable)")
        .action(ArgAction::Append)
}

fn cli() -> Command {
    Command::new("sncurve")
        .version("0.1.0")
        .about("Stress-life curves from DNV, BS 7608 and Eurocode fatigue standards")
        .subcommand_required(true)
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .help("Curve catalog (.yaml, .toml or .json) replacing the standard curves and any `catalog` set in a run file")
                .global(true),
        )
        .subcommand(Command::new("list").about("List catalog curves").arg(filter_arg()))
        .subcommand(Command::new("comparisons").about("List the guided curve comparisons"))
        .subcommand(
            Command::new("stress")
                .about("Stress range of one curve at a fatigue life")
                .arg(Arg::new("curve").short('c').long("curve").required(true).help("Curve name"))
                .arg(
                    Arg::new("life")
                        .short('n')
                        .long("life")
                        .required(true)
                        .value_parser(value_parser!(f64))
                        .help("Fatigue life in cycles"),
                )
                .arg(thickness_arg()),
        )
        .subcommand(
            Command::new("points")
                .about("Plot points for every matching curve")
                .arg(thickness_arg())
                .arg(filter_arg())
                .arg(
                    Arg::new("comparison")
                        .long("comparison")
                        .value_parser(value_parser!(usize))
                        .help("Number of a guided comparison, see `sncurve comparisons`"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Run a YAML configuration file")
                .arg(Arg::new("config").required(true).help("Path to the configuration")),
        )
}

fn dispatch(matches: &ArgMatches) -> anyhow::Result<()> {
    let catalog_path = matches.get_one::<String>("catalog").map(String::as_str);
    match matches.subcommand() {
        Some(("run", sub)) => {
            let config = sub.get_one::<String>("config").map(String::as_str).unwrap_or_default();
            app_logic::run(config, catalog_path)
        }
        Some(("comparisons", _)) => {
            for (i, group) in COMPARISONS.iter().enumerate() {
                println!("{}. {}", i + 1, group);
            }
            Ok(())
        }
        Some(("list", sub)) => {
            let catalog = app_logic::load_catalog(catalog_path)?;
            let keywords: Vec<&str> = sub
                .get_many::<String>("filter")
                .map(|v| v.map(String::as_str).collect())
                .unwrap_or_default();
            for (i, curve) in catalog.filter(keywords.as_slice()).iter().enumerate() {
                println!("{}. {}", i + 1, curve.name());
            }
            Ok(())
        }
        Some(("stress", sub)) => {
            let catalog = app_logic::load_catalog(catalog_path)?;
            let name = sub.get_one::<String>("curve").map(String::as_str).unwrap_or_default();
            let life = sub.get_one::<f64>("life").copied().unwrap_or_default();
            let thickness = sub.get_one::<f64>("thickness").copied().unwrap_or_default();
            validate_thickness(thickness)?;
            let stress = calculate_stress(life, thickness, catalog.find(name)?)?;
            println!("{:.3}", stress);
            Ok(())
        }
        Some(("points", sub)) => {
            let catalog = app_logic::load_catalog(catalog_path)?;
            let thickness = sub.get_one::<f64>("thickness").copied().unwrap_or_default();
            validate_thickness(thickness)?;
            let mut keywords: Vec<&str> = sub
                .get_many::<String>("filter")
                .map(|v| v.map(String::as_str).collect())
                .unwrap_or_default();
            if let Some(&number) = sub.get_one::<usize>("comparison") {
                keywords.extend(comparison_keywords(comparison_group(number)?));
            }
            let requests: Vec<Request> = catalog
                .filter(keywords.as_slice())
                .into_iter()
                .map(|curve| Request { curve, thickness })
                .collect();
            if requests.is_empty() {
                anyhow::bail!("no curves match {:?}", keywords);
            }
            let format = match sub.get_one::<String>("format").map(String::as_str) {
                Some("json") => Format::Json,
                _ => Format::Csv,
            };
            let reports = app_logic::evaluate(&requests, &[])?;
            app_logic::write_reports(&reports, format, io::stdout().lock())
        }
        _ => Ok(()),
    }
}

fn main() {
    env_logger::init();
    let matches = cli().get_matches();
    if let Err(why) = dispatch(&matches) {
        error!("{:#}", why);
        std::process::exit(1)
    }
}
