#![deny(warnings)]

//! Headless CLI: plan a terminal over its horizon and print the KPIs.

use anyhow::{Context, Result};
use persistence::{write_report, PlanReport};
use std::path::Path;
use terminal_core::{DemandScenario, TerminalConfig};
use terminal_planner::InvestmentPlanner;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    scenario: Option<String>,
    out: Option<String>,
    years: Option<u32>,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next(),
            "--scenario" => args.scenario = it.next(),
            "--out" => args.out = it.next(),
            "--years" => args.years = it.next().and_then(|s| s.parse().ok()),
            _ => {}
        }
    }
    args
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let text = std::fs::read_to_string(Path::new(path)).with_context(|| format!("reading {path}"))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {path}"))
}

/// 500k TEU in 2025 growing by 6 % a year to 2044; used without `--scenario`.
const BASELINE_SCENARIO: &str = include_str!("../../../assets/scenarios/baseline.yaml");

fn baseline_scenario() -> Result<DemandScenario> {
    serde_yaml::from_str(BASELINE_SCENARIO).context("parsing bundled baseline scenario")
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let args = parse_args();
    info!(?args, "starting CLI");

    let mut config: TerminalConfig = match &args.config {
        Some(path) => load_yaml(path)?,
        None => TerminalConfig::default(),
    };
    if let Some(years) = args.years {
        config.horizon.years = years;
    }
    let scenario = match &args.scenario {
        Some(path) => load_yaml(path)?,
        None => baseline_scenario()?,
    };

    let outcome = InvestmentPlanner::new(&config, &scenario)?.run()?;
    let report = PlanReport::from_outcome(&outcome, &config.discounting)?;

    println!(
        "Plan OK | years: {}-{} | assets: {}",
        config.horizon.start_year,
        config.horizon.end_year() - 1,
        report.assets.len()
    );
    println!(
        "KPI | NPV: ${} | capex: ${} | cost/TEU: {}",
        report.npv.round_dp(0),
        report.total_capex.round_dp(0),
        report
            .cost_per_teu
            .map(|c| format!("${}", c.round_dp(2)))
            .unwrap_or_else(|| "n/a".to_string()),
    );

    if let Some(out) = &args.out {
        write_report(out, &report)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_baseline_covers_the_default_horizon() {
        let scenario = baseline_scenario().unwrap();
        let config = TerminalConfig::default();
        for year in config.horizon.iter() {
            assert!(scenario.volume(year).is_some(), "{year}");
        }
        let outcome = InvestmentPlanner::new(&config, &scenario).unwrap().run();
        assert!(outcome.is_ok());
    }
}
