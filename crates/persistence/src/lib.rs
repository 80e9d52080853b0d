#![deny(warnings)]

//! Persistence layer: JSON export of a finished planning run.
//!
//! A [`PlanReport`] bundles the three outputs a run exposes (the asset
//! registry, the year × category cashflow table and the NPV) together with
//! the yearly reports, so downstream tooling never has to re-run the planner.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use terminal_core::{AssetRegistry, Discounting, Horizon, PlanError};
use terminal_econ::CashflowTable;
use terminal_planner::{PlanOutcome, YearReport};
use tracing::info;

/// Serialisable summary of one planning run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub horizon: Horizon,
    pub discounting: Discounting,
    pub npv: Decimal,
    /// `None` when the run handled no throughput.
    pub cost_per_teu: Option<Decimal>,
    pub total_capex: Decimal,
    pub assets: AssetRegistry,
    pub cashflows: CashflowTable,
    pub years: Vec<YearReport>,
}

impl PlanReport {
    pub fn from_outcome(outcome: &PlanOutcome, discounting: &Discounting) -> Result<Self> {
        let npv = outcome.npv(discounting).context("computing NPV")?;
        let cost_per_teu = match outcome.cost_per_teu(discounting) {
            Ok(c) => Some(c),
            Err(PlanError::DivisionBySentinel(_)) => None,
            Err(e) => return Err(e).context("computing cost per TEU"),
        };
        Ok(Self {
            horizon: outcome.horizon.clone(),
            discounting: discounting.clone(),
            npv,
            cost_per_teu,
            total_capex: outcome.total_capex(),
            assets: outcome.registry.clone(),
            cashflows: outcome.cashflow_table(),
            years: outcome.reports.clone(),
        })
    }
}

/// Write `report` as pretty JSON, creating parent directories as needed.
pub fn write_report(path: impl AsRef<Path>, report: &PlanReport) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, report)
        .with_context(|| format!("serialising report to {}", path.display()))?;
    out.flush()?;
    info!(
        path = %path.display(),
        assets = report.assets.len(),
        years = report.years.len(),
        "report written"
    );
    Ok(())
}

pub fn read_report(path: impl AsRef<Path>) -> Result<PlanReport> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let report = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing report {}", path.display()))?;
    Ok(report)
}
