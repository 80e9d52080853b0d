//! Conversion of a year's volume into vessel calls and container flows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use terminal_core::{ConfigError, DemandScenario, PlanError, VesselClass};
use tracing::debug;

/// Demand seen by the terminal in one year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearDemand {
    pub year: i32,
    pub total_teu: f64,
    /// Vessel class name to number of calls.
    pub calls: BTreeMap<String, u32>,
    pub laden_teu: f64,
    pub reefer_teu: f64,
    pub empty_teu: f64,
    pub oog_teu: f64,
    /// Volume crossing the terminal boundary landside.
    pub hinterland_teu: f64,
    pub truck_teu: f64,
    pub barge_teu: f64,
}

impl YearDemand {
    pub fn total_calls(&self) -> u32 {
        self.calls.values().sum()
    }

    pub fn calls_for(&self, class: &str) -> u32 {
        self.calls.get(class).copied().unwrap_or(0)
    }
}

/// Projects a validated scenario onto the configured vessel classes.
#[derive(Clone, Debug)]
pub struct DemandProjector<'a> {
    scenario: &'a DemandScenario,
    vessels: &'a [VesselClass],
}

impl<'a> DemandProjector<'a> {
    /// Fails when the vessel mix names a class that is not configured.
    pub fn new(scenario: &'a DemandScenario, vessels: &'a [VesselClass]) -> Result<Self, ConfigError> {
        for name in scenario.splits().vessel_mix.keys() {
            if !vessels.iter().any(|v| &v.name == name) {
                return Err(ConfigError::UnknownVesselClass(name.clone()));
            }
        }
        Ok(Self { scenario, vessels })
    }

    /// Calls per class are `ceil(volume × share / call_size)`.
    pub fn project(&self, year: i32) -> Result<YearDemand, PlanError> {
        let total = self
            .scenario
            .volume(year)
            .ok_or(PlanError::MissingScenarioYear(year))?;
        let splits = self.scenario.splits();
        let mut calls = BTreeMap::new();
        for vessel in self.vessels {
            let Some(share) = splits.vessel_mix.get(&vessel.name) else {
                continue;
            };
            let n = (total * share / vessel.call_size_teu).ceil();
            calls.insert(vessel.name.clone(), n.max(0.0) as u32);
        }
        let mix = &splits.container;
        let hinterland = total * (1.0 - splits.transhipment_ratio);
        let barge = hinterland * splits.barge_share;
        debug!(year, teu = total, calls = calls.values().sum::<u32>(), "demand projected");
        Ok(YearDemand {
            year,
            total_teu: total,
            calls,
            laden_teu: total * mix.laden,
            reefer_teu: total * mix.reefer,
            empty_teu: total * mix.empty,
            oog_teu: total * mix.oog,
            hinterland_teu: hinterland,
            truck_teu: hinterland - barge,
            barge_teu: barge,
        })
    }
}
