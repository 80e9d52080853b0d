//! Per-year utilisation, waiting time and the non-asset cash items.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use terminal_capacity::{
    barge_berth_check, empty_stack_check, gate_check, laden_stack_check, oog_stack_check,
    quay_occupancy, waiting_factor, waiting_time_hours, CapacityCheck, QuayOccupancy, YearDemand,
};
use terminal_core::{AssetId, AssetRegistry, BargeSide, Mode, PlanError, TerminalConfig};
use tracing::warn;

/// Planned and online utilisation of one subsystem.
///
/// `None` means demand with nothing installed to serve it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub planned: Option<f64>,
    pub online: Option<f64>,
}

impl Load {
    fn new(planned: f64, online: f64) -> Self {
        Self {
            planned: planned.is_finite().then_some(planned),
            online: online.is_finite().then_some(online),
        }
    }
}

/// What the planner saw and decided in one year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearReport {
    pub year: i32,
    pub demand: YearDemand,
    pub berth: Load,
    pub crane: Load,
    pub laden_stack: Load,
    pub empty_stack: Load,
    pub oog_stack: Load,
    pub gate: Load,
    pub barge_berths: Vec<(BargeSide, Load)>,
    pub berths_online: usize,
    /// E2/E2/n factor at the online berth occupancy.
    pub waiting_factor: Option<f64>,
    /// Mean waiting time per call, hours.
    pub waiting_time_hours: Option<f64>,
    pub demurrage: Decimal,
    pub ocean_transport: Decimal,
    pub revenue: Decimal,
    /// Assets commissioned this year, in creation order.
    pub added: Vec<AssetId>,
}

impl YearReport {
    pub fn build(
        registry: &AssetRegistry,
        demand: &YearDemand,
        config: &TerminalConfig,
        added: Vec<AssetId>,
    ) -> Result<Self, PlanError> {
        let online = Mode::Online(demand.year);
        let planned_quay = quay_occupancy(registry, demand, config, Mode::Planned);
        let online_quay = quay_occupancy(registry, demand, config, online);
        type Check = fn(&AssetRegistry, &YearDemand, &TerminalConfig, Mode) -> CapacityCheck;
        let load = |check: Check| {
            Load::new(
                check(registry, demand, config, Mode::Planned).ratio(),
                check(registry, demand, config, online).ratio(),
            )
        };
        let barge_berths = config
            .barge
            .iter()
            .flat_map(|b| b.sides.iter().copied())
            .map(|side| {
                let planned = barge_berth_check(registry, demand, side, Mode::Planned);
                let now = barge_berth_check(registry, demand, side, online);
                (side, Load::new(planned.ratio(), now.ratio()))
            })
            .collect();

        let wait = waiting(demand, config, &online_quay);
        let demurrage_cost = match wait {
            Some((_, hours)) => demurrage(demand, config, &online_quay, hours)?,
            None => Decimal::ZERO,
        };

        Ok(Self {
            year: demand.year,
            demand: demand.clone(),
            berth: Load::new(planned_quay.berth, online_quay.berth),
            crane: Load::new(planned_quay.crane, online_quay.crane),
            laden_stack: load(laden_stack_check),
            empty_stack: load(empty_stack_check),
            oog_stack: load(oog_stack_check),
            gate: load(gate_check),
            barge_berths,
            berths_online: online_quay.berths,
            waiting_factor: wait.map(|(f, _)| f),
            waiting_time_hours: wait.map(|(_, h)| h),
            demurrage: demurrage_cost,
            ocean_transport: ocean_transport(demand, config),
            revenue: revenue(demand, config)?,
            added,
        })
    }
}

/// Waiting factor and waiting hours per call at the online occupancy.
///
/// Reporting only: an unserved or saturated quay, or a berth count outside
/// the fitted range, is logged and leaves both values unset.
fn waiting(demand: &YearDemand, config: &TerminalConfig, q: &QuayOccupancy) -> Option<(f64, f64)> {
    let calls = demand.total_calls();
    if calls == 0 {
        return Some((0.0, 0.0));
    }
    match waiting_factor(q.berth, q.berths) {
        Ok(f) if f.is_finite() => {
            let hours = waiting_time_hours(f, q.crane, config.operations.operational_hours, calls);
            Some((f, hours))
        }
        Ok(_) => {
            warn!(
                year = demand.year,
                occupancy = q.berth,
                berths = q.berths,
                "quay saturated, waiting time unbounded"
            );
            None
        }
        Err(e) => {
            warn!(year = demand.year, error = %e, "waiting time not reported");
            None
        }
    }
}

/// Demurrage over all classes: port time beyond the all-turn allowance,
/// charged per day at the class rate.
///
/// A vessel is worked by the average crane complement of an online berth,
/// capped at the class's own crane limit.
fn demurrage(
    demand: &YearDemand,
    config: &TerminalConfig,
    q: &QuayOccupancy,
    waiting_hours: f64,
) -> Result<Decimal, PlanError> {
    if q.berths == 0 || q.service_rate <= 0.0 {
        return Ok(Decimal::ZERO);
    }
    let per_berth = q.service_rate / q.berths as f64;
    let mut total = Decimal::ZERO;
    for v in &config.vessels {
        let calls = demand.calls_for(&v.name);
        if calls == 0 {
            continue;
        }
        let rate = per_berth.min(v.max_cranes as f64 * config.crane.effective_capacity());
        let port_time = waiting_hours + v.call_size_teu / rate + v.mooring_hours;
        let excess = (port_time - v.all_turn_time_hours).max(0.0);
        if excess == 0.0 {
            continue;
        }
        let days = Decimal::from_f64(calls as f64 * excess / 24.0)
            .ok_or_else(|| PlanError::NonFinite("demurrage".into()))?;
        total += days * v.demurrage_rate_per_day;
    }
    Ok(total.round_dp(2))
}

fn ocean_transport(demand: &YearDemand, config: &TerminalConfig) -> Decimal {
    config
        .vessels
        .iter()
        .map(|v| Decimal::from(demand.calls_for(&v.name)) * v.ocean_transport_cost_per_call)
        .sum()
}

fn revenue(demand: &YearDemand, config: &TerminalConfig) -> Result<Decimal, PlanError> {
    if config.revenue_per_teu.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let teu = Decimal::from_f64(demand.total_teu)
        .ok_or_else(|| PlanError::NonFinite("revenue".into()))?;
    Ok((teu * config.revenue_per_teu).round_dp(2))
}
