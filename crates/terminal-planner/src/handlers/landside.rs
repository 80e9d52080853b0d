//! Truck gate, empty handlers and general services.

use super::top_up_units;
use crate::planner::{until_satisfied, Order, YearContext};
use terminal_capacity::gate_check;
use terminal_core::{AssetKind, Mode, PlanError};

/// Add lanes while planned gate occupancy exceeds the allowable level.
pub(crate) fn gate(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    let allowable = cfg.triggers.allowable_gate_occupancy;
    until_satisfied(
        ctx,
        AssetKind::Gate,
        |c| Ok(gate_check(c.registry(), c.demand, c.config, Mode::Planned).ratio() <= allowable),
        |c| c.commission(Order::unit(AssetKind::Gate, &cfg.gate.asset)).map(|_| ()),
    )
    .map(|_| ())
}

/// Reach stackers for empties, sized by yearly empty throughput.
pub(crate) fn empty_handler(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    let per_unit = cfg.empty_handler.capacity_teu_per_year;
    top_up_units(ctx, AssetKind::EmptyHandler, &cfg.empty_handler.asset, |c| {
        (c.demand.empty_teu / per_unit).ceil()
    })
}

/// Workshops and offices, one unit per `cranes_per_unit` quay cranes.
pub(crate) fn general_services(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    let per_unit = cfg.general_services.cranes_per_unit as f64;
    top_up_units(ctx, AssetKind::GeneralServices, &cfg.general_services.asset, |c| {
        (c.registry().count_planned(AssetKind::Crane) as f64 / per_unit).ceil()
    })
}
