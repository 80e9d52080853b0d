//! Container yard: stacks and the machines serving them.

use super::top_up_units;
use crate::planner::{until_satisfied, Order, YearContext};
use terminal_capacity::{
    empty_stack_check, laden_stack_check, oog_stack_check, CapacityCheck, YearDemand,
};
use terminal_core::{
    AssetDetail, AssetKind, AssetRegistry, EquipmentBasis, Mode, PlanError, StackParams,
    TerminalConfig,
};

/// Tractor-trailers or AGVs at a fixed ratio to quay cranes.
pub(crate) fn horizontal_transport(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    let per_crane = cfg.horizontal_transport.per_crane;
    top_up_units(
        ctx,
        AssetKind::HorizontalTransport,
        &cfg.horizontal_transport.asset,
        |c| (c.registry().count_planned(AssetKind::Crane) as f64 * per_crane).ceil(),
    )
}

type StackCheck = fn(&AssetRegistry, &YearDemand, &TerminalConfig, Mode) -> CapacityCheck;

/// Add standard stack blocks until the required TEU fit.
fn stack(
    ctx: &mut YearContext<'_>,
    kind: AssetKind,
    params: &StackParams,
    check: StackCheck,
) -> Result<(), PlanError> {
    until_satisfied(
        ctx,
        kind,
        |c| Ok(check(c.registry(), c.demand, c.config, Mode::Planned).satisfied()),
        |c| {
            c.commission(
                Order::unit(kind, &params.asset)
                    .capacity(params.capacity_per_unit())
                    .detail(AssetDetail::Stack {
                        ground_slots: params.ground_slots_per_unit,
                        height: params.height,
                    }),
            )
            .map(|_| ())
        },
    )
    .map(|_| ())
}

/// Laden and reefer boxes share the laden stack.
pub(crate) fn laden_stack(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    stack(ctx, AssetKind::LadenStack, &cfg.stacks.laden, laden_stack_check)
}

pub(crate) fn empty_stack(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    stack(ctx, AssetKind::EmptyStack, &cfg.stacks.empty, empty_stack_check)
}

pub(crate) fn oog_stack(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    stack(ctx, AssetKind::OogStack, &cfg.stacks.oog, oog_stack_check)
}

/// RTGs per laden stack, or straddle carriers / reach stackers per quay crane.
pub(crate) fn stack_equipment(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    let basis = cfg.stack_equipment.basis.clone();
    top_up_units(ctx, AssetKind::StackEquipment, &cfg.stack_equipment.asset, move |c| {
        let (units, ratio) = match basis {
            EquipmentBasis::PerStack(r) => (c.registry().count_planned(AssetKind::LadenStack), r),
            EquipmentBasis::PerCrane(r) => (c.registry().count_planned(AssetKind::Crane), r),
        };
        (units as f64 * ratio).ceil()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn demand(laden: f64) -> YearDemand {
        YearDemand {
            year: 2030,
            total_teu: laden,
            calls: BTreeMap::new(),
            laden_teu: laden,
            reefer_teu: laden / 10.0,
            empty_teu: laden / 5.0,
            oog_teu: laden / 50.0,
            hinterland_teu: 0.0,
            truck_teu: 0.0,
            barge_teu: 0.0,
        }
    }

    #[test]
    fn stacks_cover_requirement_with_minimal_blocks() {
        let cfg = TerminalConfig::default();
        let mut r = AssetRegistry::new();
        let d = demand(500_000.0);
        let mut ctx = YearContext::new(&cfg, &d, &mut r);
        laden_stack(&mut ctx).unwrap();
        empty_stack(&mut ctx).unwrap();
        oog_stack(&mut ctx).unwrap();

        for (kind, check) in [
            (AssetKind::LadenStack, laden_stack_check as StackCheck),
            (AssetKind::EmptyStack, empty_stack_check as StackCheck),
            (AssetKind::OogStack, oog_stack_check as StackCheck),
        ] {
            let c = check(&r, &d, &cfg, Mode::Planned);
            assert!(c.satisfied(), "{kind:?}");
            let n = r.count_planned(kind) as f64;
            let unit = c.installed / n;
            // one block fewer would not be enough
            assert!(c.installed - unit < c.required, "{kind:?}");
        }
    }

    #[test]
    fn equipment_follows_its_basis() {
        let mut cfg = TerminalConfig::default();
        cfg.stack_equipment.basis = EquipmentBasis::PerStack(1.5);
        let mut r = AssetRegistry::new();
        let d = demand(300_000.0);
        let mut ctx = YearContext::new(&cfg, &d, &mut r);
        laden_stack(&mut ctx).unwrap();
        stack_equipment(&mut ctx).unwrap();
        let stacks = r.count_planned(AssetKind::LadenStack) as f64;
        assert_eq!(
            r.count_planned(AssetKind::StackEquipment) as f64,
            (stacks * 1.5).ceil()
        );
    }

    #[test]
    fn no_cranes_no_transport() {
        let cfg = TerminalConfig::default();
        let mut r = AssetRegistry::new();
        let d = demand(0.0);
        let mut ctx = YearContext::new(&cfg, &d, &mut r);
        horizontal_transport(&mut ctx).unwrap();
        laden_stack(&mut ctx).unwrap();
        assert!(r.is_empty());
    }
}
