//! Barge connector: barge terminals at both ends, the fleet, and the channel.
//!
//! Every handler here is a no-op when the configuration has no barge section.

use super::free_slot;
use crate::planner::{until_satisfied, Order, YearContext};
use terminal_capacity::{barge_berth_check, barge_fleet_check};
use terminal_core::{
    AssetDetail, AssetKind, AssetRegistry, BargeParams, BargeSide, ChannelParams, Mode, PlanError,
};

fn count_on_side(registry: &AssetRegistry, kind: AssetKind, side: BargeSide) -> usize {
    registry
        .assets_of_kind(kind)
        .filter(|(_, a)| a.detail.barge_side() == Some(side))
        .count()
}

/// Barge cranes, berths and quays on each configured side.
pub(crate) fn barge_berths(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    let Some(barge) = &cfg.barge else {
        return Ok(());
    };
    let allowable = cfg.triggers.allowable_barge_berth_occupancy;
    for &side in &barge.sides {
        until_satisfied(
            ctx,
            AssetKind::BargeBerth,
            |c| {
                let check = barge_berth_check(c.registry(), c.demand, side, Mode::Planned);
                Ok(check.ratio() <= allowable)
            },
            |c| expand(c, barge, side),
        )?;
    }
    Ok(())
}

/// Same precedence as the main quay: crane into a free slot first.
fn expand(ctx: &mut YearContext<'_>, barge: &BargeParams, side: BargeSide) -> Result<(), PlanError> {
    let cfg = ctx.config;
    if let Some(berth) = free_slot(ctx.registry(), AssetKind::BargeBerth, AssetKind::BargeCrane, Some(side)) {
        let not_before = ctx.registry().get(berth).map(|b| b.year_online());
        ctx.commission(
            Order::unit(AssetKind::BargeCrane, &barge.crane)
                .capacity(barge.crane_capacity(&cfg.operations))
                .detail(AssetDetail::BargeCrane {
                    side,
                    berth: Some(berth),
                })
                .after(not_before),
        )?;
        return Ok(());
    }

    let berths = count_on_side(ctx.registry(), AssetKind::BargeBerth, side) + 1;
    let quays = count_on_side(ctx.registry(), AssetKind::BargeQuayWall, side);
    let not_before = if berths > quays {
        let id = ctx.commission(
            Order::unit(AssetKind::BargeQuayWall, &barge.quay)
                .priced(barge.quay.unit_rate, barge.quay_length_m)
                .capacity(barge.quay_length_m)
                .detail(AssetDetail::BargeQuay {
                    side,
                    length_m: barge.quay_length_m,
                    depth_m: barge.quay_depth_m,
                }),
        )?;
        ctx.registry().get(id).map(|q| q.year_online())
    } else {
        ctx.registry()
            .assets_of_kind(AssetKind::BargeQuayWall)
            .filter(|(_, a)| a.detail.barge_side() == Some(side))
            .map(|(_, a)| a.year_online())
            .max()
    };
    ctx.commission(
        Order::unit(AssetKind::BargeBerth, &barge.berth)
            .capacity(barge.max_cranes_per_berth as f64)
            .detail(AssetDetail::BargeBerth {
                side,
                max_cranes: barge.max_cranes_per_berth,
            })
            .after(not_before),
    )?;
    Ok(())
}

/// Barges for the round-trip limited yearly barge volume.
pub(crate) fn barge_fleet(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    let Some(barge) = &cfg.barge else {
        return Ok(());
    };
    until_satisfied(
        ctx,
        AssetKind::Barge,
        |c| Ok(barge_fleet_check(c.registry(), c.demand, barge, c.config, Mode::Planned).satisfied()),
        |c| c.commission(Order::unit(AssetKind::Barge, &barge.vessel)).map(|_| ()),
    )
    .map(|_| ())
}

/// Cross-section and dredging volume of the barge channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ChannelDimensions {
    pub width_m: f64,
    pub depth_m: f64,
    pub dredging_volume_m3: f64,
}

/// PIANC bottom width: manoeuvring lanes plus bank clearance, plus the
/// passing distance for two-way traffic, all in design beams.
pub(crate) fn channel_dimensions(ch: &ChannelParams) -> ChannelDimensions {
    let beam = ch.design_beam_m;
    let lanes = if ch.two_way { 2.0 } else { 1.0 };
    let passing = if ch.two_way { ch.passing_factor } else { 0.0 };
    let width = lanes * (ch.manoeuvring_factor + ch.additional_factor) * beam
        + 2.0 * ch.bank_clearance_factor * beam
        + passing * beam;
    let depth = ch.design_draft_m + ch.under_keel_m;
    let dredge = (depth - ch.natural_depth_m).max(0.0);
    ChannelDimensions {
        width_m: width,
        depth_m: depth,
        dredging_volume_m3: dredge * width * ch.length_m,
    }
}

/// Dredge the barge channel once, in the first year with barge traffic.
pub(crate) fn barge_channel(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    let cfg = ctx.config;
    let Some(barge) = &cfg.barge else {
        return Ok(());
    };
    if ctx.demand.barge_teu <= 0.0 || ctx.registry().count_planned(AssetKind::Channel) > 0 {
        return Ok(());
    }
    let ch = &barge.channel;
    let dim = channel_dimensions(ch);
    ctx.commission(
        Order::unit(AssetKind::Channel, &ch.asset)
            .priced(ch.asset.unit_rate, dim.dredging_volume_m3)
            .capacity(dim.width_m)
            .detail(AssetDetail::Channel {
                length_m: ch.length_m,
                width_m: dim.width_m,
                depth_m: dim.depth_m,
                dredging_volume_m3: dim.dredging_volume_m3,
            }),
    )?;
    Ok(())
}
