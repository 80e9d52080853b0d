//! Quay, berths and ship-to-shore cranes.
//!
//! While the berth trigger is violated: fill a free crane slot on an existing
//! berth if there is one, otherwise open a new berth together with the quay
//! wall (and site works) it needs. A crane never comes online before its
//! berth, a berth never before its quay wall.

use super::free_slot;
use crate::planner::{until_satisfied, Order, YearContext};
use terminal_capacity::{quay_occupancy, waiting_factor};
use terminal_core::{
    AssetDetail, AssetId, AssetKind, BerthTrigger, Mode, PlanError, TerminalConfig,
};
use terminal_econ::gijt_unit_rate;

pub(crate) fn invest(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    until_satisfied(ctx, AssetKind::Berth, berth_trigger_satisfied, expand).map(|_| ())
}

/// Planned berth occupancy within the allowable level and, under the
/// waiting-time policy, the planned waiting factor within its bound too.
fn berth_trigger_satisfied(ctx: &YearContext<'_>) -> Result<bool, PlanError> {
    let cfg = ctx.config;
    let occ = quay_occupancy(ctx.registry(), ctx.demand, cfg, Mode::Planned);
    if occ.berth > cfg.triggers.allowable_berth_occupancy {
        return Ok(false);
    }
    match cfg.triggers.berth {
        BerthTrigger::Occupancy => Ok(true),
        BerthTrigger::WaitingTime {
            allowable_waiting_factor,
        } => {
            if occ.berth == 0.0 {
                return Ok(true);
            }
            Ok(waiting_factor(occ.berth, occ.berths)? <= allowable_waiting_factor)
        }
    }
}

fn expand(ctx: &mut YearContext<'_>) -> Result<(), PlanError> {
    match free_slot(ctx.registry(), AssetKind::Berth, AssetKind::Crane, None) {
        Some(berth) => add_crane(ctx, berth).map(|_| ()),
        None => add_berth(ctx).map(|_| ()),
    }
}

fn add_crane(ctx: &mut YearContext<'_>, berth: AssetId) -> Result<AssetId, PlanError> {
    let cfg = ctx.config;
    let not_before = ctx.registry().get(berth).map(|b| b.year_online());
    ctx.commission(
        Order::unit(AssetKind::Crane, &cfg.crane.asset)
            .capacity(cfg.crane.effective_capacity())
            .detail(AssetDetail::Crane { berth: Some(berth) })
            .after(not_before),
    )
}

/// Open one berth; a quay wall is built first when berths would outnumber quay walls.
fn add_berth(ctx: &mut YearContext<'_>) -> Result<AssetId, PlanError> {
    let cfg = ctx.config;
    let berths = ctx.registry().count_planned(AssetKind::Berth) + 1;
    let quays = ctx.registry().count_planned(AssetKind::QuayWall);
    let not_before = if berths > quays {
        let quay = add_quay_wall(ctx, berths)?;
        ctx.registry().get(quay).map(|q| q.year_online())
    } else {
        ctx.registry().latest_online(AssetKind::QuayWall)
    };
    let max_cranes = cfg.vessels.iter().map(|v| v.max_cranes).max().unwrap_or(1);
    ctx.commission(
        Order::unit(AssetKind::Berth, &cfg.quay.berth)
            .capacity(max_cranes as f64)
            .detail(AssetDetail::Berth { max_cranes })
            .after(not_before),
    )
}

/// Length of the quay wall serving berth number `berths`.
///
/// The first wall spans the largest vessel plus a berthing gap at each end;
/// every further wall adds the marginal length
/// `1.1 × n × (LOA + gap) − 1.1 × (n − 1) × (LOA + gap)`.
pub(crate) fn quay_length(cfg: &TerminalConfig, berths: usize) -> f64 {
    let loa = cfg.vessels.iter().map(|v| v.loa_m).fold(0.0, f64::max);
    let gap = cfg.quay.berthing_gap_m;
    if berths <= 1 {
        loa + 2.0 * gap
    } else {
        let n = berths as f64;
        1.1 * n * (loa + gap) - 1.1 * (n - 1.0) * (loa + gap)
    }
}

/// Retaining depth below the quay: deepest draft plus the vertical allowances.
pub(crate) fn quay_depth(cfg: &TerminalConfig) -> f64 {
    let draft = cfg.vessels.iter().map(|v| v.draft_m).fold(0.0, f64::max);
    let q = &cfg.quay;
    draft + q.tidal_range_m + q.max_sinkage_m + q.wave_motion_m + q.safety_margin_m
}

fn add_quay_wall(ctx: &mut YearContext<'_>, berths: usize) -> Result<AssetId, PlanError> {
    let cfg = ctx.config;
    let length = quay_length(cfg, berths);
    let depth = quay_depth(cfg);
    let site_ready = add_site_works(ctx, length)?;
    let rate = gijt_unit_rate(&cfg.quay, depth)?;
    ctx.commission(
        Order::unit(AssetKind::QuayWall, &cfg.quay.quay_wall)
            .priced(rate, length)
            .capacity(length)
            .detail(AssetDetail::Quay {
                length_m: length,
                depth_m: depth,
            })
            .after(site_ready),
    )
}

/// Reclamation and revetment behind a new stretch of quay, plus the
/// breakwater with the first stretch. Returns the year the site is ready,
/// which is never before the breakwater shelters it.
fn add_site_works(ctx: &mut YearContext<'_>, quay_length_m: f64) -> Result<Option<i32>, PlanError> {
    let cfg = ctx.config;
    let Some(site) = &cfg.site else {
        return Ok(None);
    };
    let area = quay_length_m * site.terminal_depth_m;
    let volume = area * site.fill_height_m;
    let mut ready = Vec::new();

    let id = ctx.commission(
        Order::unit(AssetKind::Reclamation, &site.reclamation)
            .priced(site.reclamation.unit_rate, volume)
            .capacity(area)
            .detail(AssetDetail::Reclamation {
                area_m2: area,
                volume_m3: volume,
            }),
    )?;
    ready.push(id);
    let id = ctx.commission(
        Order::unit(AssetKind::Revetment, &site.revetment)
            .priced(site.revetment.unit_rate, quay_length_m)
            .capacity(quay_length_m)
            .detail(AssetDetail::Linear {
                length_m: quay_length_m,
            }),
    )?;
    ready.push(id);
    if site.breakwater_length_m > 0.0 && ctx.registry().count_planned(AssetKind::Breakwater) == 0 {
        let id = ctx.commission(
            Order::unit(AssetKind::Breakwater, &site.breakwater)
                .priced(site.breakwater.unit_rate, site.breakwater_length_m)
                .capacity(site.breakwater_length_m)
                .detail(AssetDetail::Linear {
                    length_m: site.breakwater_length_m,
                }),
        )?;
        ready.push(id);
    }
    let registry = ctx.registry();
    Ok(ready
        .into_iter()
        .filter_map(|id| registry.get(id).map(|a| a.year_online()))
        .chain(registry.latest_online(AssetKind::Breakwater))
        .max())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;
    use terminal_capacity::YearDemand;
    use terminal_core::{AssetRegistry, SiteWorksParams};

    fn quay_wall_capex(cfg: &TerminalConfig, length: f64) -> Option<Decimal> {
        let rate = gijt_unit_rate(&cfg.quay, quay_depth(cfg)).ok()?;
        let q = Decimal::from_f64(length)?;
        Some((rate * q * (Decimal::ONE + cfg.quay.quay_wall.mobilisation_perc)).round_dp(2))
    }

    fn demand(calls: u32) -> YearDemand {
        YearDemand {
            year: 2030,
            total_teu: 1_600.0 * calls as f64,
            calls: BTreeMap::from([("panamax".to_string(), calls)]),
            laden_teu: 0.0,
            reefer_teu: 0.0,
            empty_teu: 0.0,
            oog_teu: 0.0,
            hinterland_teu: 0.0,
            truck_teu: 0.0,
            barge_teu: 0.0,
        }
    }

    #[test]
    fn quay_geometry() {
        let cfg = TerminalConfig::default();
        // new_panamax: LOA 366, draft 15.2
        assert!((quay_length(&cfg, 1) - (366.0 + 30.0)).abs() < 1e-9);
        assert!((quay_length(&cfg, 3) - 1.1 * 381.0).abs() < 1e-9);
        assert!((quay_depth(&cfg) - (15.2 + 1.8 + 0.5 + 0.5 + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn fills_slots_before_opening_berths() {
        let cfg = TerminalConfig::default();
        let mut r = AssetRegistry::new();
        let d = demand(1_000);
        let mut ctx = YearContext::new(&cfg, &d, &mut r);
        invest(&mut ctx).unwrap();

        let berths = r.count_planned(AssetKind::Berth);
        let cranes = r.count_planned(AssetKind::Crane);
        assert!(berths >= 1);
        assert_eq!(r.count_planned(AssetKind::QuayWall), berths);
        // all but the last berth are saturated
        assert!(cranes > (berths - 1) * 6);
        assert!(cranes <= berths * 6);
        let occ = quay_occupancy(&r, &d, &cfg, Mode::Planned);
        assert!(occ.berth <= cfg.triggers.allowable_berth_occupancy);
    }

    #[test]
    fn dependents_never_precede_what_they_sit_on() {
        let cfg = TerminalConfig {
            site: Some(SiteWorksParams::reference()),
            ..TerminalConfig::default()
        };
        let mut r = AssetRegistry::new();
        let d = demand(600);
        let mut ctx = YearContext::new(&cfg, &d, &mut r);
        invest(&mut ctx).unwrap();

        assert_eq!(r.count_planned(AssetKind::Breakwater), 1);
        assert_eq!(
            r.count_planned(AssetKind::Reclamation),
            r.count_planned(AssetKind::QuayWall)
        );
        let walls = r.assets_of_kind(AssetKind::QuayWall).map(|(_, q)| q);
        let fills = r.assets_of_kind(AssetKind::Reclamation).map(|(_, f)| f);
        for (q, f) in walls.zip(fills) {
            assert!(q.year_online() >= f.year_online());
        }
        let sheltered = r.latest_online(AssetKind::Breakwater).unwrap();
        assert!(r.count_planned(AssetKind::QuayWall) >= 2);
        for (_, q) in r.assets_of_kind(AssetKind::QuayWall) {
            assert!(q.year_online() >= sheltered, "{}", q.name);
        }
        for (_, b) in r.assets_of_kind(AssetKind::Berth) {
            assert!(b.year_online() >= sheltered, "{}", b.name);
        }
        let first_quay = r.assets_of_kind(AssetKind::QuayWall).next().unwrap().1;
        let first_fill = r.assets_of_kind(AssetKind::Reclamation).next().unwrap().1;
        assert!(first_quay.year_online() >= first_fill.year_online());
        for (_, c) in r.assets_of_kind(AssetKind::Crane) {
            let berth = r.get(c.detail.crane_berth().unwrap()).unwrap();
            assert!(c.year_online() >= berth.year_online());
        }
        // reclamation is priced per m³
        let fill = &first_fill.detail;
        assert!(matches!(fill, AssetDetail::Reclamation { volume_m3, .. } if *volume_m3 > 0.0));
    }

    #[test]
    fn waiting_time_policy_is_stricter() {
        let d = demand(800);
        let plain = TerminalConfig::default();
        let strict = TerminalConfig {
            triggers: terminal_core::Triggers {
                berth: BerthTrigger::WaitingTime {
                    allowable_waiting_factor: 0.1,
                },
                ..terminal_core::Triggers::default()
            },
            ..TerminalConfig::default()
        };
        let mut a = AssetRegistry::new();
        invest(&mut YearContext::new(&plain, &d, &mut a)).unwrap();
        let mut b = AssetRegistry::new();
        invest(&mut YearContext::new(&strict, &d, &mut b)).unwrap();
        assert!(b.count_planned(AssetKind::Crane) >= a.count_planned(AssetKind::Crane));
        let occ = quay_occupancy(&b, &d, &strict, Mode::Planned);
        assert!(waiting_factor(occ.berth, occ.berths).unwrap() <= 0.1);
    }

    #[test]
    fn quay_wall_is_priced_by_depth() {
        let cfg = TerminalConfig::default();
        let mut r = AssetRegistry::new();
        let d = demand(10);
        let mut ctx = YearContext::new(&cfg, &d, &mut r);
        invest(&mut ctx).unwrap();
        let quay = r.assets_of_kind(AssetKind::QuayWall).next().unwrap().1;
        assert_eq!(Some(quay.cost.capex), quay_wall_capex(&cfg, quay_length(&cfg, 1)));
    }
}
