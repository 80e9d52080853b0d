//! Utilisation of existing and planned infrastructure.
//!
//! Every estimate comes in two flavours through [`Mode`]: `Planned` counts all
//! assets in the registry, `Online(year)` only those commissioned by `year`.
//! A zero denominator yields `f64::INFINITY`, read as "under capacity".

use crate::demand::YearDemand;
use terminal_core::{AssetKind, AssetRegistry, BargeParams, BargeSide, Mode, StackParams, TerminalConfig};

/// `required / available` with the occupancy sentinel conventions:
/// nothing required is 0, nothing available is +∞.
pub fn ratio(required: f64, available: f64) -> f64 {
    if required <= 0.0 {
        0.0
    } else if available <= 0.0 {
        f64::INFINITY
    } else {
        required / available
    }
}

/// Berth and crane utilisation of the quay.
#[derive(Clone, Debug, PartialEq)]
pub struct QuayOccupancy {
    pub berth: f64,
    pub crane: f64,
    pub berths: usize,
    /// Summed crane service rate, TEU/h.
    pub service_rate: f64,
}

/// Quay occupancy for one year's calls.
///
/// `time_at_berth = calls × (call_size / service_rate + mooring / berths)`,
/// summed over vessel classes and divided by operational hours. Crane
/// occupancy drops the mooring term.
pub fn quay_occupancy(
    registry: &AssetRegistry,
    demand: &YearDemand,
    config: &TerminalConfig,
    mode: Mode,
) -> QuayOccupancy {
    let service_rate = registry.capacity(AssetKind::Crane, mode);
    let berths = registry.count(AssetKind::Berth, mode);
    let hours = config.operations.operational_hours;

    let mut handling = 0.0;
    let mut mooring = 0.0;
    for vessel in &config.vessels {
        let calls = demand.calls_for(&vessel.name) as f64;
        handling += calls * vessel.call_size_teu;
        mooring += calls * vessel.mooring_hours;
    }
    if handling <= 0.0 {
        return QuayOccupancy {
            berth: 0.0,
            crane: 0.0,
            berths,
            service_rate,
        };
    }
    if service_rate <= 0.0 || berths == 0 {
        return QuayOccupancy {
            berth: f64::INFINITY,
            crane: f64::INFINITY,
            berths,
            service_rate,
        };
    }
    let crane_hours = handling / service_rate;
    let berth_hours = crane_hours + mooring / berths as f64;
    QuayOccupancy {
        berth: berth_hours / hours,
        crane: crane_hours / hours,
        berths,
        service_rate,
    }
}

/// A required-versus-installed capacity pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapacityCheck {
    pub required: f64,
    pub installed: f64,
}

impl CapacityCheck {
    pub fn ratio(&self) -> f64 {
        ratio(self.required, self.installed)
    }

    pub fn satisfied(&self) -> bool {
        self.required <= self.installed
    }
}

/// Ground slots needed for `teu` with the given dwell time.
///
/// `teu × peak_factor × dwell_days / (occupancy × operational_days × height)`
fn ground_slots(teu: f64, dwell_days: f64, stack: &StackParams, config: &TerminalConfig) -> f64 {
    let ops = &config.operations;
    teu * ops.peak_factor * dwell_days / (stack.occupancy * ops.operational_days * stack.height)
}

/// Laden stack: `(laden_slots + reefer_slots) × height` TEU against installed stack TEU.
pub fn laden_stack_check(
    registry: &AssetRegistry,
    demand: &YearDemand,
    config: &TerminalConfig,
    mode: Mode,
) -> CapacityCheck {
    let st = &config.stacks.laden;
    let laden = ground_slots(demand.laden_teu, st.dwell_days, st, config);
    let reefer = ground_slots(demand.reefer_teu, config.stacks.reefer_dwell_days, st, config);
    CapacityCheck {
        required: (laden + reefer) * st.height,
        installed: registry.capacity(AssetKind::LadenStack, mode),
    }
}

pub fn empty_stack_check(
    registry: &AssetRegistry,
    demand: &YearDemand,
    config: &TerminalConfig,
    mode: Mode,
) -> CapacityCheck {
    let st = &config.stacks.empty;
    CapacityCheck {
        required: ground_slots(demand.empty_teu, st.dwell_days, st, config) * st.height,
        installed: registry.capacity(AssetKind::EmptyStack, mode),
    }
}

/// Out-of-gauge boxes; the configured height is normally one.
pub fn oog_stack_check(
    registry: &AssetRegistry,
    demand: &YearDemand,
    config: &TerminalConfig,
    mode: Mode,
) -> CapacityCheck {
    let st = &config.stacks.oog;
    CapacityCheck {
        required: ground_slots(demand.oog_teu, st.dwell_days, st, config) * st.height,
        installed: registry.capacity(AssetKind::OogStack, mode),
    }
}

/// Gate lane-minutes: truck boxes × (entry + exit minutes) × peak factor,
/// against lanes × operational hours × 60.
pub fn gate_check(
    registry: &AssetRegistry,
    demand: &YearDemand,
    config: &TerminalConfig,
    mode: Mode,
) -> CapacityCheck {
    let ops = &config.operations;
    let boxes = demand.truck_teu / ops.teu_factor;
    let required =
        boxes * (config.gate.entry_minutes + config.gate.exit_minutes) * ops.peak_factor;
    let lanes = registry.capacity(AssetKind::Gate, mode);
    CapacityCheck {
        required,
        installed: lanes * ops.operational_hours * 60.0,
    }
}

/// Barge TEU against the yearly throughput of the barge cranes on one side.
pub fn barge_berth_check(
    registry: &AssetRegistry,
    demand: &YearDemand,
    side: BargeSide,
    mode: Mode,
) -> CapacityCheck {
    let installed = registry
        .select(AssetKind::BargeCrane, mode)
        .filter(|(_, a)| a.detail.barge_side() == Some(side))
        .map(|(_, a)| a.capacity)
        .sum();
    CapacityCheck {
        required: demand.barge_teu,
        installed,
    }
}

/// Barges needed for the year's barge volume against barges in the fleet.
pub fn barge_fleet_check(
    registry: &AssetRegistry,
    demand: &YearDemand,
    barge: &BargeParams,
    config: &TerminalConfig,
    mode: Mode,
) -> CapacityCheck {
    let per_barge = barge.barge_annual_capacity(&config.operations);
    let required = if demand.barge_teu <= 0.0 {
        0.0
    } else if per_barge <= 0.0 {
        f64::INFINITY
    } else {
        (demand.barge_teu / per_barge).ceil()
    };
    CapacityCheck {
        required,
        installed: registry.count(AssetKind::Barge, mode) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;
    use terminal_core::{Asset, AssetDetail, CostProfile, ScheduleInfo};

    fn demand(calls: u32) -> YearDemand {
        YearDemand {
            year: 2030,
            total_teu: 1_600.0 * calls as f64,
            calls: BTreeMap::from([("panamax".to_string(), calls)]),
            laden_teu: 100_000.0,
            reefer_teu: 10_000.0,
            empty_teu: 20_000.0,
            oog_teu: 1_000.0,
            hinterland_teu: 160_000.0,
            truck_teu: 160_000.0,
            barge_teu: 0.0,
        }
    }

    fn push(r: &mut AssetRegistry, kind: AssetKind, online: i32, capacity: f64, detail: AssetDetail) {
        r.push(Asset::new(
            kind,
            "x",
            ScheduleInfo::new(online, 0, 30, 0, None),
            capacity,
            CostProfile::default(),
            detail,
        ));
    }

    #[test]
    fn ratio_sentinels() {
        assert_eq!(ratio(0.0, 0.0), 0.0);
        assert_eq!(ratio(1.0, 0.0), f64::INFINITY);
        assert_eq!(ratio(1.0, 4.0), 0.25);
    }

    #[test]
    fn no_cranes_is_infinite_occupancy() {
        let cfg = TerminalConfig::default();
        let mut r = AssetRegistry::new();
        push(&mut r, AssetKind::Berth, 2030, 4.0, AssetDetail::Berth { max_cranes: 4 });
        let q = quay_occupancy(&r, &demand(100), &cfg, Mode::Planned);
        assert_eq!(q.berth, f64::INFINITY);
        assert_eq!(q.crane, f64::INFINITY);
        let q = quay_occupancy(&r, &demand(0), &cfg, Mode::Planned);
        assert_eq!(q.berth, 0.0);
    }

    #[test]
    fn quay_formula() {
        let cfg = TerminalConfig::default();
        let mut r = AssetRegistry::new();
        push(&mut r, AssetKind::Berth, 2028, 4.0, AssetDetail::Berth { max_cranes: 4 });
        push(&mut r, AssetKind::Berth, 2032, 4.0, AssetDetail::Berth { max_cranes: 4 });
        push(&mut r, AssetKind::Crane, 2028, 30.0, AssetDetail::Crane { berth: None });
        push(&mut r, AssetKind::Crane, 2028, 30.0, AssetDetail::Crane { berth: None });
        let d = demand(100);
        let planned = quay_occupancy(&r, &d, &cfg, Mode::Planned);
        // 100 calls × (1600 / 60 + 3 / 2) / 7500
        let expected = 100.0 * (1_600.0 / 60.0 + 3.0 / 2.0) / 7_500.0;
        assert!((planned.berth - expected).abs() < 1e-12);
        assert!((planned.crane - 100.0 * 1_600.0 / 60.0 / 7_500.0).abs() < 1e-12);
        let online = quay_occupancy(&r, &d, &cfg, Mode::Online(2030));
        assert_eq!(online.berths, 1);
        assert!(online.berth > planned.berth);
    }

    #[test]
    fn stacks_compare_required_and_installed() {
        let cfg = TerminalConfig::default();
        let mut r = AssetRegistry::new();
        let d = demand(10);
        let check = laden_stack_check(&r, &d, &cfg, Mode::Planned);
        assert_eq!(check.installed, 0.0);
        assert_eq!(check.ratio(), f64::INFINITY);
        let st = &cfg.stacks.laden;
        let expected = (100_000.0 * 1.2 * 5.0 + 10_000.0 * 1.2 * 5.0) / (0.8 * 365.0);
        assert!((check.required - expected).abs() < 1e-6);
        for _ in 0..3 {
            push(&mut r, AssetKind::LadenStack, 2030, st.capacity_per_unit(), AssetDetail::None);
        }
        let check = laden_stack_check(&r, &d, &cfg, Mode::Planned);
        assert!(check.satisfied());
        assert!(!empty_stack_check(&r, &d, &cfg, Mode::Planned).satisfied());
        assert!(oog_stack_check(&r, &d, &cfg, Mode::Planned).required > 0.0);
    }

    #[test]
    fn gate_lane_minutes() {
        let cfg = TerminalConfig::default();
        let mut r = AssetRegistry::new();
        push(&mut r, AssetKind::Gate, 2030, 1.0, AssetDetail::None);
        let check = gate_check(&r, &demand(10), &cfg, Mode::Planned);
        // 100_000 boxes × 3 minutes × 1.2
        assert!((check.required - 360_000.0).abs() < 1e-6);
        assert_eq!(check.installed, 7_500.0 * 60.0);
    }

    #[test]
    fn barge_side_filter() {
        let mut r = AssetRegistry::new();
        push(
            &mut r,
            AssetKind::BargeCrane,
            2030,
            50_000.0,
            AssetDetail::BargeCrane {
                side: BargeSide::Offshore,
                berth: None,
            },
        );
        let mut d = demand(10);
        d.barge_teu = 80_000.0;
        let off = barge_berth_check(&r, &d, BargeSide::Offshore, Mode::Planned);
        let on = barge_berth_check(&r, &d, BargeSide::Onshore, Mode::Planned);
        assert!((off.ratio() - 1.6).abs() < 1e-12);
        assert_eq!(on.ratio(), f64::INFINITY);
    }

    #[test]
    fn barge_fleet_rounds_up() {
        let cfg = TerminalConfig::default();
        let barge = BargeParams::reference();
        let r = AssetRegistry::new();
        let mut d = demand(10);
        d.barge_teu = barge.barge_annual_capacity(&cfg.operations) * 2.5;
        let check = barge_fleet_check(&r, &d, &barge, &cfg, Mode::Planned);
        assert_eq!(check.required, 3.0);
        assert_eq!(check.installed, 0.0);
    }

    proptest! {
        #[test]
        fn more_cranes_never_raise_occupancy(calls in 1u32..2_000, cranes in 1usize..20, berths in 1usize..8) {
            let cfg = TerminalConfig::default();
            let mut r = AssetRegistry::new();
            for _ in 0..berths {
                push(&mut r, AssetKind::Berth, 2030, 4.0, AssetDetail::Berth { max_cranes: 4 });
            }
            for _ in 0..cranes {
                push(&mut r, AssetKind::Crane, 2030, 29.8, AssetDetail::Crane { berth: None });
            }
            let before = quay_occupancy(&r, &demand(calls), &cfg, Mode::Planned);
            push(&mut r, AssetKind::Crane, 2030, 29.8, AssetDetail::Crane { berth: None });
            let after = quay_occupancy(&r, &demand(calls), &cfg, Mode::Planned);
            prop_assert!(after.berth < before.berth);
            prop_assert!(after.crane < before.crane);
        }
    }
}
