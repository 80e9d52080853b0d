//! Placement of an asset's costs in time.

use rust_decimal::Decimal;
use terminal_core::{Asset, AssetKind, CostLine, Horizon};
use tracing::debug;

/// Capex shares paid two years and one year before the online year.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapexSplit {
    pub first: Decimal,
    pub second: Decimal,
}

/// Build-period capex split for a kind: quay structures 40/60,
/// earthworks and dredging 50/50, everything else 60/40.
pub fn capex_split(kind: AssetKind) -> CapexSplit {
    let first = if kind.is_quay_type() {
        Decimal::new(4, 1)
    } else if kind.is_earthwork() {
        Decimal::new(5, 1)
    } else {
        Decimal::new(6, 1)
    };
    CapexSplit {
        first,
        second: Decimal::ONE - first,
    }
}

/// Populate `asset.cashflow` over the horizon.
///
/// With a lead time above one year capex is split over `year_online - 2`
/// and `year_online - 1`; otherwise it all lands in `year_online - 1`.
/// Each opex component is charged unchanged for every year from
/// `year_online` to the end of the horizon. Rerunning yields the same series.
pub fn schedule(asset: &mut Asset, horizon: &Horizon) {
    asset.cashflow.clear();
    let online = asset.schedule.year_online;
    let capex = asset.cost.capex;
    if asset.schedule.delivery_time > 1 {
        let split = capex_split(asset.kind);
        let first = (capex * split.first).round_dp(2);
        asset.cashflow.add(online - 2, CostLine::Capex, first);
        asset.cashflow.add(online - 1, CostLine::Capex, capex - first);
    } else {
        asset.cashflow.add(online - 1, CostLine::Capex, capex);
    }
    for year in online..horizon.end_year() {
        for line in CostLine::OPEX {
            asset.cashflow.add(year, line, asset.cost.opex.get(line));
        }
    }
    debug!(kind = ?asset.kind, online, %capex, "scheduled cashflows");
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use terminal_core::{AssetDetail, CostProfile, OpexProfile, ScheduleInfo};

    fn asset(kind: AssetKind, delivery: u32, online: i32, capex: i64) -> Asset {
        let mut a = Asset::new(
            kind,
            "test",
            ScheduleInfo {
                purchase_year: online - delivery as i32,
                delivery_time: delivery,
                year_online: online,
                lifespan: 30,
            },
            1.0,
            CostProfile {
                capex: Decimal::new(capex, 0),
                opex: OpexProfile {
                    maintenance: Decimal::new(10_000, 0),
                    labour: Decimal::new(50_000, 0),
                    ..OpexProfile::default()
                },
            },
            AssetDetail::None,
        );
        a.cashflow.add(1999, CostLine::Fuel, Decimal::ONE);
        a
    }

    fn horizon() -> Horizon {
        Horizon {
            start_year: 2020,
            years: 20,
        }
    }

    #[test]
    fn quay_type_uses_forty_sixty() {
        for kind in [AssetKind::QuayWall, AssetKind::BargeQuayWall] {
            let mut a = asset(kind, 2, 2025, 1_000_000);
            schedule(&mut a, &horizon());
            assert_eq!(a.cashflow.get(2023, CostLine::Capex), Decimal::new(400_000, 0));
            assert_eq!(a.cashflow.get(2024, CostLine::Capex), Decimal::new(600_000, 0));
            assert_eq!(a.cashflow.get(2025, CostLine::Capex), Decimal::ZERO);
            assert_eq!(a.cashflow.get(2022, CostLine::Capex), Decimal::ZERO);
        }
    }

    #[test]
    fn earthworks_split_evenly_and_equipment_front_loads() {
        let mut r = asset(AssetKind::Reclamation, 3, 2025, 1_000_000);
        schedule(&mut r, &horizon());
        assert_eq!(r.cashflow.get(2023, CostLine::Capex), Decimal::new(500_000, 0));
        let mut c = asset(AssetKind::Crane, 2, 2025, 1_000_000);
        schedule(&mut c, &horizon());
        assert_eq!(c.cashflow.get(2023, CostLine::Capex), Decimal::new(600_000, 0));
        assert_eq!(c.cashflow.get(2024, CostLine::Capex), Decimal::new(400_000, 0));
    }

    #[test]
    fn short_lead_time_pays_the_year_before() {
        let mut a = asset(AssetKind::Gate, 1, 2025, 70_000);
        schedule(&mut a, &horizon());
        assert_eq!(a.cashflow.get(2024, CostLine::Capex), Decimal::new(70_000, 0));
        let mut b = asset(AssetKind::HorizontalTransport, 0, 2025, 85_000);
        schedule(&mut b, &horizon());
        assert_eq!(b.cashflow.get(2024, CostLine::Capex), Decimal::new(85_000, 0));
    }

    #[test]
    fn opex_runs_from_online_to_horizon_end() {
        let mut a = asset(AssetKind::Crane, 1, 2025, 1_000);
        schedule(&mut a, &horizon());
        assert_eq!(a.cashflow.get(2024, CostLine::Labour), Decimal::ZERO);
        for y in 2025..2040 {
            assert_eq!(a.cashflow.get(y, CostLine::Labour), Decimal::new(50_000, 0));
            assert_eq!(a.cashflow.get(y, CostLine::Maintenance), Decimal::new(10_000, 0));
        }
        assert_eq!(a.cashflow.get(2040, CostLine::Labour), Decimal::ZERO);
        // stale entries from before scheduling are gone
        assert_eq!(a.cashflow.get(1999, CostLine::Fuel), Decimal::ZERO);
    }

    #[test]
    fn scheduling_is_idempotent() {
        let mut a = asset(AssetKind::QuayWall, 2, 2030, 12_345_678);
        schedule(&mut a, &horizon());
        let once = a.cashflow.clone();
        schedule(&mut a, &horizon());
        assert_eq!(a.cashflow, once);
    }

    proptest! {
        #[test]
        fn capex_is_conserved(cents in 0i64..1_000_000_000_000, delivery in 0u32..5,
                              kind_idx in 0usize..19, online in 2021i32..2045) {
            let kind = AssetKind::ALL[kind_idx];
            let mut a = asset(kind, delivery, online, 0);
            a.cost.capex = Decimal::new(cents, 2);
            schedule(&mut a, &horizon());
            prop_assert_eq!(a.cashflow.total(CostLine::Capex), a.cost.capex);
        }
    }
}
