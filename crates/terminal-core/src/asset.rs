//! Asset records: the unit of investment placed in the registry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position of an asset in the registry. Stable because the registry is append-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u32);

/// Closed set of asset kinds the planner can invest in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Berth,
    QuayWall,
    Crane,
    HorizontalTransport,
    LadenStack,
    EmptyStack,
    OogStack,
    StackEquipment,
    Gate,
    EmptyHandler,
    GeneralServices,
    Channel,
    Reclamation,
    Revetment,
    Breakwater,
    Barge,
    BargeBerth,
    BargeQuayWall,
    BargeCrane,
}

impl AssetKind {
    /// Every kind, in declaration order.
    pub const ALL: [AssetKind; 19] = [
        AssetKind::Berth,
        AssetKind::QuayWall,
        AssetKind::Crane,
        AssetKind::HorizontalTransport,
        AssetKind::LadenStack,
        AssetKind::EmptyStack,
        AssetKind::OogStack,
        AssetKind::StackEquipment,
        AssetKind::Gate,
        AssetKind::EmptyHandler,
        AssetKind::GeneralServices,
        AssetKind::Channel,
        AssetKind::Reclamation,
        AssetKind::Revetment,
        AssetKind::Breakwater,
        AssetKind::Barge,
        AssetKind::BargeBerth,
        AssetKind::BargeQuayWall,
        AssetKind::BargeCrane,
    ];

    /// Cost-reporting subsystem the kind belongs to.
    pub fn subsystem(self) -> Subsystem {
        match self {
            AssetKind::Berth | AssetKind::QuayWall => Subsystem::Quay,
            AssetKind::Crane => Subsystem::Cranes,
            AssetKind::HorizontalTransport => Subsystem::HorizontalTransport,
            AssetKind::LadenStack | AssetKind::EmptyStack | AssetKind::OogStack => {
                Subsystem::Stack
            }
            AssetKind::StackEquipment => Subsystem::StackEquipment,
            AssetKind::Gate => Subsystem::Gate,
            AssetKind::EmptyHandler => Subsystem::EmptyHandling,
            AssetKind::GeneralServices => Subsystem::GeneralServices,
            AssetKind::Channel => Subsystem::Dredging,
            AssetKind::Reclamation | AssetKind::Revetment | AssetKind::Breakwater => {
                Subsystem::SiteWorks
            }
            AssetKind::Barge
            | AssetKind::BargeBerth
            | AssetKind::BargeQuayWall
            | AssetKind::BargeCrane => Subsystem::Barge,
        }
    }

    /// Quay-type structures whose capex is back-loaded over the build period.
    pub fn is_quay_type(self) -> bool {
        matches!(
            self,
            AssetKind::Berth | AssetKind::QuayWall | AssetKind::BargeBerth | AssetKind::BargeQuayWall
        )
    }

    /// Earthworks whose capex is spread evenly over the build period.
    pub fn is_earthwork(self) -> bool {
        matches!(
            self,
            AssetKind::Reclamation | AssetKind::Revetment | AssetKind::Breakwater | AssetKind::Channel
        )
    }
}

/// Grouping used for the capex/opex columns of the cashflow table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subsystem {
    Quay,
    Cranes,
    HorizontalTransport,
    Stack,
    StackEquipment,
    Gate,
    EmptyHandling,
    GeneralServices,
    SiteWorks,
    Dredging,
    Barge,
}

/// Which end of the barge connection an asset serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BargeSide {
    Offshore,
    Onshore,
}

/// Kind-specific geometry and relationships.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AssetDetail {
    None,
    Berth {
        max_cranes: u32,
    },
    Quay {
        length_m: f64,
        depth_m: f64,
    },
    /// `berth` is a weak reference: the berth whose slot the crane occupies.
    Crane {
        berth: Option<AssetId>,
    },
    Stack {
        ground_slots: f64,
        height: f64,
    },
    Channel {
        length_m: f64,
        width_m: f64,
        depth_m: f64,
        dredging_volume_m3: f64,
    },
    Reclamation {
        area_m2: f64,
        volume_m3: f64,
    },
    Linear {
        length_m: f64,
    },
    BargeBerth {
        side: BargeSide,
        max_cranes: u32,
    },
    BargeQuay {
        side: BargeSide,
        length_m: f64,
        depth_m: f64,
    },
    BargeCrane {
        side: BargeSide,
        berth: Option<AssetId>,
    },
}

impl AssetDetail {
    /// Barge side for barge-terminal assets.
    pub fn barge_side(&self) -> Option<BargeSide> {
        match self {
            AssetDetail::BargeBerth { side, .. }
            | AssetDetail::BargeQuay { side, .. }
            | AssetDetail::BargeCrane { side, .. } => Some(*side),
            _ => None,
        }
    }

    /// Crane slots offered by a berth.
    pub fn max_cranes(&self) -> Option<u32> {
        match self {
            AssetDetail::Berth { max_cranes } | AssetDetail::BargeBerth { max_cranes, .. } => {
                Some(*max_cranes)
            }
            _ => None,
        }
    }

    /// Berth a crane reports to.
    pub fn crane_berth(&self) -> Option<AssetId> {
        match self {
            AssetDetail::Crane { berth } | AssetDetail::BargeCrane { berth, .. } => *berth,
            _ => None,
        }
    }
}

/// Purchase and commissioning dates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub purchase_year: i32,
    /// Build lead time in years.
    pub delivery_time: u32,
    pub year_online: i32,
    pub lifespan: u32,
}

impl ScheduleInfo {
    /// Online year is `purchase_year + delivery_time + offset`, pushed back to
    /// `not_before` when a dependency comes online later.
    pub fn new(
        purchase_year: i32,
        delivery_time: u32,
        lifespan: u32,
        offset: i32,
        not_before: Option<i32>,
    ) -> Self {
        let own = purchase_year + delivery_time as i32 + offset;
        let year_online = not_before.map_or(own, |dep| own.max(dep));
        Self {
            purchase_year,
            delivery_time,
            year_online,
            lifespan,
        }
    }
}

/// Cost components tracked per asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CostLine {
    Capex,
    Maintenance,
    Insurance,
    Energy,
    Fuel,
    Labour,
}

impl CostLine {
    /// Recurring lines, in reporting order.
    pub const OPEX: [CostLine; 5] = [
        CostLine::Maintenance,
        CostLine::Insurance,
        CostLine::Energy,
        CostLine::Fuel,
        CostLine::Labour,
    ];
}

/// Recurring annual costs in USD. Each component may be zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpexProfile {
    pub maintenance: Decimal,
    pub insurance: Decimal,
    pub energy: Decimal,
    pub fuel: Decimal,
    pub labour: Decimal,
}

impl OpexProfile {
    pub fn get(&self, line: CostLine) -> Decimal {
        match line {
            CostLine::Capex => Decimal::ZERO,
            CostLine::Maintenance => self.maintenance,
            CostLine::Insurance => self.insurance,
            CostLine::Energy => self.energy,
            CostLine::Fuel => self.fuel,
            CostLine::Labour => self.labour,
        }
    }

    pub fn total(&self) -> Decimal {
        CostLine::OPEX.iter().map(|l| self.get(*l)).sum()
    }
}

/// One-time and recurring costs of an asset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostProfile {
    pub capex: Decimal,
    pub opex: OpexProfile,
}

/// Year-indexed cost amounts of a single asset, populated by the cashflow scheduler.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashflowSeries {
    entries: BTreeMap<i32, BTreeMap<CostLine, Decimal>>,
}

impl CashflowSeries {
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Add `amount` to the (year, line) cell. Zero amounts are not stored.
    pub fn add(&mut self, year: i32, line: CostLine, amount: Decimal) {
        if amount.is_zero() {
            return;
        }
        *self
            .entries
            .entry(year)
            .or_default()
            .entry(line)
            .or_insert(Decimal::ZERO) += amount;
    }

    pub fn get(&self, year: i32, line: CostLine) -> Decimal {
        self.entries
            .get(&year)
            .and_then(|row| row.get(&line))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of one line over every year.
    pub fn total(&self, line: CostLine) -> Decimal {
        self.entries
            .values()
            .filter_map(|row| row.get(&line))
            .copied()
            .sum()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, CostLine, Decimal)> + '_ {
        self.entries
            .iter()
            .flat_map(|(y, row)| row.iter().map(move |(l, a)| (*y, *l, *a)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single piece of terminal infrastructure or equipment.
///
/// `capacity` is in the unit natural to the kind: TEU/h for cranes, TEU for
/// stacks, crane slots for berths, metres for quays, TEU/yr for barge cranes,
/// units for mobile equipment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub kind: AssetKind,
    pub name: String,
    pub schedule: ScheduleInfo,
    pub capacity: f64,
    pub cost: CostProfile,
    pub detail: AssetDetail,
    pub cashflow: CashflowSeries,
}

impl Asset {
    pub fn new(
        kind: AssetKind,
        name: impl Into<String>,
        schedule: ScheduleInfo,
        capacity: f64,
        cost: CostProfile,
        detail: AssetDetail,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            schedule,
            capacity: capacity.max(0.0),
            cost,
            detail,
            cashflow: CashflowSeries::default(),
        }
    }

    pub fn year_online(&self) -> i32 {
        self.schedule.year_online
    }

    pub fn is_online(&self, year: i32) -> bool {
        self.schedule.year_online <= year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_respects_dependency() {
        let s = ScheduleInfo::new(2030, 1, 20, 0, Some(2033));
        assert_eq!(s.year_online, 2033);
        let s = ScheduleInfo::new(2030, 2, 20, 1, Some(2031));
        assert_eq!(s.year_online, 2033);
        let s = ScheduleInfo::new(2030, 0, 20, 0, None);
        assert_eq!(s.year_online, 2030);
    }

    #[test]
    fn subsystems_group_kinds() {
        let members = |sub: Subsystem| {
            AssetKind::ALL
                .into_iter()
                .filter(|k| k.subsystem() == sub)
                .collect::<Vec<_>>()
        };
        assert_eq!(members(Subsystem::Quay), [AssetKind::Berth, AssetKind::QuayWall]);
        assert_eq!(
            members(Subsystem::Stack),
            [AssetKind::LadenStack, AssetKind::EmptyStack, AssetKind::OogStack]
        );
        assert_eq!(
            members(Subsystem::SiteWorks),
            [AssetKind::Reclamation, AssetKind::Revetment, AssetKind::Breakwater]
        );
        assert_eq!(
            members(Subsystem::Barge),
            [
                AssetKind::Barge,
                AssetKind::BargeBerth,
                AssetKind::BargeQuayWall,
                AssetKind::BargeCrane
            ]
        );
        assert_eq!(members(Subsystem::Dredging), [AssetKind::Channel]);
        assert_eq!(members(Subsystem::Cranes), [AssetKind::Crane]);
    }

    #[test]
    fn series_accumulates_and_skips_zero() {
        let mut s = CashflowSeries::default();
        s.add(2030, CostLine::Capex, Decimal::new(100, 0));
        s.add(2030, CostLine::Capex, Decimal::new(50, 0));
        s.add(2031, CostLine::Labour, Decimal::ZERO);
        assert_eq!(s.get(2030, CostLine::Capex), Decimal::new(150, 0));
        assert_eq!(s.years().count(), 1);
        assert_eq!(s.total(CostLine::Capex), Decimal::new(150, 0));
    }

    #[test]
    fn negative_capacity_is_clamped() {
        let a = Asset::new(
            AssetKind::Gate,
            "gate",
            ScheduleInfo::new(2030, 1, 15, 0, None),
            -3.0,
            CostProfile::default(),
            AssetDetail::None,
        );
        assert_eq!(a.capacity, 0.0);
        assert!(a.is_online(2031));
        assert!(!a.is_online(2030));
    }

    #[test]
    fn asset_json_roundtrip() {
        let mut a = Asset::new(
            AssetKind::Crane,
            "STS crane",
            ScheduleInfo::new(2030, 1, 40, 0, None),
            29.8,
            CostProfile::default(),
            AssetDetail::Crane {
                berth: Some(AssetId(0)),
            },
        );
        a.cashflow.add(2030, CostLine::Capex, Decimal::new(10_000_000, 0));
        let s = serde_json::to_string(&a).unwrap();
        let back: Asset = serde_json::from_str(&s).unwrap();
        assert_eq!(back, a);
    }
}
