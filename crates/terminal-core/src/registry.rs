//! Append-only asset registry.

use crate::asset::{Asset, AssetId, AssetKind};
use serde::{Deserialize, Serialize};

/// Which assets a query sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Every asset, whether or not it is online yet.
    Planned,
    /// Only assets with `year_online <= year`.
    Online(i32),
}

impl Mode {
    pub fn includes(self, asset: &Asset) -> bool {
        match self {
            Mode::Planned => true,
            Mode::Online(year) => asset.is_online(year),
        }
    }
}

/// Ordered collection of assets; insertion order is creation order.
///
/// There is no removal and no mutable access: once pushed, an asset is fixed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRegistry {
    assets: Vec<Asset>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an asset and return its id.
    pub fn push(&mut self, asset: Asset) -> AssetId {
        let id = AssetId(self.assets.len() as u32);
        self.assets.push(asset);
        id
    }

    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetId, &Asset)> + '_ {
        self.assets
            .iter()
            .enumerate()
            .map(|(i, a)| (AssetId(i as u32), a))
    }

    pub fn assets_of_kind(&self, kind: AssetKind) -> impl Iterator<Item = (AssetId, &Asset)> + '_ {
        self.iter().filter(move |(_, a)| a.kind == kind)
    }

    /// Assets of `kind` visible under `mode`.
    pub fn select(
        &self,
        kind: AssetKind,
        mode: Mode,
    ) -> impl Iterator<Item = (AssetId, &Asset)> + '_ {
        self.assets_of_kind(kind)
            .filter(move |(_, a)| mode.includes(a))
    }

    pub fn count(&self, kind: AssetKind, mode: Mode) -> usize {
        self.select(kind, mode).count()
    }

    pub fn count_planned(&self, kind: AssetKind) -> usize {
        self.count(kind, Mode::Planned)
    }

    /// `|{a : kind(a) = kind ∧ a.year_online ≤ year}|`
    pub fn count_online(&self, kind: AssetKind, year: i32) -> usize {
        self.count(kind, Mode::Online(year))
    }

    /// Summed `capacity` of the assets of `kind` visible under `mode`.
    pub fn capacity(&self, kind: AssetKind, mode: Mode) -> f64 {
        self.select(kind, mode).map(|(_, a)| a.capacity).sum()
    }

    /// Latest online year among assets of `kind`, if any exist.
    pub fn latest_online(&self, kind: AssetKind) -> Option<i32> {
        self.assets_of_kind(kind).map(|(_, a)| a.year_online()).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetDetail, CostProfile, ScheduleInfo};
    use proptest::prelude::*;

    fn asset(kind: AssetKind, online: i32, capacity: f64) -> Asset {
        Asset::new(
            kind,
            format!("{kind:?}"),
            ScheduleInfo::new(online, 0, 20, 0, None),
            capacity,
            CostProfile::default(),
            AssetDetail::None,
        )
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut r = AssetRegistry::new();
        let a = r.push(asset(AssetKind::Berth, 2030, 3.0));
        let b = r.push(asset(AssetKind::Crane, 2031, 30.0));
        assert_eq!(a, AssetId(0));
        assert_eq!(b, AssetId(1));
        assert_eq!(r.get(b).map(|x| x.kind), Some(AssetKind::Crane));
        assert!(r.get(AssetId(9)).is_none());
    }

    #[test]
    fn online_and_planned_views() {
        let mut r = AssetRegistry::new();
        r.push(asset(AssetKind::Crane, 2030, 30.0));
        r.push(asset(AssetKind::Crane, 2032, 25.0));
        r.push(asset(AssetKind::Gate, 2030, 1.0));
        assert_eq!(r.count_planned(AssetKind::Crane), 2);
        assert_eq!(r.count_online(AssetKind::Crane, 2031), 1);
        assert_eq!(r.capacity(AssetKind::Crane, Mode::Online(2031)), 30.0);
        assert_eq!(r.capacity(AssetKind::Crane, Mode::Planned), 55.0);
        assert_eq!(r.latest_online(AssetKind::Crane), Some(2032));
        assert_eq!(r.latest_online(AssetKind::Berth), None);
    }

    proptest! {
        #[test]
        fn online_count_is_monotonic(years in proptest::collection::vec(2020i32..2060, 0..40),
                                     y1 in 2020i32..2060, dy in 0i32..20) {
            let mut r = AssetRegistry::new();
            for y in years {
                r.push(asset(AssetKind::LadenStack, y, 1000.0));
            }
            let y2 = y1 + dy;
            prop_assert!(r.count_online(AssetKind::LadenStack, y1) <= r.count_online(AssetKind::LadenStack, y2));
            prop_assert!(r.count_online(AssetKind::LadenStack, y2) <= r.count_planned(AssetKind::LadenStack));
        }
    }
}
