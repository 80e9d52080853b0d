//! Annual demand scenario with validated category splits.

use crate::{check_fraction, check_non_negative, ConfigError, SPLIT_TOLERANCE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Container-type mix; the four fractions sum to one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerMix {
    pub laden: f64,
    pub reefer: f64,
    pub empty: f64,
    pub oog: f64,
}

/// Fixed percentage splits applied to every year's volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandSplits {
    pub container: ContainerMix,
    /// Vessel class name to share of volume; shares sum to one.
    pub vessel_mix: BTreeMap<String, f64>,
    /// Share of volume transferred ship-to-ship, never crossing the gate.
    #[serde(default)]
    pub transhipment_ratio: f64,
    /// Share of hinterland volume carried by barge instead of truck.
    #[serde(default)]
    pub barge_share: f64,
}

impl DemandSplits {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.container;
        check_group(
            "container",
            [
                ("laden", c.laden),
                ("reefer", c.reefer),
                ("empty", c.empty),
                ("oog", c.oog),
            ]
            .into_iter(),
        )?;
        check_group(
            "vessel_mix",
            self.vessel_mix.iter().map(|(k, v)| (k.as_str(), *v)),
        )?;
        check_fraction("transhipment_ratio", self.transhipment_ratio)?;
        check_fraction("barge_share", self.barge_share)?;
        Ok(())
    }
}

fn check_group<'a>(
    group: &str,
    parts: impl Iterator<Item = (&'a str, f64)>,
) -> Result<(), ConfigError> {
    let mut sum = 0.0;
    let mut n = 0;
    for (name, v) in parts {
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            return Err(ConfigError::InvalidSplitConfiguration {
                group: group.to_string(),
                reason: format!("{name} = {v} is outside [0,1]"),
            });
        }
        sum += v;
        n += 1;
    }
    if n == 0 {
        return Err(ConfigError::InvalidSplitConfiguration {
            group: group.to_string(),
            reason: "no entries".to_string(),
        });
    }
    if (sum - 1.0).abs() > SPLIT_TOLERANCE {
        return Err(ConfigError::InvalidSplitConfiguration {
            group: group.to_string(),
            reason: format!("fractions sum to {sum}"),
        });
    }
    Ok(())
}

/// Year to total TEU, plus the splits. Validated once in [`DemandScenario::new`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DemandScenario {
    volumes: BTreeMap<i32, f64>,
    splits: DemandSplits,
}

impl DemandScenario {
    pub fn new(volumes: BTreeMap<i32, f64>, splits: DemandSplits) -> Result<Self, ConfigError> {
        if volumes.is_empty() {
            return Err(ConfigError::EmptyScenario);
        }
        for (year, v) in &volumes {
            check_non_negative(&format!("volume[{year}]"), *v)?;
        }
        splits.validate()?;
        Ok(Self { volumes, splits })
    }

    /// Volume for `year`, or `None` if the scenario has no row for it.
    pub fn volume(&self, year: i32) -> Option<f64> {
        self.volumes.get(&year).copied()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.volumes.keys().copied()
    }

    pub fn splits(&self) -> &DemandSplits {
        &self.splits
    }
}

#[derive(Deserialize)]
struct RawScenario {
    volumes: BTreeMap<i32, f64>,
    splits: DemandSplits,
}

impl<'de> Deserialize<'de> for DemandScenario {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawScenario::deserialize(deserializer)?;
        DemandScenario::new(raw.volumes, raw.splits).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn splits() -> DemandSplits {
        DemandSplits {
            container: ContainerMix {
                laden: 0.75,
                reefer: 0.1,
                empty: 0.1,
                oog: 0.05,
            },
            vessel_mix: BTreeMap::from([("feeder".to_string(), 0.4), ("panamax".to_string(), 0.6)]),
            transhipment_ratio: 0.3,
            barge_share: 0.0,
        }
    }

    #[test]
    fn scenario_lookup() {
        let s = DemandScenario::new(BTreeMap::from([(2025, 500_000.0), (2026, 550_000.0)]), splits())
            .unwrap();
        assert_eq!(s.volume(2026), Some(550_000.0));
        assert_eq!(s.volume(2031), None);
        assert_eq!(s.years().collect::<Vec<_>>(), vec![2025, 2026]);
    }

    #[test]
    fn split_not_summing_to_one_is_rejected() {
        let mut sp = splits();
        sp.container.empty = 0.2;
        let err = DemandScenario::new(BTreeMap::from([(2025, 1.0)]), sp).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSplitConfiguration { ref group, .. } if group == "container"
        ));
    }

    #[test]
    fn out_of_range_share_is_rejected() {
        let mut sp = splits();
        sp.vessel_mix.insert("feeder".into(), 1.4);
        sp.vessel_mix.insert("panamax".into(), -0.4);
        assert!(DemandScenario::new(BTreeMap::from([(2025, 1.0)]), sp).is_err());
    }

    #[test]
    fn empty_and_negative_volumes_are_rejected() {
        assert_eq!(
            DemandScenario::new(BTreeMap::new(), splits()),
            Err(ConfigError::EmptyScenario)
        );
        assert!(DemandScenario::new(BTreeMap::from([(2025, -5.0)]), splits()).is_err());
    }

    #[test]
    fn yaml_load_validates() {
        let good = "volumes:\n  2025: 100000\nsplits:\n  container: {laden: 0.8, reefer: 0.1, empty: 0.1, oog: 0.0}\n  vessel_mix: {feeder: 1.0}\n";
        let s: DemandScenario = serde_yaml::from_str(good).unwrap();
        assert_eq!(s.volume(2025), Some(100_000.0));
        let bad = good.replace("feeder: 1.0", "feeder: 0.5");
        assert!(serde_yaml::from_str::<DemandScenario>(&bad).is_err());
    }

    #[test]
    fn bundled_baseline_scenario_loads() {
        let text = include_str!("../../../assets/scenarios/baseline.yaml");
        let s: DemandScenario = serde_yaml::from_str(text).unwrap();
        assert_eq!(s.years().count(), 20);
        assert_eq!(s.volume(2025), Some(500_000.0));
        assert_eq!(s.splits().vessel_mix.len(), 3);
    }

    proptest! {
        #[test]
        fn normalised_mixes_validate(a in 0.0f64..1.0, b in 0.0f64..1.0, c in 0.0f64..1.0, d in 0.01f64..1.0) {
            let total = a + b + c + d;
            let mut sp = splits();
            sp.container = ContainerMix { laden: a / total, reefer: b / total, empty: c / total, oog: d / total };
            prop_assert!(sp.validate().is_ok());
        }
    }
}
