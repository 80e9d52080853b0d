//! Terminal configuration injected into every planning component.
//!
//! All unit costs, crew sizes, lifespans, lead times, geometry, and trigger
//! thresholds live here. Money is [`Decimal`]; physical quantities are `f64`.
//! Every struct deserializes from YAML with missing sections falling back to
//! the reference container terminal in [`TerminalConfig::default`].

use crate::asset::BargeSide;
use crate::{check_fraction, check_non_negative, check_positive, ConfigError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Cost, schedule, and unit-capacity parameters shared by every asset kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetParams {
    /// Price per unit of quantity (per item, per metre, per m³ ...).
    pub unit_rate: Decimal,
    #[serde(default)]
    pub mobilisation_perc: Decimal,
    #[serde(default)]
    pub maintenance_perc: Decimal,
    #[serde(default)]
    pub insurance_perc: Decimal,
    /// Persons per unit, may be fractional to account for shifts.
    #[serde(default)]
    pub crew: Decimal,
    /// Annual salary per person.
    #[serde(default)]
    pub salary: Decimal,
    /// Annual energy bill per unit.
    #[serde(default)]
    pub energy: Decimal,
    /// Annual fuel bill per unit.
    #[serde(default)]
    pub fuel: Decimal,
    pub delivery_time: u32,
    pub lifespan: u32,
    /// Capacity contributed by one unit, in the kind's natural unit.
    #[serde(default)]
    pub capacity: f64,
}

impl AssetParams {
    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let money = [
            ("unit_rate", self.unit_rate),
            ("mobilisation_perc", self.mobilisation_perc),
            ("maintenance_perc", self.maintenance_perc),
            ("insurance_perc", self.insurance_perc),
            ("crew", self.crew),
            ("salary", self.salary),
            ("energy", self.energy),
            ("fuel", self.fuel),
        ];
        for (field, v) in money {
            if v < Decimal::ZERO {
                return Err(ConfigError::Negative(format!("{name}.{field}")));
            }
        }
        check_non_negative(&format!("{name}.capacity"), self.capacity)
    }
}

/// A vessel class calling at the terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VesselClass {
    pub name: String,
    /// TEU loaded and discharged per call.
    pub call_size_teu: f64,
    pub loa_m: f64,
    pub draft_m: f64,
    pub beam_m: f64,
    /// Cranes that can work one vessel of this class.
    pub max_cranes: u32,
    pub mooring_hours: f64,
    /// Contractual port time before demurrage is charged.
    pub all_turn_time_hours: f64,
    pub demurrage_rate_per_day: Decimal,
    #[serde(default)]
    pub ocean_transport_cost_per_call: Decimal,
}

/// Simulated years: `start_year .. start_year + years`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub start_year: i32,
    pub years: u32,
}

impl Horizon {
    /// First year after the horizon.
    pub fn end_year(&self) -> i32 {
        self.start_year + self.years as i32
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> {
        self.start_year..self.end_year()
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start_year..self.end_year()).contains(&year)
    }
}

/// Constants of the planning loop itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerParams {
    /// Investments allowed per trigger per year before giving up.
    pub max_iterations_per_trigger: u32,
    /// Extra years added to the online date of assets bought in the first year.
    pub first_year_online_offset: i32,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            max_iterations_per_trigger: 1_000,
            first_year_online_offset: 1,
        }
    }
}

/// Operating regime of the terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationsParams {
    pub operational_hours: f64,
    pub operational_days: f64,
    /// Ratio of peak to average yard and gate load.
    pub peak_factor: f64,
    /// TEU per box.
    pub teu_factor: f64,
}

impl Default for OperationsParams {
    fn default() -> Self {
        Self {
            operational_hours: 7_500.0,
            operational_days: 365.0,
            peak_factor: 1.2,
            teu_factor: 1.6,
        }
    }
}

/// Quay-side trigger policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BerthTrigger {
    /// Invest while planned berth occupancy exceeds the allowable occupancy.
    Occupancy,
    /// Additionally invest while the E2/E2/n waiting factor exceeds a bound.
    WaitingTime { allowable_waiting_factor: f64 },
}

/// Service-level thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Triggers {
    pub berth: BerthTrigger,
    pub allowable_berth_occupancy: f64,
    pub allowable_gate_occupancy: f64,
    pub allowable_barge_berth_occupancy: f64,
}

impl Default for Triggers {
    fn default() -> Self {
        Self {
            berth: BerthTrigger::Occupancy,
            allowable_berth_occupancy: 0.6,
            allowable_gate_occupancy: 0.6,
            allowable_barge_berth_occupancy: 0.8,
        }
    }
}

/// Quay geometry allowances and the quay wall / berth cost tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuayParams {
    pub berthing_gap_m: f64,
    pub tidal_range_m: f64,
    pub max_sinkage_m: f64,
    pub wave_motion_m: f64,
    pub safety_margin_m: f64,
    pub freeboard_m: f64,
    /// Quay wall cost per metre: `gijt_constant × (2 × depth + freeboard)^gijt_coefficient`.
    pub gijt_constant: f64,
    pub gijt_coefficient: f64,
    pub quay_wall: AssetParams,
    pub berth: AssetParams,
}

/// Ship-to-shore crane parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CraneParams {
    /// TEU per lift.
    pub lifting_capacity: f64,
    pub hourly_cycles: f64,
    pub efficiency: f64,
    /// Share of nominal throughput realised in operation.
    pub operational_factor: f64,
    pub asset: AssetParams,
}

impl CraneParams {
    /// Service rate of one crane in TEU per hour.
    pub fn effective_capacity(&self) -> f64 {
        self.operational_factor * self.lifting_capacity * self.hourly_cycles * self.efficiency
    }
}

/// Equipment sized as a ratio of cranes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatioParams {
    pub per_crane: f64,
    pub asset: AssetParams,
}

/// One stack block type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackParams {
    pub height: f64,
    pub ground_slots_per_unit: f64,
    pub dwell_days: f64,
    /// Allowable stack occupancy.
    pub occupancy: f64,
    pub asset: AssetParams,
}

impl StackParams {
    /// TEU stored by one stack unit.
    pub fn capacity_per_unit(&self) -> f64 {
        self.ground_slots_per_unit * self.height
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        check_positive(&format!("{name}.height"), self.height)?;
        check_positive(
            &format!("{name}.ground_slots_per_unit"),
            self.ground_slots_per_unit,
        )?;
        check_non_negative(&format!("{name}.dwell_days"), self.dwell_days)?;
        check_fraction(&format!("{name}.occupancy"), self.occupancy)?;
        check_positive(&format!("{name}.occupancy"), self.occupancy)?;
        self.asset.validate(name)
    }
}

/// Laden (including reefer), empty, and out-of-gauge stacks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StacksParams {
    pub laden: StackParams,
    pub reefer_dwell_days: f64,
    pub empty: StackParams,
    pub oog: StackParams,
}

/// How many yard machines are needed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EquipmentBasis {
    /// Machines per laden stack (RTG, RMG).
    PerStack(f64),
    /// Machines per quay crane (straddle carriers, reach stackers).
    PerCrane(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackEquipmentParams {
    pub basis: EquipmentBasis,
    pub asset: AssetParams,
}

/// Truck gate lanes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateParams {
    pub entry_minutes: f64,
    pub exit_minutes: f64,
    pub asset: AssetParams,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmptyHandlerParams {
    pub capacity_teu_per_year: f64,
    pub asset: AssetParams,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneralServicesParams {
    /// Quay cranes served by one general-services unit.
    pub cranes_per_unit: u32,
    pub asset: AssetParams,
}

/// Channel geometry after the PIANC width rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelParams {
    pub length_m: f64,
    pub design_beam_m: f64,
    pub design_draft_m: f64,
    pub two_way: bool,
    /// Basic manoeuvring lane, in beams.
    pub manoeuvring_factor: f64,
    /// Sum of additional width allowances, in beams.
    pub additional_factor: f64,
    /// Bank clearance per side, in beams.
    pub bank_clearance_factor: f64,
    /// Passing distance for two-way traffic, in beams.
    pub passing_factor: f64,
    pub under_keel_m: f64,
    pub natural_depth_m: f64,
    /// `unit_rate` is the dredging price per m³.
    pub asset: AssetParams,
}

/// Barge connection between an offshore terminal and an onshore hub.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BargeParams {
    pub sides: Vec<BargeSide>,
    /// `capacity` is TEU per barge.
    pub vessel: AssetParams,
    pub utilisation: f64,
    pub distance_km: f64,
    pub speed_kmh: f64,
    pub turnaround_hours: f64,
    pub max_cranes_per_berth: u32,
    pub berth: AssetParams,
    /// `unit_rate` is per metre of barge quay.
    pub quay: AssetParams,
    pub quay_length_m: f64,
    pub quay_depth_m: f64,
    pub crane_productivity_moves_per_hour: f64,
    pub crane_utilisation: f64,
    pub crane_efficiency: f64,
    pub crane: AssetParams,
    pub channel: ChannelParams,
}

impl BargeParams {
    /// Barge-crane throughput in TEU per year.
    pub fn crane_capacity(&self, ops: &OperationsParams) -> f64 {
        self.crane_productivity_moves_per_hour
            * ops.teu_factor
            * self.crane_utilisation
            * self.crane_efficiency
            * ops.operational_hours
    }

    /// TEU one barge moves in a year.
    pub fn barge_annual_capacity(&self, ops: &OperationsParams) -> f64 {
        let round_trip = 2.0 * self.distance_km / self.speed_kmh + self.turnaround_hours;
        if !(round_trip.is_finite() && round_trip > 0.0) {
            return 0.0;
        }
        self.vessel.capacity * self.utilisation * ops.operational_hours / round_trip
    }

    /// Reference barge connection over 40 km served at both ends.
    pub fn reference() -> Self {
        Self {
            sides: vec![BargeSide::Offshore, BargeSide::Onshore],
            vessel: AssetParams {
                unit_rate: Decimal::new(3_500_000, 0),
                mobilisation_perc: Decimal::ZERO,
                maintenance_perc: Decimal::new(2, 2),
                insurance_perc: Decimal::new(1, 2),
                crew: Decimal::new(4, 0),
                salary: Decimal::new(45_000, 0),
                energy: Decimal::ZERO,
                fuel: Decimal::new(250_000, 0),
                delivery_time: 1,
                lifespan: 25,
                capacity: 200.0,
            },
            utilisation: 0.8,
            distance_km: 40.0,
            speed_kmh: 14.0,
            turnaround_hours: 6.0,
            max_cranes_per_berth: 2,
            berth: AssetParams {
                unit_rate: Decimal::ZERO,
                mobilisation_perc: Decimal::ZERO,
                maintenance_perc: Decimal::ZERO,
                insurance_perc: Decimal::ZERO,
                crew: Decimal::ZERO,
                salary: Decimal::ZERO,
                energy: Decimal::ZERO,
                fuel: Decimal::ZERO,
                delivery_time: 1,
                lifespan: 50,
                capacity: 2.0,
            },
            quay: AssetParams {
                unit_rate: Decimal::new(25_000, 0),
                mobilisation_perc: Decimal::new(1, 1),
                maintenance_perc: Decimal::new(1, 2),
                insurance_perc: Decimal::new(1, 2),
                crew: Decimal::ZERO,
                salary: Decimal::ZERO,
                energy: Decimal::ZERO,
                fuel: Decimal::ZERO,
                delivery_time: 2,
                lifespan: 50,
                capacity: 0.0,
            },
            quay_length_m: 120.0,
            quay_depth_m: 5.0,
            crane_productivity_moves_per_hour: 20.0,
            crane_utilisation: 0.6,
            crane_efficiency: 0.8,
            crane: AssetParams {
                unit_rate: Decimal::new(2_500_000, 0),
                mobilisation_perc: Decimal::new(15, 2),
                maintenance_perc: Decimal::new(2, 2),
                insurance_perc: Decimal::new(1, 2),
                crew: Decimal::new(3, 0),
                salary: Decimal::new(56_000, 0),
                energy: Decimal::new(40_000, 0),
                fuel: Decimal::ZERO,
                delivery_time: 1,
                lifespan: 30,
                capacity: 0.0,
            },
            channel: ChannelParams {
                length_m: 10_000.0,
                design_beam_m: 11.4,
                design_draft_m: 3.5,
                two_way: true,
                manoeuvring_factor: 1.5,
                additional_factor: 0.4,
                bank_clearance_factor: 0.5,
                passing_factor: 1.2,
                under_keel_m: 0.5,
                natural_depth_m: 3.0,
                asset: AssetParams {
                    unit_rate: Decimal::new(7, 0),
                    mobilisation_perc: Decimal::new(5, 2),
                    maintenance_perc: Decimal::new(4, 2),
                    insurance_perc: Decimal::ZERO,
                    crew: Decimal::ZERO,
                    salary: Decimal::ZERO,
                    energy: Decimal::ZERO,
                    fuel: Decimal::ZERO,
                    delivery_time: 2,
                    lifespan: 50,
                    capacity: 0.0,
                },
            },
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sides.is_empty() {
            return Err(ConfigError::NonPositive("barge.sides".into()));
        }
        check_positive("barge.vessel.capacity", self.vessel.capacity)?;
        check_fraction("barge.utilisation", self.utilisation)?;
        check_non_negative("barge.distance_km", self.distance_km)?;
        check_positive("barge.speed_kmh", self.speed_kmh)?;
        check_non_negative("barge.turnaround_hours", self.turnaround_hours)?;
        if self.max_cranes_per_berth == 0 {
            return Err(ConfigError::NonPositive("barge.max_cranes_per_berth".into()));
        }
        check_positive("barge.quay_length_m", self.quay_length_m)?;
        check_fraction("barge.crane_utilisation", self.crane_utilisation)?;
        check_fraction("barge.crane_efficiency", self.crane_efficiency)?;
        check_non_negative(
            "barge.crane_productivity_moves_per_hour",
            self.crane_productivity_moves_per_hour,
        )?;
        self.vessel.validate("barge.vessel")?;
        self.berth.validate("barge.berth")?;
        self.quay.validate("barge.quay")?;
        self.crane.validate("barge.crane")?;
        self.channel.asset.validate("barge.channel")?;
        check_positive("barge.channel.length_m", self.channel.length_m)?;
        check_positive("barge.channel.design_beam_m", self.channel.design_beam_m)
    }
}

/// Land creation works for offshore layouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiteWorksParams {
    /// Terminal depth behind the quay line.
    pub terminal_depth_m: f64,
    /// Fill height above the seabed.
    pub fill_height_m: f64,
    /// `unit_rate` is per m³ of fill.
    pub reclamation: AssetParams,
    /// `unit_rate` is per metre of revetment.
    pub revetment: AssetParams,
    /// Zero disables the breakwater.
    pub breakwater_length_m: f64,
    /// `unit_rate` is per metre of breakwater.
    pub breakwater: AssetParams,
}

impl SiteWorksParams {
    /// Reference island terminal on 20 m of water.
    pub fn reference() -> Self {
        let earthwork = |rate: i64, delivery_time: u32| AssetParams {
            unit_rate: Decimal::new(rate, 0),
            mobilisation_perc: Decimal::new(5, 2),
            maintenance_perc: Decimal::new(5, 3),
            insurance_perc: Decimal::ZERO,
            crew: Decimal::ZERO,
            salary: Decimal::ZERO,
            energy: Decimal::ZERO,
            fuel: Decimal::ZERO,
            delivery_time,
            lifespan: 50,
            capacity: 0.0,
        };
        Self {
            terminal_depth_m: 500.0,
            fill_height_m: 25.0,
            reclamation: earthwork(12, 2),
            revetment: earthwork(60_000, 2),
            breakwater_length_m: 2_000.0,
            breakwater: earthwork(250_000, 3),
        }
    }
}

/// Discount rate specification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Discounting {
    /// Real weighted average cost of capital.
    Wacc { real_rate: f64 },
    /// Nominal interest deflated by inflation.
    Nominal { interest: f64, inflation: f64 },
}

/// Complete configuration of a planning run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub horizon: Horizon,
    pub planner: PlannerParams,
    pub operations: OperationsParams,
    pub triggers: Triggers,
    pub vessels: Vec<VesselClass>,
    pub quay: QuayParams,
    pub crane: CraneParams,
    pub horizontal_transport: RatioParams,
    pub stacks: StacksParams,
    pub stack_equipment: StackEquipmentParams,
    pub gate: GateParams,
    pub empty_handler: EmptyHandlerParams,
    pub general_services: GeneralServicesParams,
    pub barge: Option<BargeParams>,
    pub site: Option<SiteWorksParams>,
    pub discounting: Discounting,
    /// Handling fee booked as revenue per TEU of demand.
    pub revenue_per_teu: Decimal,
}

fn params(
    unit_rate: i64,
    maintenance_perc: Decimal,
    crew: Decimal,
    energy: i64,
    fuel: i64,
    delivery_time: u32,
    lifespan: u32,
    capacity: f64,
) -> AssetParams {
    AssetParams {
        unit_rate: Decimal::new(unit_rate, 0),
        mobilisation_perc: Decimal::new(15, 2),
        maintenance_perc,
        insurance_perc: Decimal::new(1, 2),
        crew,
        salary: Decimal::new(56_000, 0),
        energy: Decimal::new(energy, 0),
        fuel: Decimal::new(fuel, 0),
        delivery_time,
        lifespan,
        capacity,
    }
}

impl Default for TerminalConfig {
    fn default() -> Self {
        let vessel = |name: &str, call: f64, loa: f64, draft: f64, beam: f64, cranes: u32| {
            VesselClass {
                name: name.to_string(),
                call_size_teu: call,
                loa_m: loa,
                draft_m: draft,
                beam_m: beam,
                max_cranes: cranes,
                mooring_hours: 3.0,
                all_turn_time_hours: 48.0,
                demurrage_rate_per_day: Decimal::new(6_000 * cranes as i64, 0),
                ocean_transport_cost_per_call: Decimal::ZERO,
            }
        };
        Self {
            horizon: Horizon {
                start_year: 2025,
                years: 20,
            },
            planner: PlannerParams::default(),
            operations: OperationsParams::default(),
            triggers: Triggers::default(),
            vessels: vec![
                vessel("feeder", 800.0, 150.0, 9.5, 23.0, 2),
                vessel("panamax", 1_600.0, 294.0, 12.0, 32.3, 4),
                vessel("new_panamax", 3_000.0, 366.0, 15.2, 49.0, 6),
            ],
            quay: QuayParams {
                berthing_gap_m: 15.0,
                tidal_range_m: 1.8,
                max_sinkage_m: 0.5,
                wave_motion_m: 0.5,
                safety_margin_m: 0.5,
                freeboard_m: 4.0,
                gijt_constant: 757.20,
                gijt_coefficient: 1.2878,
                quay_wall: AssetParams {
                    unit_rate: Decimal::ZERO,
                    mobilisation_perc: Decimal::new(1, 1),
                    maintenance_perc: Decimal::new(1, 2),
                    insurance_perc: Decimal::new(1, 2),
                    crew: Decimal::ZERO,
                    salary: Decimal::ZERO,
                    energy: Decimal::ZERO,
                    fuel: Decimal::ZERO,
                    delivery_time: 2,
                    lifespan: 50,
                    capacity: 0.0,
                },
                berth: AssetParams {
                    unit_rate: Decimal::ZERO,
                    mobilisation_perc: Decimal::ZERO,
                    maintenance_perc: Decimal::ZERO,
                    insurance_perc: Decimal::ZERO,
                    crew: Decimal::ZERO,
                    salary: Decimal::ZERO,
                    energy: Decimal::ZERO,
                    fuel: Decimal::ZERO,
                    delivery_time: 1,
                    lifespan: 50,
                    capacity: 0.0,
                },
            },
            crane: CraneParams {
                lifting_capacity: 2.13,
                hourly_cycles: 25.0,
                efficiency: 0.8,
                operational_factor: 0.7,
                asset: params(
                    10_000_000,
                    Decimal::new(2, 2),
                    Decimal::new(165, 1),
                    120_000,
                    0,
                    1,
                    40,
                    0.0,
                ),
            },
            horizontal_transport: RatioParams {
                per_crane: 5.0,
                asset: params(
                    85_000,
                    Decimal::new(10, 2),
                    Decimal::new(3, 0),
                    0,
                    18_000,
                    0,
                    10,
                    1.0,
                ),
            },
            stacks: StacksParams {
                laden: StackParams {
                    height: 5.0,
                    ground_slots_per_unit: 210.0,
                    dwell_days: 5.0,
                    occupancy: 0.8,
                    asset: params(1_400_000, Decimal::new(1, 2), Decimal::ZERO, 0, 0, 1, 40, 0.0),
                },
                reefer_dwell_days: 5.0,
                empty: StackParams {
                    height: 6.0,
                    ground_slots_per_unit: 150.0,
                    dwell_days: 10.0,
                    occupancy: 0.7,
                    asset: params(700_000, Decimal::new(1, 2), Decimal::ZERO, 0, 0, 1, 40, 0.0),
                },
                oog: StackParams {
                    height: 1.0,
                    ground_slots_per_unit: 100.0,
                    dwell_days: 5.0,
                    occupancy: 0.7,
                    asset: params(450_000, Decimal::new(1, 2), Decimal::ZERO, 0, 0, 1, 40, 0.0),
                },
            },
            stack_equipment: StackEquipmentParams {
                basis: EquipmentBasis::PerStack(1.0),
                asset: params(
                    1_400_000,
                    Decimal::new(10, 2),
                    Decimal::new(3, 0),
                    0,
                    60_000,
                    1,
                    10,
                    1.0,
                ),
            },
            gate: GateParams {
                entry_minutes: 2.0,
                exit_minutes: 1.0,
                asset: params(60_000, Decimal::new(2, 2), Decimal::new(2, 0), 5_000, 0, 1, 15, 1.0),
            },
            empty_handler: EmptyHandlerParams {
                capacity_teu_per_year: 60_000.0,
                asset: params(
                    500_000,
                    Decimal::new(5, 2),
                    Decimal::new(3, 0),
                    0,
                    30_000,
                    1,
                    15,
                    1.0,
                ),
            },
            general_services: GeneralServicesParams {
                cranes_per_unit: 10,
                asset: params(
                    1_500_000,
                    Decimal::new(1, 2),
                    Decimal::new(25, 0),
                    50_000,
                    0,
                    1,
                    40,
                    1.0,
                ),
            },
            barge: None,
            site: None,
            discounting: Discounting::Nominal {
                interest: 0.08,
                inflation: 0.02,
            },
            revenue_per_teu: Decimal::ZERO,
        }
    }
}

impl TerminalConfig {
    /// Look up a vessel class by name.
    pub fn vessel(&self, name: &str) -> Option<&VesselClass> {
        self.vessels.iter().find(|v| v.name == name)
    }

    /// Validate thresholds, geometry, and cost tables once, before planning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon.years == 0 {
            return Err(ConfigError::NonPositive("horizon.years".into()));
        }
        if self.planner.max_iterations_per_trigger == 0 {
            return Err(ConfigError::NonPositive(
                "planner.max_iterations_per_trigger".into(),
            ));
        }
        if self.planner.first_year_online_offset < 0 {
            return Err(ConfigError::Negative(
                "planner.first_year_online_offset".into(),
            ));
        }
        let ops = &self.operations;
        check_positive("operations.operational_hours", ops.operational_hours)?;
        check_positive("operations.operational_days", ops.operational_days)?;
        check_positive("operations.peak_factor", ops.peak_factor)?;
        check_positive("operations.teu_factor", ops.teu_factor)?;

        let t = &self.triggers;
        check_fraction("triggers.allowable_berth_occupancy", t.allowable_berth_occupancy)?;
        check_positive("triggers.allowable_gate_occupancy", t.allowable_gate_occupancy)?;
        check_positive(
            "triggers.allowable_barge_berth_occupancy",
            t.allowable_barge_berth_occupancy,
        )?;
        if let BerthTrigger::WaitingTime {
            allowable_waiting_factor,
        } = t.berth
        {
            check_non_negative("triggers.allowable_waiting_factor", allowable_waiting_factor)?;
        }

        if self.vessels.is_empty() {
            return Err(ConfigError::NonPositive("vessels".into()));
        }
        let mut names = BTreeSet::new();
        for v in &self.vessels {
            if v.name.trim().is_empty() || !names.insert(v.name.as_str()) {
                return Err(ConfigError::UnknownVesselClass(v.name.clone()));
            }
            check_positive(&format!("{}.call_size_teu", v.name), v.call_size_teu)?;
            check_positive(&format!("{}.loa_m", v.name), v.loa_m)?;
            check_non_negative(&format!("{}.draft_m", v.name), v.draft_m)?;
            check_non_negative(&format!("{}.mooring_hours", v.name), v.mooring_hours)?;
            if v.max_cranes == 0 {
                return Err(ConfigError::NonPositive(format!("{}.max_cranes", v.name)));
            }
            if v.demurrage_rate_per_day < Decimal::ZERO {
                return Err(ConfigError::Negative(format!(
                    "{}.demurrage_rate_per_day",
                    v.name
                )));
            }
        }

        check_non_negative("quay.berthing_gap_m", self.quay.berthing_gap_m)?;
        check_positive("quay.gijt_constant", self.quay.gijt_constant)?;
        self.quay.quay_wall.validate("quay.quay_wall")?;
        self.quay.berth.validate("quay.berth")?;

        check_non_negative("crane.effective_capacity", self.crane.effective_capacity())?;
        self.crane.asset.validate("crane")?;
        check_non_negative("horizontal_transport.per_crane", self.horizontal_transport.per_crane)?;
        self.horizontal_transport.asset.validate("horizontal_transport")?;

        self.stacks.laden.validate("stacks.laden")?;
        self.stacks.empty.validate("stacks.empty")?;
        self.stacks.oog.validate("stacks.oog")?;
        check_non_negative("stacks.reefer_dwell_days", self.stacks.reefer_dwell_days)?;

        match self.stack_equipment.basis {
            EquipmentBasis::PerStack(r) | EquipmentBasis::PerCrane(r) => {
                check_non_negative("stack_equipment.basis", r)?
            }
        }
        self.stack_equipment.asset.validate("stack_equipment")?;

        check_non_negative("gate.entry_minutes", self.gate.entry_minutes)?;
        check_non_negative("gate.exit_minutes", self.gate.exit_minutes)?;
        self.gate.asset.validate("gate")?;
        check_positive(
            "empty_handler.capacity_teu_per_year",
            self.empty_handler.capacity_teu_per_year,
        )?;
        self.empty_handler.asset.validate("empty_handler")?;
        if self.general_services.cranes_per_unit == 0 {
            return Err(ConfigError::NonPositive(
                "general_services.cranes_per_unit".into(),
            ));
        }
        self.general_services.asset.validate("general_services")?;

        if let Some(barge) = &self.barge {
            barge.validate()?;
        }
        if let Some(site) = &self.site {
            check_non_negative("site.terminal_depth_m", site.terminal_depth_m)?;
            check_non_negative("site.fill_height_m", site.fill_height_m)?;
            check_non_negative("site.breakwater_length_m", site.breakwater_length_m)?;
            site.reclamation.validate("site.reclamation")?;
            site.revetment.validate("site.revetment")?;
            site.breakwater.validate("site.breakwater")?;
        }

        match self.discounting {
            Discounting::Wacc { real_rate } => {
                if !real_rate.is_finite() || real_rate <= -1.0 {
                    return Err(ConfigError::NonFinite("discounting.real_rate".into()));
                }
            }
            Discounting::Nominal {
                interest,
                inflation,
            } => {
                if !(interest.is_finite() && inflation.is_finite()) || inflation <= -1.0 {
                    return Err(ConfigError::NonFinite("discounting".into()));
                }
            }
        }
        if self.revenue_per_teu < Decimal::ZERO {
            return Err(ConfigError::Negative("revenue_per_teu".into()));
        }
        Ok(())
    }
}
