#![deny(warnings)]

//! Core domain models and invariants for terminal capacity planning.
//!
//! This crate defines the serializable asset model, the append-only asset
//! registry, the injected terminal configuration, and the demand scenario,
//! together with the error taxonomy shared by the planning crates.

pub mod asset;
pub mod config;
pub mod registry;
pub mod scenario;

pub use asset::{
    Asset, AssetDetail, AssetId, AssetKind, BargeSide, CashflowSeries, CostLine, CostProfile,
    OpexProfile, ScheduleInfo, Subsystem,
};
pub use config::{
    AssetParams, BargeParams, BerthTrigger, ChannelParams, CraneParams, Discounting,
    EmptyHandlerParams, EquipmentBasis, GateParams, GeneralServicesParams, Horizon,
    OperationsParams, PlannerParams, QuayParams, RatioParams, SiteWorksParams, StackEquipmentParams,
    StackParams, StacksParams, TerminalConfig, Triggers, VesselClass,
};
pub use registry::{AssetRegistry, Mode};
pub use scenario::{ContainerMix, DemandScenario, DemandSplits};

use thiserror::Error;

/// Tolerance used when checking that a split group sums to one.
pub const SPLIT_TOLERANCE: f64 = 1e-6;

/// Validation errors raised once, while loading configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Percentages of a split group must each lie in [0,1] and sum to 1.
    #[error("invalid split configuration for {group}: {reason}")]
    InvalidSplitConfiguration { group: String, reason: String },
    /// A scenario refers to a vessel class the configuration does not define.
    #[error("unknown vessel class: {0}")]
    UnknownVesselClass(String),
    /// Numeric field must be finite.
    #[error("non-finite value for {0}")]
    NonFinite(String),
    /// Field must be strictly positive.
    #[error("{0} must be > 0")]
    NonPositive(String),
    /// Field must be non-negative.
    #[error("{0} must be >= 0")]
    Negative(String),
    /// Fraction must be within [0,1].
    #[error("{0} must be within [0,1]")]
    OutOfUnitRange(String),
    /// The scenario has no volumes at all.
    #[error("demand scenario is empty")]
    EmptyScenario,
}

/// Errors raised while planning a year.
///
/// Any of these aborts the yearly step and the whole run; assets appended
/// before the failure stay in the registry.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    /// Demand lookup for a required year is absent.
    #[error("demand scenario has no volume for year {0}")]
    MissingScenarioYear(i32),
    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A trigger is still violated after the iteration budget is spent.
    #[error("{kind:?} trigger still violated in {year} after {iterations} investments")]
    CapacityTriggerUnsatisfiable {
        kind: AssetKind,
        year: i32,
        iterations: u32,
    },
    /// The queueing fit only covers 1..=7 servers.
    #[error("queueing model has no fit for {servers} servers")]
    QueueingModelOutOfRange { servers: usize },
    /// A cost-per-unit ratio has a zero denominator.
    #[error("zero denominator while computing {0}")]
    DivisionBySentinel(String),
    /// A monetary conversion produced a non-finite value.
    #[error("non-finite monetary value while computing {0}")]
    NonFinite(String),
}

/// Check that a value is finite and within [0,1].
pub(crate) fn check_fraction(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite(name.to_string()));
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfUnitRange(name.to_string()));
    }
    Ok(())
}

/// Check that a value is finite and strictly positive.
pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite(name.to_string()));
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive(name.to_string()));
    }
    Ok(())
}

/// Check that a value is finite and non-negative.
pub(crate) fn check_non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite(name.to_string()));
    }
    if value < 0.0 {
        return Err(ConfigError::Negative(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_bounds() {
        assert!(check_fraction("x", 0.0).is_ok());
        assert!(check_fraction("x", 1.0).is_ok());
        assert_eq!(
            check_fraction("x", 1.01),
            Err(ConfigError::OutOfUnitRange("x".into()))
        );
        assert_eq!(
            check_fraction("x", f64::NAN),
            Err(ConfigError::NonFinite("x".into()))
        );
    }

    #[test]
    fn positive_and_non_negative() {
        assert!(check_positive("h", 1.0).is_ok());
        assert!(check_positive("h", 0.0).is_err());
        assert!(check_non_negative("h", 0.0).is_ok());
        assert_eq!(
            check_non_negative("h", -1.0),
            Err(ConfigError::Negative("h".into()))
        );
    }

    #[test]
    fn config_error_lifts_into_plan_error() {
        let e: PlanError = ConfigError::EmptyScenario.into();
        assert_eq!(e, PlanError::Config(ConfigError::EmptyScenario));
        assert_eq!(e.to_string(), "demand scenario is empty");
    }
}
