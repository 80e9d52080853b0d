#![deny(warnings)]

//! Economic models for terminal investment planning.
//!
//! This crate provides validated utilities for:
//! - Pricing an asset's capex and opex from its cost table
//! - Spreading one-time capex and recurring opex over the planning horizon
//! - Aggregating per-asset cashflows into a year × category table and NPV

pub mod cashflow;
pub mod npv;
pub mod pricing;

pub use cashflow::{capex_split, schedule, CapexSplit};
pub use npv::{cost_per_teu, discount_factor, npv, real_rate, CashflowTable, TableCell, TableColumn};
pub use pricing::{gijt_unit_rate, price, unit_price};

use terminal_core::PlanError;
use thiserror::Error;

/// Errors produced by economic helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Quantities must be finite and non-negative.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(f64),
    /// Numeric conversion to or from floating point failed.
    #[error("non-finite numeric conversion in {0}")]
    NonFinite(&'static str),
    /// A cost-per-unit ratio has a zero denominator.
    #[error("zero denominator in {0}")]
    DivisionBySentinel(&'static str),
}

impl From<EconError> for PlanError {
    fn from(e: EconError) -> Self {
        match e {
            EconError::DivisionBySentinel(what) => PlanError::DivisionBySentinel(what.to_string()),
            EconError::NonFinite(what) => PlanError::NonFinite(what.to_string()),
            EconError::InvalidQuantity(q) => PlanError::NonFinite(format!("quantity {q}")),
        }
    }
}
