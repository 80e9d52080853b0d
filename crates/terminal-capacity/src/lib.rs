#![deny(warnings)]

//! Analytical capacity models: demand projection, occupancy, and queueing delay.
//!
//! Everything here is a pure, read-only function of the registry, the
//! configuration, and one year's demand.

pub mod demand;
pub mod occupancy;
pub mod queueing;

pub use demand::{DemandProjector, YearDemand};
pub use occupancy::{
    barge_berth_check, barge_fleet_check, empty_stack_check, gate_check, laden_stack_check,
    oog_stack_check, quay_occupancy, ratio, CapacityCheck, QuayOccupancy,
};
pub use queueing::{waiting_factor, waiting_time_hours, MAX_SERVERS};
