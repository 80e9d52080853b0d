#![deny(warnings)]

//! Year-by-year capacity investment loop.
//!
//! For every simulated year the planner projects demand, then runs the
//! investment handlers in a fixed dependency order. Each handler adds one
//! asset at a time until its trigger is satisfied or its iteration budget is
//! spent. The resulting registry, the yearly reports and the aggregated
//! cashflow table form the [`PlanOutcome`].

pub mod handlers;
pub mod planner;
pub mod report;

pub use handlers::Investment;
pub use planner::{until_satisfied, InvestmentPlanner, Order, PlanOutcome, YearContext};
pub use report::{Load, YearReport};
