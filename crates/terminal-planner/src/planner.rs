//! Planner state machine and the shared investment-loop contract.

use crate::handlers::Investment;
use crate::report::YearReport;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use terminal_capacity::{DemandProjector, YearDemand};
use terminal_core::{
    Asset, AssetDetail, AssetId, AssetKind, AssetParams, AssetRegistry, DemandScenario,
    Discounting, Horizon, PlanError, ScheduleInfo, TerminalConfig,
};
use terminal_econ::{cost_per_teu, npv, price, schedule, CashflowTable, TableColumn};
use tracing::{debug, info};

/// Purchase order for one asset.
#[derive(Clone, Debug)]
pub struct Order<'p> {
    pub kind: AssetKind,
    pub params: &'p AssetParams,
    pub unit_rate: Decimal,
    pub quantity: f64,
    pub capacity: f64,
    pub detail: AssetDetail,
    /// Online year of the asset this one depends on.
    pub not_before: Option<i32>,
}

impl<'p> Order<'p> {
    /// One unit at the table's own rate and capacity.
    pub fn unit(kind: AssetKind, params: &'p AssetParams) -> Self {
        Self {
            kind,
            params,
            unit_rate: params.unit_rate,
            quantity: 1.0,
            capacity: params.capacity,
            detail: AssetDetail::None,
            not_before: None,
        }
    }

    /// `quantity` units at `unit_rate` (metres of quay, m³ of fill ...).
    pub fn priced(mut self, unit_rate: Decimal, quantity: f64) -> Self {
        self.unit_rate = unit_rate;
        self.quantity = quantity;
        self
    }

    pub fn capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn detail(mut self, detail: AssetDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn after(mut self, not_before: Option<i32>) -> Self {
        self.not_before = not_before;
        self
    }
}

/// Everything an investment handler sees while planning one year.
pub struct YearContext<'a> {
    pub config: &'a TerminalConfig,
    pub demand: &'a YearDemand,
    pub year: i32,
    registry: &'a mut AssetRegistry,
    added: Vec<AssetId>,
}

impl<'a> YearContext<'a> {
    pub fn new(
        config: &'a TerminalConfig,
        demand: &'a YearDemand,
        registry: &'a mut AssetRegistry,
    ) -> Self {
        Self {
            config,
            demand,
            year: demand.year,
            registry,
            added: Vec::new(),
        }
    }

    pub fn registry(&self) -> &AssetRegistry {
        &*self.registry
    }

    /// Assets appended so far this year.
    pub fn added(&self) -> &[AssetId] {
        &self.added
    }

    /// Extra online delay for assets bought in the first simulated year.
    pub fn online_offset(&self) -> i32 {
        if self.year == self.config.horizon.start_year {
            self.config.planner.first_year_online_offset
        } else {
            0
        }
    }

    /// Price, schedule and append one asset.
    ///
    /// The online year is `year + delivery_time (+ first-year offset)`,
    /// pushed back to the dependency's online year when that is later.
    /// Cashflows are laid out before the asset enters the registry.
    pub fn commission(&mut self, order: Order<'_>) -> Result<AssetId, PlanError> {
        let cost = price(order.params, order.unit_rate, order.quantity)?;
        let info = ScheduleInfo::new(
            self.year,
            order.params.delivery_time,
            order.params.lifespan,
            self.online_offset(),
            order.not_before,
        );
        let name = format!(
            "{:?}_{:02}",
            order.kind,
            self.registry.count_planned(order.kind) + 1
        );
        let mut asset = Asset::new(order.kind, name, info, order.capacity, cost, order.detail);
        schedule(&mut asset, &self.config.horizon);
        let year_online = asset.year_online();
        let id = self.registry.push(asset);
        self.added.push(id);
        debug!(kind = ?order.kind, id = id.0, year = self.year, year_online, "asset commissioned");
        Ok(id)
    }
}

/// Bounded trigger loop shared by every handler.
///
/// Calls `invest` until `satisfied` holds and returns the number of assets
/// added. Fails with `CapacityTriggerUnsatisfiable` once
/// `planner.max_iterations_per_trigger` investments did not help; assets
/// added up to that point stay in the registry.
pub fn until_satisfied<S, I>(
    ctx: &mut YearContext<'_>,
    kind: AssetKind,
    mut satisfied: S,
    mut invest: I,
) -> Result<u32, PlanError>
where
    S: FnMut(&YearContext<'_>) -> Result<bool, PlanError>,
    I: FnMut(&mut YearContext<'_>) -> Result<(), PlanError>,
{
    let budget = ctx.config.planner.max_iterations_per_trigger;
    let mut iterations = 0;
    while !satisfied(ctx)? {
        if iterations >= budget {
            return Err(PlanError::CapacityTriggerUnsatisfiable {
                kind,
                year: ctx.year,
                iterations,
            });
        }
        invest(ctx)?;
        iterations += 1;
    }
    Ok(iterations)
}

/// Owns the registry for the length of a run.
#[derive(Debug)]
pub struct InvestmentPlanner<'a> {
    config: &'a TerminalConfig,
    projector: DemandProjector<'a>,
    registry: AssetRegistry,
    reports: Vec<YearReport>,
}

impl<'a> InvestmentPlanner<'a> {
    /// Validates the configuration and the scenario's vessel mix once.
    pub fn new(config: &'a TerminalConfig, scenario: &'a DemandScenario) -> Result<Self, PlanError> {
        config.validate()?;
        let projector = DemandProjector::new(scenario, &config.vessels)?;
        Ok(Self {
            config,
            projector,
            registry: AssetRegistry::new(),
            reports: Vec::new(),
        })
    }

    /// Start from an existing terminal instead of a greenfield site.
    pub fn with_registry(mut self, registry: AssetRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn reports(&self) -> &[YearReport] {
        &self.reports
    }

    /// Plan one year: project demand, run every handler in order, report.
    ///
    /// A missing scenario row fails before anything is added.
    pub fn step_year(&mut self, year: i32) -> Result<(), PlanError> {
        let demand = self.projector.project(year)?;
        let mut ctx = YearContext::new(self.config, &demand, &mut self.registry);
        for investment in Investment::ORDER {
            investment.run(&mut ctx)?;
        }
        let added = ctx.added;
        let report = YearReport::build(&self.registry, &demand, self.config, added)?;
        info!(
            year,
            teu = demand.total_teu,
            calls = demand.total_calls(),
            added = report.added.len(),
            assets = self.registry.len(),
            "year planned"
        );
        self.reports.push(report);
        Ok(())
    }

    /// Plan every year of the horizon.
    pub fn run(mut self) -> Result<PlanOutcome, PlanError> {
        for year in self.config.horizon.iter() {
            self.step_year(year)?;
        }
        Ok(PlanOutcome {
            horizon: self.config.horizon.clone(),
            registry: self.registry,
            reports: self.reports,
        })
    }
}

/// Result of a complete run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub horizon: Horizon,
    pub registry: AssetRegistry,
    pub reports: Vec<YearReport>,
}

impl PlanOutcome {
    /// Asset cashflows plus the demurrage, ocean transport and revenue of each year.
    pub fn cashflow_table(&self) -> CashflowTable {
        let mut table = CashflowTable::aggregate(&self.registry);
        for r in &self.reports {
            table.add(r.year, TableColumn::Demurrage, r.demurrage);
            table.add(r.year, TableColumn::OceanTransport, r.ocean_transport);
            table.add(r.year, TableColumn::Revenue, r.revenue);
        }
        table
    }

    /// NPV at the first year of the horizon.
    pub fn npv(&self, discounting: &Discounting) -> Result<Decimal, PlanError> {
        Ok(npv(&self.cashflow_table(), discounting, self.horizon.start_year)?)
    }

    /// Demand handled per year.
    pub fn throughput(&self) -> BTreeMap<i32, f64> {
        self.reports
            .iter()
            .map(|r| (r.year, r.demand.total_teu))
            .collect()
    }

    pub fn cost_per_teu(&self, discounting: &Discounting) -> Result<Decimal, PlanError> {
        Ok(cost_per_teu(
            &self.cashflow_table(),
            &self.throughput(),
            discounting,
            self.horizon.start_year,
        )?)
    }

    /// Undiscounted capex over the whole run.
    pub fn total_capex(&self) -> Decimal {
        self.registry.iter().map(|(_, a)| a.cost.capex).sum()
    }

    /// Total TEU as a decimal, for KPI reporting.
    pub fn total_teu(&self) -> Option<Decimal> {
        Decimal::from_f64(self.throughput().values().sum())
    }
}
