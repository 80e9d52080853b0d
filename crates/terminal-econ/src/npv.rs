//! Year × category cashflow table and discounting.

use crate::EconError;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use terminal_core::{AssetRegistry, CostLine, Discounting, Subsystem};

/// Column of the cashflow table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TableColumn {
    Capex(Subsystem),
    Opex(Subsystem),
    Demurrage,
    OceanTransport,
    Revenue,
}

impl TableColumn {
    /// Revenue is the only inflow; every other column is a cost.
    pub fn is_inflow(self) -> bool {
        matches!(self, TableColumn::Revenue)
    }
}

/// One non-zero cell, the serialized form of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    pub year: i32,
    pub column: TableColumn,
    pub amount: Decimal,
}

/// Cost magnitudes (positive) and revenue per year and column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TableCell>", into = "Vec<TableCell>")]
pub struct CashflowTable {
    rows: BTreeMap<i32, BTreeMap<TableColumn, Decimal>>,
}

impl From<Vec<TableCell>> for CashflowTable {
    fn from(cells: Vec<TableCell>) -> Self {
        let mut t = CashflowTable::default();
        for c in cells {
            t.add(c.year, c.column, c.amount);
        }
        t
    }
}

impl From<CashflowTable> for Vec<TableCell> {
    fn from(t: CashflowTable) -> Self {
        t.cells().collect()
    }
}

impl CashflowTable {
    /// Sum every asset's series into capex/opex columns by subsystem.
    pub fn aggregate(registry: &AssetRegistry) -> Self {
        let mut t = CashflowTable::default();
        for (_, asset) in registry.iter() {
            let subsystem = asset.kind.subsystem();
            for (year, line, amount) in asset.cashflow.iter() {
                let column = match line {
                    CostLine::Capex => TableColumn::Capex(subsystem),
                    _ => TableColumn::Opex(subsystem),
                };
                t.add(year, column, amount);
            }
        }
        t
    }

    pub fn add(&mut self, year: i32, column: TableColumn, amount: Decimal) {
        if amount.is_zero() {
            return;
        }
        *self
            .rows
            .entry(year)
            .or_default()
            .entry(column)
            .or_insert(Decimal::ZERO) += amount;
    }

    pub fn cell(&self, year: i32, column: TableColumn) -> Decimal {
        self.rows
            .get(&year)
            .and_then(|r| r.get(&column))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.keys().copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = TableCell> + '_ {
        self.rows.iter().flat_map(|(year, row)| {
            row.iter().map(move |(column, amount)| TableCell {
                year: *year,
                column: *column,
                amount: *amount,
            })
        })
    }

    /// Total cost in a year, excluding revenue.
    pub fn cost(&self, year: i32) -> Decimal {
        self.rows.get(&year).map_or(Decimal::ZERO, |r| {
            r.iter()
                .filter(|(c, _)| !c.is_inflow())
                .map(|(_, a)| *a)
                .sum()
        })
    }

    /// Revenue minus cost in a year.
    pub fn net(&self, year: i32) -> Decimal {
        self.cell(year, TableColumn::Revenue) - self.cost(year)
    }

    /// Sum of one column over every year.
    pub fn column_total(&self, column: TableColumn) -> Decimal {
        self.rows.values().filter_map(|r| r.get(&column)).copied().sum()
    }
}

/// Real discount rate: the WACC as given, or `(1 + nominal) / (1 + inflation) - 1`.
pub fn real_rate(discounting: &Discounting) -> f64 {
    match *discounting {
        Discounting::Wacc { real_rate } => real_rate,
        Discounting::Nominal {
            interest,
            inflation,
        } => (1.0 + interest) / (1.0 + inflation) - 1.0,
    }
}

/// `1 / (1 + rate)^(year - base_year)`.
pub fn discount_factor(rate: f64, year: i32, base_year: i32) -> Result<Decimal, EconError> {
    let f = (1.0 + rate).powi(year - base_year);
    if !(f.is_finite() && f > 0.0) {
        return Err(EconError::NonFinite("discount factor"));
    }
    Decimal::from_f64(1.0 / f).ok_or(EconError::NonFinite("discount factor"))
}

/// Net present value at `base_year`; costs are outflows.
pub fn npv(
    table: &CashflowTable,
    discounting: &Discounting,
    base_year: i32,
) -> Result<Decimal, EconError> {
    let rate = real_rate(discounting);
    let mut total = Decimal::ZERO;
    for year in table.years() {
        total += table.net(year) * discount_factor(rate, year, base_year)?;
    }
    Ok(total.round_dp(2))
}

/// Discounted cost divided by discounted throughput.
///
/// Zero discounted throughput is a hard error rather than an infinite price.
pub fn cost_per_teu(
    table: &CashflowTable,
    throughput_teu: &BTreeMap<i32, f64>,
    discounting: &Discounting,
    base_year: i32,
) -> Result<Decimal, EconError> {
    let rate = real_rate(discounting);
    let mut cost = Decimal::ZERO;
    for year in table.years() {
        cost += table.cost(year) * discount_factor(rate, year, base_year)?;
    }
    let mut teu = Decimal::ZERO;
    for (year, volume) in throughput_teu {
        let v = Decimal::from_f64(*volume).ok_or(EconError::NonFinite("throughput"))?;
        teu += v * discount_factor(rate, *year, base_year)?;
    }
    if teu <= Decimal::ZERO {
        return Err(EconError::DivisionBySentinel("cost per TEU"));
    }
    Ok((cost / teu).round_dp(2))
}
