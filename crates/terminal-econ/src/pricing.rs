//! Capex and opex of a single asset from its cost table.

use crate::EconError;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use terminal_core::{AssetParams, CostProfile, OpexProfile, QuayParams};

/// Price `quantity` units at `unit_rate`.
///
/// capex = rate × quantity × (1 + mobilisation); maintenance and insurance
/// are percentages of rate × quantity; labour is crew × salary; energy and
/// fuel are taken per unit as configured.
///
/// Example:
/// let p = price(&params, Decimal::new(100, 0), 2.0)?;
/// assert_eq!(p.capex, Decimal::new(230, 0)); // with 15% mobilisation
pub fn price(
    params: &AssetParams,
    unit_rate: Decimal,
    quantity: f64,
) -> Result<CostProfile, EconError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(EconError::InvalidQuantity(quantity));
    }
    let q = Decimal::from_f64(quantity).ok_or(EconError::NonFinite("quantity"))?;
    let base = unit_rate * q;
    Ok(CostProfile {
        capex: (base * (Decimal::ONE + params.mobilisation_perc)).round_dp(2),
        opex: OpexProfile {
            maintenance: (base * params.maintenance_perc).round_dp(2),
            insurance: (base * params.insurance_perc).round_dp(2),
            energy: params.energy,
            fuel: params.fuel,
            labour: (params.crew * params.salary).round_dp(2),
        },
    })
}

/// Price one unit at the table's own rate.
pub fn unit_price(params: &AssetParams) -> Result<CostProfile, EconError> {
    price(params, params.unit_rate, 1.0)
}

/// Quay wall cost per metre for a retaining height set by `depth_m`.
pub fn gijt_unit_rate(quay: &QuayParams, depth_m: f64) -> Result<Decimal, EconError> {
    let height = 2.0 * depth_m + quay.freeboard_m;
    if !(height.is_finite() && height >= 0.0) {
        return Err(EconError::InvalidQuantity(height));
    }
    let rate = quay.gijt_constant * height.powf(quay.gijt_coefficient);
    Decimal::from_f64(rate)
        .map(|r| r.round_dp(2))
        .ok_or(EconError::NonFinite("quay unit rate"))
}
