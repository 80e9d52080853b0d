//! E2/E2/n waiting-time factor.
//!
//! The factor is a dimensionless multiple of the mean service time, expressed
//! as a fourth-order polynomial in the berth occupancy ρ per number of servers.
//! The coefficient table was fitted on ρ ∈ [0, 0.9] against the Allen–Cunneen
//! approximation with Erlang-2 arrivals and service (`(ca² + cs²) / 2 = 0.5`).

use terminal_core::PlanError;

/// Largest server count covered by the fit.
pub const MAX_SERVERS: usize = 7;

/// `c0..c4` for n = 1..=7.
const COEFFICIENTS: [[f64; 5]; MAX_SERVERS] = [
    [0.0, -1.8659, 20.3334, -47.7511, 36.8097],
    [0.0, -1.1808, 10.3922, -24.0252, 18.4524],
    [0.0, -0.7963, 6.7037, -15.7296, 12.1813],
    [0.0, -0.5891, 4.9099, -11.7104, 9.1183],
    [0.0, -0.4663, 3.8874, -9.3918, 7.3257],
    [0.0, -0.3871, 3.2376, -7.8928, 6.1504],
    [0.0, -0.3324, 2.7903, -6.8421, 5.3174],
];

/// Waiting factor for occupancy `rho` and `servers` berths.
///
/// No servers or a saturated quay (ρ ≥ 1) wait forever. More than
/// [`MAX_SERVERS`] berths is outside the fitted range. Negative polynomial
/// values near ρ = 0 are clamped to zero.
///
/// Example: `waiting_factor(0.5, 1)` is about 0.48.
pub fn waiting_factor(rho: f64, servers: usize) -> Result<f64, PlanError> {
    if rho.is_nan() {
        return Err(PlanError::NonFinite("berth occupancy".into()));
    }
    if servers == 0 || rho >= 1.0 {
        return Ok(f64::INFINITY);
    }
    let c = COEFFICIENTS
        .get(servers - 1)
        .ok_or(PlanError::QueueingModelOutOfRange { servers })?;
    let rho = rho.max(0.0);
    // Horner
    let factor = c.iter().rev().fold(0.0, |acc, k| acc * rho + k);
    Ok(factor.max(0.0))
}

/// Mean waiting time per call in hours.
///
/// The mean service time per call is the crane-occupied time divided by the
/// number of calls.
pub fn waiting_time_hours(factor: f64, crane_occupancy: f64, operational_hours: f64, calls: u32) -> f64 {
    if calls == 0 {
        return 0.0;
    }
    factor * crane_occupancy * operational_hours / calls as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_server_reference_points() {
        let at = |rho| waiting_factor(rho, 1).unwrap();
        assert!((at(0.5) - 0.48).abs() < 0.05);
        assert!((at(0.7) - 1.12).abs() < 0.1);
        assert!((at(0.9) - 4.13).abs() < 0.2);
    }

    #[test]
    fn empty_quay_does_not_wait() {
        for n in 1..=MAX_SERVERS {
            assert_eq!(waiting_factor(0.0, n).unwrap(), 0.0);
            assert_eq!(waiting_factor(-0.3, n).unwrap(), 0.0);
        }
    }

    #[test]
    fn saturation_and_range() {
        assert_eq!(waiting_factor(1.0, 3).unwrap(), f64::INFINITY);
        assert_eq!(waiting_factor(f64::INFINITY, 3).unwrap(), f64::INFINITY);
        assert_eq!(waiting_factor(0.5, 0).unwrap(), f64::INFINITY);
        assert_eq!(
            waiting_factor(0.5, 8),
            Err(PlanError::QueueingModelOutOfRange { servers: 8 })
        );
        assert!(waiting_factor(f64::NAN, 2).is_err());
    }

    #[test]
    fn more_servers_wait_less() {
        for n in 1..MAX_SERVERS {
            let a = waiting_factor(0.7, n).unwrap();
            let b = waiting_factor(0.7, n + 1).unwrap();
            assert!(b < a, "n={n}: {b} !< {a}");
        }
    }

    #[test]
    fn waiting_hours_scale_with_service_time() {
        assert_eq!(waiting_time_hours(2.0, 0.5, 8_000.0, 0), 0.0);
        // 4000 crane hours over 100 calls = 40 h service, factor 0.5
        assert!((waiting_time_hours(0.5, 0.5, 8_000.0, 100) - 20.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn factor_is_finite_and_non_negative_below_saturation(rho in 0.0f64..0.99, n in 1usize..=MAX_SERVERS) {
            let f = waiting_factor(rho, n).unwrap();
            prop_assert!(f.is_finite());
            prop_assert!(f >= 0.0);
        }

        #[test]
        fn factor_grows_with_occupancy_in_the_fitted_range(a in 0.55f64..0.9, d in 0.01f64..0.1, n in 1usize..=MAX_SERVERS) {
            let b = (a + d).min(0.9);
            prop_assume!(b > a + 1e-3);
            prop_assert!(waiting_factor(b, n).unwrap() >= waiting_factor(a, n).unwrap());
        }
    }
}
