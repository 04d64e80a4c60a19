//! Expiration P/L curves for the stock and option legs.
//!
//! Sweeps the underlying over [spot * (1 - PRICE_BAND), spot * (1 + PRICE_BAND)]
//! and evaluates both legs at expiration using intrinsic value only (no model
//! price). Fully materialized: callers need the whole curve for axis scaling
//! and breakeven lookups.

use crate::comparison::PositionCosts;
use crate::models::OptionContract;

pub const DEFAULT_SAMPLE_COUNT: usize = 51;
/// Half-width of the price band as a fraction of spot
pub const PRICE_BAND: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PayoffCurvePoint {
    pub price: f64,
    pub stock_pnl: f64,
    pub option_pnl: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PayoffCurve {
    /// Ascending by price
    pub points: Vec<PayoffCurvePoint>,
}

impl PayoffCurve {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// (min, max) P/L across both legs, for chart axis scaling.
    /// None for an empty curve.
    pub fn pnl_bounds(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let bounds = self.points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), p| {
                (
                    lo.min(p.stock_pnl).min(p.option_pnl),
                    hi.max(p.stock_pnl).max(p.option_pnl),
                )
            },
        );
        Some(bounds)
    }

    /// Prices where the option P/L crosses zero, linearly interpolated
    /// between adjacent samples. A sample sitting exactly on zero is reported
    /// once.
    pub fn option_breakevens(&self) -> Vec<f64> {
        let mut crossings = Vec::new();
        for (i, p) in self.points.iter().enumerate() {
            if p.option_pnl == 0.0 {
                crossings.push(p.price);
                continue;
            }
            let Some(next) = self.points.get(i + 1) else {
                break;
            };
            if next.option_pnl == 0.0 {
                continue;
            }
            if p.option_pnl.signum() != next.option_pnl.signum() {
                let w = p.option_pnl / (p.option_pnl - next.option_pnl);
                crossings.push(p.price + w * (next.price - p.price));
            }
        }
        crossings
    }
}

/// Evaluate both legs at a single expiration price.
#[inline]
pub fn payoff_at(contract: &OptionContract, costs: &PositionCosts, price: f64) -> PayoffCurvePoint {
    let option_type = contract.option_type;
    let intrinsic = option_type.intrinsic(price, contract.strike);
    PayoffCurvePoint {
        price,
        stock_pnl: (price - contract.spot) * costs.shares_equivalent * option_type.phi(),
        option_pnl: intrinsic * costs.shares_equivalent - costs.option_capital,
    }
}

/// Sample `sample_count` evenly spaced prices across the band, inclusive of
/// both ends. Zero samples gives an empty curve, one sample evaluates at spot.
pub fn generate_curve(
    contract: &OptionContract,
    premium: f64,
    multiplier: f64,
    contract_count: f64,
    sample_count: usize,
) -> PayoffCurve {
    let costs = PositionCosts::new(contract.spot, premium, multiplier, contract_count);

    let points = match sample_count {
        0 => Vec::new(),
        1 => vec![payoff_at(contract, &costs, contract.spot)],
        n => {
            let lo = contract.spot * (1.0 - PRICE_BAND);
            let hi = contract.spot * (1.0 + PRICE_BAND);
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| {
                    let price = if i == n - 1 {
                        hi
                    } else {
                        lo + (hi - lo) * i as f64 / last
                    };
                    payoff_at(contract, &costs, price)
                })
                .collect()
        }
    };

    PayoffCurve { points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OptionType;

    fn call() -> OptionContract {
        OptionContract::from_days(150.0, 140.0, 45.0, 0.05, 0.30, OptionType::Call)
    }

    #[test]
    fn test_default_curve_shape() {
        let curve = generate_curve(&call(), 15.0, 100.0, 1.0, DEFAULT_SAMPLE_COUNT);
        assert_eq!(curve.len(), 51);
        assert!((curve.points[0].price - 105.0).abs() < 1e-9);
        assert!((curve.points[50].price - 195.0).abs() < 1e-9);
        assert!(curve.points.windows(2).all(|w| w[0].price < w[1].price));
        // Middle sample lands on spot
        assert!((curve.points[25].price - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_stock_flat_at_spot_option_flat_at_breakeven() {
        let c = call();
        let costs = PositionCosts::new(c.spot, 15.0, 100.0, 1.0);
        assert_eq!(payoff_at(&c, &costs, 150.0).stock_pnl, 0.0);
        assert!(payoff_at(&c, &costs, 155.0).option_pnl.abs() < 1e-9);

        let put = OptionContract { option_type: OptionType::Put, ..c };
        assert_eq!(payoff_at(&put, &costs, 150.0).stock_pnl, 0.0);
        assert!(payoff_at(&put, &costs, 125.0).option_pnl.abs() < 1e-9);
    }

    #[test]
    fn test_option_loss_capped_at_premium() {
        let curve = generate_curve(&call(), 15.0, 100.0, 1.0, 101);
        for p in &curve.points {
            assert!(p.option_pnl >= -1_500.0, "loss exceeds premium at {}: {}", p.price, p.option_pnl);
        }
        let (lo, hi) = curve.pnl_bounds().expect("non-empty");
        assert!((lo + 4_500.0).abs() < 1e-6, "min pnl={lo}");
        assert!(hi > 0.0);
    }

    #[test]
    fn test_breakeven_lookup() {
        let curve = generate_curve(&call(), 15.0, 100.0, 1.0, DEFAULT_SAMPLE_COUNT);
        let crossings = curve.option_breakevens();
        assert_eq!(crossings.len(), 1, "{crossings:?}");
        assert!((crossings[0] - 155.0).abs() < 1e-6, "breakeven={}", crossings[0]);

        let put = OptionContract::from_days(150.0, 160.0, 45.0, 0.05, 0.30, OptionType::Put);
        let crossings = generate_curve(&put, 12.0, 100.0, 1.0, 40).option_breakevens();
        assert_eq!(crossings.len(), 1);
        assert!((crossings[0] - 148.0).abs() < 1e-6, "put breakeven={}", crossings[0]);
    }

    #[test]
    fn test_put_stock_leg_mirrors_direction() {
        let put = OptionContract { option_type: OptionType::Put, ..call() };
        let curve = generate_curve(&put, 5.0, 100.0, 1.0, 3);
        assert!((curve.points[0].stock_pnl - 4_500.0).abs() < 1e-6);
        assert!(curve.points[1].stock_pnl.abs() < 1e-6);
        assert!(curve.points[2].stock_pnl < 0.0);
    }

    #[test]
    fn test_degenerate_sample_counts() {
        assert!(generate_curve(&call(), 15.0, 100.0, 1.0, 0).is_empty());
        assert_eq!(generate_curve(&call(), 15.0, 100.0, 1.0, 0).pnl_bounds(), None);

        let single = generate_curve(&call(), 15.0, 100.0, 1.0, 1);
        assert_eq!(single.len(), 1);
        assert_eq!(single.points[0].price, 150.0);
        assert_eq!(single.points[0].option_pnl, -500.0);
    }

    #[test]
    fn test_regenerable() {
        let a = generate_curve(&call(), 15.0, 100.0, 2.0, 51);
        let b = generate_curve(&call(), 15.0, 100.0, 2.0, 51);
        assert_eq!(a, b);
    }
}
