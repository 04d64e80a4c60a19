pub mod rules;

use crate::models::black_scholes::{self, Greeks};
use crate::models::OptionContract;
use rules::{Reasons, Recommendation, Signals};

/// Capital figures shared by the comparison and the payoff curve.
/// Stack-allocated, Copy.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PositionCosts {
    /// Shares controlled by the option position
    pub shares_equivalent: f64,
    /// Cost of buying `shares_equivalent` shares outright
    pub stock_capital: f64,
    /// Premium paid for the option position
    pub option_capital: f64,
}

impl PositionCosts {
    #[inline]
    pub fn new(spot: f64, premium: f64, multiplier: f64, contract_count: f64) -> Self {
        let shares_equivalent = multiplier * contract_count;
        Self {
            shares_equivalent,
            stock_capital: spot * shares_equivalent,
            option_capital: premium * contract_count * multiplier,
        }
    }

    /// stock capital / option capital. Unguarded: zero option capital gives
    /// inf or NaN.
    #[inline]
    pub fn leverage(&self) -> f64 {
        self.stock_capital / self.option_capital
    }
}

/// Stock vs option side by side for one set of inputs.
///
/// Rebuilt from scratch on every input change. ROI and leverage are passed
/// through unguarded, so zero contracts or a zero premium shows up here as
/// inf/NaN.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PositionComparison {
    pub shares_equivalent: f64,
    pub stock_capital: f64,
    pub option_capital: f64,
    pub intrinsic_value: f64,
    pub time_value: f64,
    pub breakeven: f64,
    pub leverage: f64,
    pub stock_max_loss: f64,
    pub option_max_loss: f64,
    pub target_price: f64,
    pub stock_profit: f64,
    pub stock_roi_pct: f64,
    pub option_profit: f64,
    pub option_roi_pct: f64,
    pub greeks: Greeks,
    pub theoretical_price: f64,
    pub recommendation: Recommendation,
    pub reasons: Reasons,
}

impl PositionComparison {
    /// True when every figure is finite, i.e. safe to format without
    /// special-casing.
    pub fn is_well_defined(&self) -> bool {
        [
            self.leverage,
            self.stock_roi_pct,
            self.option_roi_pct,
            self.stock_profit,
            self.option_profit,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Compare buying `contract_count` options at `premium` against buying the
/// equivalent shares, evaluated at `target_price` on expiration.
///
/// Pure function: same inputs always produce the same output.
pub fn compare(
    contract: &OptionContract,
    premium: f64,
    multiplier: f64,
    contract_count: f64,
    target_price: f64,
) -> PositionComparison {
    let costs = PositionCosts::new(contract.spot, premium, multiplier, contract_count);
    let phi = contract.option_type.phi();

    let intrinsic_value = contract.intrinsic();
    let time_value = premium - intrinsic_value;
    let breakeven = contract.strike + phi * premium;
    let leverage = costs.leverage();

    // Stock leg mirrors the option's direction
    let stock_profit = (target_price - contract.spot) * costs.shares_equivalent * phi;
    let option_profit = contract.option_type.intrinsic(target_price, contract.strike)
        * costs.shares_equivalent
        - costs.option_capital;

    let stock_roi_pct = stock_profit / costs.stock_capital * 100.0;
    let option_roi_pct = option_profit / costs.option_capital * 100.0;

    let greeks = black_scholes::greeks(contract);

    let signals = Signals {
        time_to_expiry_years: contract.time_to_expiry_years,
        is_itm: contract.is_itm(),
        premium,
        intrinsic_value,
        time_value,
        leverage,
        delta: greeks.delta,
        stock_roi_pct,
        option_roi_pct,
        volatility: contract.volatility,
    };
    let (recommendation, reasons) = rules::recommend(&signals);

    PositionComparison {
        shares_equivalent: costs.shares_equivalent,
        stock_capital: costs.stock_capital,
        option_capital: costs.option_capital,
        intrinsic_value,
        time_value,
        breakeven,
        leverage,
        stock_max_loss: costs.stock_capital,
        option_max_loss: costs.option_capital,
        target_price,
        stock_profit,
        stock_roi_pct,
        option_profit,
        option_roi_pct,
        greeks,
        theoretical_price: black_scholes::theoretical_price(contract),
        recommendation,
        reasons,
    }
}
