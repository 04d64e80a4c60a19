//! Calculator form inputs as the UI holds them (percentages, day counts),
//! and their conversion into engine units.
//!
//! Values are untrusted and may be mid-edit. Nothing here range-checks the
//! numbers; the engine's fallbacks deal with that. The only hard error is a
//! form that names no expiry at all.

use crate::comparison::{self, PositionComparison};
use crate::errors::{EngineError, EngineResult};
use crate::models::black_scholes::{self, Greeks};
use crate::models::{OptionContract, OptionType};
use crate::payoff::{self, PayoffCurve};
use chrono::NaiveDate;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CalculatorInputs {
    pub spot: f64,
    pub strike: f64,
    pub premium: f64,
    /// Calendar days. Takes precedence over `expiry` when both are set.
    pub days_to_expiry: Option<f64>,
    pub expiry: Option<NaiveDate>,
    #[serde(default = "default_contracts")]
    pub contracts: f64,
    pub target_price: f64,
    /// Percent, e.g. 30 for 30%
    pub volatility_pct: f64,
    /// Percent. None = use the configured default
    pub rate_pct: Option<f64>,
    pub option_type: OptionType,
}

fn default_contracts() -> f64 {
    1.0
}

/// Calendar days from `today` to `expiry`, clamped at zero.
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> f64 {
    (expiry - today).num_days().max(0) as f64
}

impl CalculatorInputs {
    pub fn resolve_days(&self, today: NaiveDate) -> EngineResult<f64> {
        match (self.days_to_expiry, self.expiry) {
            (Some(days), _) => Ok(days),
            (None, Some(expiry)) => Ok(days_until(expiry, today)),
            (None, None) => Err(EngineError::InvalidInput(
                "either days_to_expiry or expiry is required".into(),
            )),
        }
    }

    pub fn to_contract(&self, default_rate_pct: f64, today: NaiveDate) -> EngineResult<OptionContract> {
        let days = self.resolve_days(today)?;
        let rate_pct = self.rate_pct.unwrap_or(default_rate_pct);
        Ok(OptionContract::from_days(
            self.spot,
            self.strike,
            days,
            rate_pct / 100.0,
            self.volatility_pct / 100.0,
            self.option_type,
        ))
    }

    pub fn greeks(&self, default_rate_pct: f64, today: NaiveDate) -> EngineResult<Greeks> {
        Ok(black_scholes::greeks(&self.to_contract(default_rate_pct, today)?))
    }

    pub fn compare(
        &self,
        multiplier: f64,
        default_rate_pct: f64,
        today: NaiveDate,
    ) -> EngineResult<PositionComparison> {
        let contract = self.to_contract(default_rate_pct, today)?;
        Ok(comparison::compare(
            &contract,
            self.premium,
            multiplier,
            self.contracts,
            self.target_price,
        ))
    }

    pub fn payoff_curve(
        &self,
        multiplier: f64,
        default_rate_pct: f64,
        today: NaiveDate,
        samples: usize,
    ) -> EngineResult<PayoffCurve> {
        let contract = self.to_contract(default_rate_pct, today)?;
        Ok(payoff::generate_curve(
            &contract,
            self.premium,
            multiplier,
            self.contracts,
            samples,
        ))
    }
}
