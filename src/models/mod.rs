pub mod black_scholes;
pub mod normal;

/// Calendar days per year used for every day <-> year conversion.
pub const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    #[inline]
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    #[inline]
    pub fn is_call(&self) -> bool {
        matches!(self, OptionType::Call)
    }

    /// Exercise value at the given underlying price
    #[inline]
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    #[inline]
    pub fn is_itm(&self, spot: f64, strike: f64) -> bool {
        match self {
            OptionType::Call => spot > strike,
            OptionType::Put => spot < strike,
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Model inputs for a single European option. Stack-allocated, Copy.
///
/// Inputs are taken as-is: out-of-domain values (zero vol, expired, negative
/// spot) are handled by the kernel's fallback, never rejected here.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OptionContract {
    pub spot: f64,
    pub strike: f64,
    pub time_to_expiry_years: f64,
    /// Annualized, as decimal (0.05 = 5%). May be negative.
    pub risk_free_rate: f64,
    /// Annualized implied vol, as decimal (0.25 = 25%)
    pub volatility: f64,
    pub option_type: OptionType,
}

impl OptionContract {
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry_years: f64,
        risk_free_rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry_years,
            risk_free_rate,
            volatility,
            option_type,
        }
    }

    /// Build from a calendar-day count instead of years.
    pub fn from_days(
        spot: f64,
        strike: f64,
        days_to_expiry: f64,
        risk_free_rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Self {
        Self::new(
            spot,
            strike,
            days_to_expiry / DAYS_PER_YEAR,
            risk_free_rate,
            volatility,
            option_type,
        )
    }

    #[inline]
    pub fn days_to_expiry(&self) -> f64 {
        self.time_to_expiry_years * DAYS_PER_YEAR
    }

    #[inline]
    pub fn intrinsic(&self) -> f64 {
        self.option_type.intrinsic(self.spot, self.strike)
    }

    #[inline]
    pub fn is_itm(&self) -> bool {
        self.option_type.is_itm(self.spot, self.strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.phi(), 1.0);
        assert_eq!(OptionType::Put.phi(), -1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_moneyness() {
        let call = OptionContract::from_days(150.0, 140.0, 30.0, 0.05, 0.3, OptionType::Call);
        let put = OptionContract { option_type: OptionType::Put, ..call };
        assert!(call.is_itm());
        assert!(!put.is_itm());

        // At the money is neither
        let atm = OptionContract { spot: 140.0, ..call };
        assert!(!atm.is_itm());
        assert!(!OptionContract { option_type: OptionType::Put, ..atm }.is_itm());
    }

    #[test]
    fn test_day_conversion() {
        let c = OptionContract::from_days(100.0, 100.0, 73.0, 0.0, 0.2, OptionType::Call);
        assert!((c.time_to_expiry_years - 0.2).abs() < 1e-12);
        assert!((c.days_to_expiry() - 73.0).abs() < 1e-9);
    }

    #[test]
    fn test_serde_lowercase_tags() {
        let json = serde_json::to_string(&OptionType::Put).unwrap();
        assert_eq!(json, "\"put\"");
        let parsed: OptionType = serde_json::from_str("\"call\"").unwrap();
        assert_eq!(parsed, OptionType::Call);
    }
}
