use crate::models::normal::{norm_cdf, norm_pdf};
use crate::models::{OptionContract, OptionType, DAYS_PER_YEAR};

/// Implied vol search bracket (decimal)
const IV_MIN: f64 = 1e-4;
const IV_MAX: f64 = 5.0;
const IV_TOLERANCE: f64 = 1e-8;
const IV_MAX_ITERATIONS: usize = 100;
/// Newton seed, 30% vol
const IV_SEED: f64 = 0.3;

/// Option sensitivities.
///
/// theta is per calendar day, vega per 1 vol point, rho per 1 rate point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl Greeks {
    /// Returned whenever the model is undefined for the inputs (expired,
    /// zero vol, non-finite intermediates). The option is treated as the
    /// underlying: delta +1 for calls, -1 for puts, everything else zero.
    #[inline]
    pub fn fallback(is_call: bool) -> Self {
        Self {
            delta: if is_call { 1.0 } else { -1.0 },
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            rho: 0.0,
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.delta.is_finite()
            && self.gamma.is_finite()
            && self.theta.is_finite()
            && self.vega.is_finite()
            && self.rho.is_finite()
    }
}

// ── Precomputed model parameters (stack, no alloc) ──

#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ModelParams {
    pub spot: f64,
    pub strike: f64,
    pub ttl_years: f64,
    pub rate: f64,
    pub sigma: f64,
    // Precomputed
    pub sqrt_t: f64,
    pub sigma_sqrt_t: f64,
    /// e^{-rT}
    pub discount: f64,
    pub d1: f64,
    pub d2: f64,
}

impl ModelParams {
    /// Precompute d1/d2 and friends. Errors with a short reason when the closed
    /// form is not defined for these inputs.
    #[inline]
    pub fn new(
        spot: f64,
        strike: f64,
        ttl_years: f64,
        rate: f64,
        sigma: f64,
    ) -> Result<Self, &'static str> {
        if !(spot.is_finite() && strike.is_finite() && ttl_years.is_finite() && sigma.is_finite()) {
            return Err("non-finite input");
        }
        if ttl_years <= 0.0 {
            return Err("expired");
        }
        if spot <= 0.0 || strike <= 0.0 {
            return Err("non-positive price");
        }
        if sigma <= 0.0 {
            return Err("non-positive volatility");
        }

        let sqrt_t = ttl_years.sqrt();
        let sigma_sqrt_t = sigma * sqrt_t;
        let d1 = ((spot / strike).ln() + (rate + 0.5 * sigma * sigma) * ttl_years) / sigma_sqrt_t;
        let d2 = d1 - sigma_sqrt_t;

        if !d1.is_finite() || !d2.is_finite() {
            return Err("non-finite d1/d2");
        }

        Ok(Self {
            spot,
            strike,
            ttl_years,
            rate,
            sigma,
            sqrt_t,
            sigma_sqrt_t,
            discount: (-rate * ttl_years).exp(),
            d1,
            d2,
        })
    }

    #[inline]
    pub fn from_contract(contract: &OptionContract) -> Result<Self, &'static str> {
        Self::new(
            contract.spot,
            contract.strike,
            contract.time_to_expiry_years,
            contract.risk_free_rate,
            contract.volatility,
        )
    }

    /// Closed-form European price
    #[inline]
    pub fn price(&self, option_type: OptionType) -> f64 {
        let k_disc = self.strike * self.discount;
        match option_type {
            OptionType::Call => self.spot * norm_cdf(self.d1) - k_disc * norm_cdf(self.d2),
            OptionType::Put => k_disc * norm_cdf(-self.d2) - self.spot * norm_cdf(-self.d1),
        }
    }

    /// dV/dsigma per unit of vol (not per point)
    #[inline]
    fn raw_vega(&self) -> f64 {
        self.spot * norm_pdf(self.d1) * self.sqrt_t
    }

    #[inline]
    pub fn greeks(&self, is_call: bool) -> Greeks {
        let pdf_d1 = norm_pdf(self.d1);
        let k_disc = self.strike * self.discount;

        let delta = if is_call {
            norm_cdf(self.d1)
        } else {
            norm_cdf(self.d1) - 1.0
        };

        let gamma = pdf_d1 / (self.spot * self.sigma_sqrt_t);

        let decay = -(self.spot * pdf_d1 * self.sigma) / (2.0 * self.sqrt_t);
        let theta_annual = if is_call {
            decay - self.rate * k_disc * norm_cdf(self.d2)
        } else {
            decay + self.rate * k_disc * norm_cdf(-self.d2)
        };

        let rho_unit = if is_call {
            k_disc * self.ttl_years * norm_cdf(self.d2)
        } else {
            -k_disc * self.ttl_years * norm_cdf(-self.d2)
        };

        Greeks {
            delta,
            gamma,
            theta: theta_annual / DAYS_PER_YEAR,
            vega: self.raw_vega() / 100.0,
            rho: rho_unit / 100.0,
        }
    }
}

/// Compute Greeks for a European option.
///
/// Total function: any input the model cannot handle yields
/// `Greeks::fallback(is_call)` instead of NaN/inf. Safe to call on every
/// keystroke.
pub fn compute_greeks(
    spot: f64,
    strike: f64,
    ttl_years: f64,
    rate: f64,
    sigma: f64,
    is_call: bool,
) -> Greeks {
    let params = match ModelParams::new(spot, strike, ttl_years, rate, sigma) {
        Ok(p) => p,
        Err(reason) => {
            tracing::trace!(reason, "greeks fallback");
            return Greeks::fallback(is_call);
        }
    };

    let greeks = params.greeks(is_call);
    if !greeks.is_finite() {
        tracing::trace!(reason = "non-finite greeks", "greeks fallback");
        return Greeks::fallback(is_call);
    }
    greeks
}

#[inline]
pub fn greeks(contract: &OptionContract) -> Greeks {
    compute_greeks(
        contract.spot,
        contract.strike,
        contract.time_to_expiry_years,
        contract.risk_free_rate,
        contract.volatility,
        contract.option_type.is_call(),
    )
}

/// Model value of the option. Falls back to intrinsic value whenever the
/// closed form is undefined (expired, zero vol, bad input).
pub fn theoretical_price(contract: &OptionContract) -> f64 {
    let price = ModelParams::from_contract(contract)
        .map(|p| p.price(contract.option_type))
        .unwrap_or(f64::NAN);

    if price.is_finite() {
        // A&S error can push deep OTM values a hair below zero
        price.max(0.0)
    } else {
        contract.intrinsic()
    }
}

/// Solve for the volatility that reproduces `premium`.
///
/// Newton on vega, falling back to bisection whenever a Newton step leaves
/// the current bracket. Returns None when no vol in [IV_MIN, IV_MAX] can
/// produce the premium (below discounted intrinsic, above the no-arbitrage
/// ceiling) or the contract is degenerate.
pub fn implied_volatility(contract: &OptionContract, premium: f64) -> Option<f64> {
    if !premium.is_finite() || premium <= 0.0 {
        return None;
    }

    let params_at = |sigma: f64| -> Option<ModelParams> {
        ModelParams::new(
            contract.spot,
            contract.strike,
            contract.time_to_expiry_years,
            contract.risk_free_rate,
            sigma,
        )
        .ok()
    };

    let lo_params = params_at(IV_MIN)?;
    let hi_params = params_at(IV_MAX)?;

    let k_disc = contract.strike * lo_params.discount;
    let (floor, ceiling) = match contract.option_type {
        OptionType::Call => ((contract.spot - k_disc).max(0.0), contract.spot),
        OptionType::Put => ((k_disc - contract.spot).max(0.0), k_disc),
    };
    if premium <= floor || premium >= ceiling {
        return None;
    }

    let price_lo = lo_params.price(contract.option_type);
    let price_hi = hi_params.price(contract.option_type);
    if premium < price_lo || premium > price_hi {
        return None;
    }

    let mut lo = IV_MIN;
    let mut hi = IV_MAX;
    let mut sigma = IV_SEED;

    for _ in 0..IV_MAX_ITERATIONS {
        let params = params_at(sigma)?;
        let diff = params.price(contract.option_type) - premium;

        if diff.abs() < IV_TOLERANCE {
            return Some(sigma);
        }

        // Price is increasing in vol
        if diff > 0.0 {
            hi = sigma;
        } else {
            lo = sigma;
        }

        if hi - lo < IV_TOLERANCE {
            return Some(0.5 * (lo + hi));
        }

        let vega = params.raw_vega();
        let newton = sigma - diff / vega;
        sigma = if vega > 1e-12 && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
    }

    tracing::debug!(premium, sigma, "implied vol hit iteration cap");
    Some(sigma)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm_call() -> OptionContract {
        OptionContract::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call)
    }

    #[test]
    fn test_textbook_values() {
        // S=K=100, T=1, r=5%, vol=20%
        let call = greeks(&atm_call());
        let put = greeks(&OptionContract { option_type: OptionType::Put, ..atm_call() });

        assert!((call.delta - 0.6368).abs() < 1e-3, "call delta={}", call.delta);
        assert!((put.delta + 0.3632).abs() < 1e-3, "put delta={}", put.delta);
        assert!((call.gamma - 0.018762).abs() < 1e-5, "gamma={}", call.gamma);
        assert!((call.gamma - put.gamma).abs() < 1e-15);
        assert!((call.vega - 0.37524).abs() < 1e-4, "vega={}", call.vega);
        assert!((call.theta - (-6.414 / 365.0)).abs() < 1e-4, "call theta={}", call.theta);
        assert!((put.theta - (-1.658 / 365.0)).abs() < 1e-4, "put theta={}", put.theta);
        assert!((call.rho - 0.53232).abs() < 1e-3, "call rho={}", call.rho);
        assert!((put.rho + 0.41890).abs() < 1e-3, "put rho={}", put.rho);
    }

    #[test]
    fn test_textbook_prices() {
        let call = theoretical_price(&atm_call());
        let put = theoretical_price(&OptionContract { option_type: OptionType::Put, ..atm_call() });
        assert!((call - 10.4506).abs() < 1e-3, "call={call}");
        assert!((put - 5.5735).abs() < 1e-3, "put={put}");

        // Put-call parity: C - P = S - K e^{-rT}
        let parity = 100.0 - 100.0 * (-0.05_f64).exp();
        assert!((call - put - parity).abs() < 1e-5);
    }

    #[test]
    fn test_delta_bounds_and_gamma_sign() {
        for &spot in &[50.0, 90.0, 100.0, 110.0, 200.0] {
            for &t in &[1.0 / 365.0, 0.1, 1.0, 3.0] {
                for &vol in &[0.05, 0.2, 0.8] {
                    for &r in &[-0.01, 0.0, 0.05] {
                        let c = compute_greeks(spot, 100.0, t, r, vol, true);
                        let p = compute_greeks(spot, 100.0, t, r, vol, false);
                        assert!((0.0..=1.0).contains(&c.delta), "call delta={}", c.delta);
                        assert!((-1.0..=0.0).contains(&p.delta), "put delta={}", p.delta);
                        assert!(c.gamma >= 0.0 && p.gamma >= 0.0);
                        assert!((c.delta - p.delta - 1.0).abs() < 1e-12, "delta parity");
                    }
                }
            }
        }
    }

    #[test]
    fn test_delta_converges_near_expiry() {
        let t = 1e-6;
        let itm = compute_greeks(150.0, 140.0, t, 0.05, 0.3, true);
        let otm = compute_greeks(130.0, 140.0, t, 0.05, 0.3, true);
        assert!((itm.delta - 1.0).abs() < 1e-6, "ITM delta={}", itm.delta);
        assert!(otm.delta.abs() < 1e-6, "OTM delta={}", otm.delta);
    }

    #[test]
    fn test_fallback_cases() {
        let expired = compute_greeks(150.0, 140.0, 0.0, 0.05, 0.3, true);
        assert_eq!(expired, Greeks::fallback(true));
        assert_eq!(expired.delta, 1.0);

        let expired_put = compute_greeks(130.0, 140.0, 0.0, 0.05, 0.3, false);
        assert_eq!(expired_put.delta, -1.0);
        assert_eq!(expired_put.gamma, 0.0);

        assert_eq!(compute_greeks(150.0, 140.0, 0.1, 0.05, 0.0, true), Greeks::fallback(true));
        assert_eq!(compute_greeks(0.0, 140.0, 0.1, 0.05, 0.3, false), Greeks::fallback(false));
        assert_eq!(compute_greeks(150.0, -1.0, 0.1, 0.05, 0.3, true), Greeks::fallback(true));
        assert_eq!(compute_greeks(f64::NAN, 140.0, 0.1, 0.05, 0.3, true), Greeks::fallback(true));
        assert_eq!(compute_greeks(150.0, 140.0, f64::INFINITY, 0.05, 0.3, true), Greeks::fallback(true));
        // vol^2 overflows, d1 = inf/inf
        assert_eq!(compute_greeks(150.0, 140.0, 1.0, 0.05, 1e300, true), Greeks::fallback(true));
    }

    #[test]
    fn test_never_non_finite() {
        let values = [-1e300, -5.0, 0.0, 1e-300, 1e-12, 0.5, 1.0, 100.0, 1e12, 1e300];
        for &s in &values {
            for &k in &values {
                for &t in &values {
                    for &v in &values {
                        for &is_call in &[true, false] {
                            let g = compute_greeks(s, k, t, 0.05, v, is_call);
                            assert!(g.is_finite(), "non-finite greeks for s={s} k={k} t={t} v={v}: {g:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_theoretical_price_degenerate_is_intrinsic() {
        let expired = OptionContract::new(150.0, 140.0, 0.0, 0.05, 0.3, OptionType::Call);
        assert_eq!(theoretical_price(&expired), 10.0);
        let no_vol_put = OptionContract::new(130.0, 140.0, 0.5, 0.05, 0.0, OptionType::Put);
        assert_eq!(theoretical_price(&no_vol_put), 10.0);
    }

    #[test]
    fn test_implied_vol_recovers_input() {
        for &(spot, option_type) in &[(95.0, OptionType::Call), (105.0, OptionType::Put), (100.0, OptionType::Call)] {
            let contract = OptionContract::new(spot, 100.0, 0.5, 0.03, 0.27, option_type);
            let premium = theoretical_price(&contract);
            let iv = implied_volatility(&contract, premium).expect("iv should solve");
            assert!((iv - 0.27).abs() < 1e-6, "iv={iv} for {option_type}");
        }
    }

    #[test]
    fn test_implied_vol_rejects_impossible_premium() {
        let contract = OptionContract::new(150.0, 140.0, 0.25, 0.05, 0.3, OptionType::Call);
        // Below discounted intrinsic
        assert!(implied_volatility(&contract, 5.0).is_none());
        // Above the spot
        assert!(implied_volatility(&contract, 151.0).is_none());
        assert!(implied_volatility(&contract, 0.0).is_none());
        assert!(implied_volatility(&contract, f64::NAN).is_none());

        let expired = OptionContract { time_to_expiry_years: 0.0, ..contract };
        assert!(implied_volatility(&expired, 15.0).is_none());
    }
}
