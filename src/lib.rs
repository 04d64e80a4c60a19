//! Option economics engine for the trading dashboard calculators.
//!
//! - `models`: closed-form European pricing, Greeks, implied vol
//! - `comparison`: stock vs option capital, ROI and the recommendation chain
//! - `payoff`: expiration P/L curves for charting
//! - `inputs`: form values (percent, days) to engine units
//! - `server`: JSON API over the above
//!
//! Everything under `models`, `comparison` and `payoff` is pure and never
//! fails; degenerate inputs come back as fallback or non-finite values.

pub mod comparison;
pub mod config;
pub mod errors;
pub mod inputs;
pub mod models;
pub mod payoff;
pub mod server;
pub mod state;

pub use comparison::rules::Recommendation;
pub use comparison::{compare, PositionComparison, PositionCosts};
pub use inputs::CalculatorInputs;
pub use models::black_scholes::{compute_greeks, implied_volatility, theoretical_price, Greeks};
pub use models::{OptionContract, OptionType};
pub use payoff::{generate_curve, PayoffCurve, PayoffCurvePoint};
