use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    /// Annual risk-free rate in percent, used when a request omits one
    pub default_rate_pct: f64,
    /// Shares per contract
    pub contract_multiplier: f64,
    pub payoff_samples: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3001,
            default_rate_pct: 4.5,
            contract_multiplier: 100.0,
            payoff_samples: crate::payoff::DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| EngineError::Config(format!("SERVER_PORT: {e}")))?;

        let default_rate_pct = env_var_or("DEFAULT_RISK_FREE_RATE_PCT", "4.5")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("DEFAULT_RISK_FREE_RATE_PCT: {e}")))?;

        let contract_multiplier = env_var_or("CONTRACT_MULTIPLIER", "100")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("CONTRACT_MULTIPLIER: {e}")))?;

        let payoff_samples = env_var_or("PAYOFF_SAMPLES", "51")
            .parse::<usize>()
            .map_err(|e| EngineError::Config(format!("PAYOFF_SAMPLES: {e}")))?;

        if !default_rate_pct.is_finite() {
            return Err(EngineError::Config(
                "DEFAULT_RISK_FREE_RATE_PCT: must be finite".into(),
            ));
        }

        if !(contract_multiplier.is_finite() && contract_multiplier > 0.0) {
            return Err(EngineError::Config(
                "CONTRACT_MULTIPLIER: must be a positive number".into(),
            ));
        }

        Ok(Self {
            server_port,
            default_rate_pct,
            contract_multiplier,
            payoff_samples,
        })
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
