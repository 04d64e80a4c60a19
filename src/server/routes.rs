use crate::inputs::CalculatorInputs;
use crate::models::black_scholes;
use crate::state::{AppState, PerfCounters};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use std::sync::Arc;

/// Upper bound on payoff samples per request
const MAX_SAMPLES: usize = 1000;

#[derive(serde::Deserialize)]
pub struct CurveQuery {
    pub samples: Option<usize>,
}

type ApiResponse = (StatusCode, Json<serde_json::Value>);

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

fn rejected(state: &AppState, e: crate::errors::EngineError) -> ApiResponse {
    PerfCounters::bump(&state.counters.rejected_requests);
    tracing::debug!(error = %e, "request rejected");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
}

/// GET /api/greeks -- sensitivities plus model value
pub async fn get_greeks(
    State(state): State<Arc<AppState>>,
    Query(inputs): Query<CalculatorInputs>,
) -> ApiResponse {
    PerfCounters::bump(&state.counters.greeks_requests);
    match inputs.to_contract(state.config.default_rate_pct, today()) {
        Ok(contract) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "greeks": black_scholes::greeks(&contract),
                "theoretical_price": black_scholes::theoretical_price(&contract),
            })),
        ),
        Err(e) => rejected(&state, e),
    }
}

/// GET /api/compare -- stock vs option comparison with recommendation
pub async fn get_compare(
    State(state): State<Arc<AppState>>,
    Query(inputs): Query<CalculatorInputs>,
) -> ApiResponse {
    PerfCounters::bump(&state.counters.compare_requests);
    let cfg = &state.config;
    match inputs.compare(cfg.contract_multiplier, cfg.default_rate_pct, today()) {
        Ok(cmp) => {
            tracing::debug!(
                recommendation = %cmp.recommendation,
                leverage = cmp.leverage,
                reasons = cmp.reasons.len(),
                "comparison computed"
            );
            (StatusCode::OK, Json(serde_json::json!(cmp)))
        }
        Err(e) => rejected(&state, e),
    }
}

/// GET /api/payoff -- expiration P/L curve for both legs
pub async fn get_payoff(
    State(state): State<Arc<AppState>>,
    Query(inputs): Query<CalculatorInputs>,
    Query(curve): Query<CurveQuery>,
) -> ApiResponse {
    PerfCounters::bump(&state.counters.payoff_requests);
    let cfg = &state.config;
    let samples = curve.samples.unwrap_or(cfg.payoff_samples).min(MAX_SAMPLES);
    match inputs.payoff_curve(cfg.contract_multiplier, cfg.default_rate_pct, today(), samples) {
        Ok(curve) => {
            let bounds = curve.pnl_bounds();
            let breakevens = curve.option_breakevens();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "points": curve.points,
                    "pnl_bounds": bounds,
                    "option_breakevens": breakevens,
                })),
            )
        }
        Err(e) => rejected(&state, e),
    }
}

/// GET /api/implied-vol -- vol implied by the quoted premium, in percent
pub async fn get_implied_vol(
    State(state): State<Arc<AppState>>,
    Query(inputs): Query<CalculatorInputs>,
) -> ApiResponse {
    PerfCounters::bump(&state.counters.implied_vol_requests);
    match inputs.to_contract(state.config.default_rate_pct, today()) {
        Ok(contract) => {
            let iv = black_scholes::implied_volatility(&contract, inputs.premium);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "implied_volatility_pct": iv.map(|v| v * 100.0),
                })),
            )
        }
        Err(e) => rejected(&state, e),
    }
}

/// GET /api/counters -- request counters (lock-free reads)
pub async fn get_counters(
    State(state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    use portable_atomic::Ordering::Relaxed;
    Json(serde_json::json!({
        "greeks_requests": state.counters.greeks_requests.load(Relaxed),
        "compare_requests": state.counters.compare_requests.load(Relaxed),
        "payoff_requests": state.counters.payoff_requests.load(Relaxed),
        "implied_vol_requests": state.counters.implied_vol_requests.load(Relaxed),
        "rejected_requests": state.counters.rejected_requests.load(Relaxed),
    }))
}
