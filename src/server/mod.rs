pub mod routes;

use crate::state::AppState;
use std::sync::Arc;

/// JSON API consumed by the browser calculators. Stateless apart from
/// counters, so any number of clients can recompute on every keystroke.
pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/api/greeks", axum::routing::get(routes::get_greeks))
        .route("/api/compare", axum::routing::get(routes::get_compare))
        .route("/api/payoff", axum::routing::get(routes::get_payoff))
        .route("/api/implied-vol", axum::routing::get(routes::get_implied_vol))
        .route("/api/counters", axum::routing::get(routes::get_counters))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}
