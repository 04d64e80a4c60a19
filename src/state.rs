use crate::config::AppConfig;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ── Request Counters (lock-free) ──

pub struct PerfCounters {
    pub greeks_requests: AtomicU64,
    pub compare_requests: AtomicU64,
    pub payoff_requests: AtomicU64,
    pub implied_vol_requests: AtomicU64,
    pub rejected_requests: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            greeks_requests: AtomicU64::new(0),
            compare_requests: AtomicU64::new(0),
            payoff_requests: AtomicU64::new(0),
            implied_vol_requests: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for PerfCounters {
    fn default() -> Self {
        Self::new()
    }
}

// ── Application shared state ──
//
// The engine is stateless; every request recomputes from its inputs. Only
// config and counters are shared.

pub struct AppState {
    pub config: AppConfig,
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            counters: PerfCounters::new(),
        })
    }
}
