//! Stock-vs-option recommendation heuristic.
//!
//! An ordered chain of rules folded left to right. Each applicable rule
//! appends its reason and may overwrite the running recommendation, so later
//! rules win unless their effect says otherwise. Not a scoring model: the
//! table order is the behaviour.

use smallvec::SmallVec;

/// Below this many days the option is considered too short-dated
pub const SHORT_DATED_DAYS: f64 = 21.0;
/// Intrinsic / premium above this = mostly intrinsic, cheap optionality
pub const DEEP_ITM_INTRINSIC_RATIO: f64 = 0.8;
/// Time value / premium above this = lots of premium at risk of decay
pub const RICH_TIME_VALUE_RATIO: f64 = 0.3;
pub const HIGH_LEVERAGE: f64 = 5.0;
pub const HIGH_DELTA: f64 = 0.7;
pub const LOW_DELTA: f64 = 0.4;
/// Option ROI must exceed this multiple of stock ROI
pub const ROI_OUTPERFORMANCE: f64 = 2.0;
/// Decimal, 40%
pub const HIGH_VOLATILITY: f64 = 0.40;

pub type Reasons = SmallVec<[String; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Stock,
    Option,
    Neutral,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stock => write!(f, "stock"),
            Self::Option => write!(f, "option"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Everything the rules look at. Stack-allocated, Copy.
#[derive(Debug, Clone, Copy)]
pub struct Signals {
    pub time_to_expiry_years: f64,
    pub is_itm: bool,
    pub premium: f64,
    pub intrinsic_value: f64,
    pub time_value: f64,
    pub leverage: f64,
    pub delta: f64,
    pub stock_roi_pct: f64,
    pub option_roi_pct: f64,
    pub volatility: f64,
}

impl Signals {
    #[inline]
    fn days_to_expiry(&self) -> f64 {
        self.time_to_expiry_years * crate::models::DAYS_PER_YEAR
    }

    #[inline]
    fn intrinsic_ratio(&self) -> f64 {
        self.intrinsic_value / self.premium
    }

    #[inline]
    fn time_value_ratio(&self) -> f64 {
        self.time_value / self.premium
    }

    #[inline]
    fn option_outperforms(&self) -> bool {
        self.option_roi_pct > ROI_OUTPERFORMANCE * self.stock_roi_pct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Reason only
    Note,
    /// Overwrite unconditionally
    Set(Recommendation),
    /// Overwrite unless the running value is `unless`
    SetUnless {
        value: Recommendation,
        unless: Recommendation,
    },
    /// Overwrite only if nothing has been decided yet
    SetIfNeutral(Recommendation),
}

impl Effect {
    #[inline]
    fn apply(self, current: Recommendation) -> Recommendation {
        match self {
            Effect::Note => current,
            Effect::Set(value) => value,
            Effect::SetUnless { value, unless } => {
                if current == unless {
                    current
                } else {
                    value
                }
            }
            Effect::SetIfNeutral(value) => {
                if current == Recommendation::Neutral {
                    value
                } else {
                    current
                }
            }
        }
    }
}

pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&Signals) -> bool,
    pub reason: fn(&Signals) -> String,
    pub effect: Effect,
}

/// Evaluated top to bottom. Do not reorder.
pub static RULES: [Rule; 9] = [
    Rule {
        name: "short_dated",
        applies: |s| s.time_to_expiry_years < SHORT_DATED_DAYS / crate::models::DAYS_PER_YEAR,
        reason: |s| {
            format!(
                "Only {:.0} days to expiration: time decay accelerates sharply, owning the stock avoids it",
                s.days_to_expiry()
            )
        },
        effect: Effect::Set(Recommendation::Stock),
    },
    Rule {
        name: "deep_in_the_money",
        applies: |s| s.is_itm && s.intrinsic_ratio() > DEEP_ITM_INTRINSIC_RATIO,
        reason: |s| {
            format!(
                "In the money with {:.0}% of the premium as intrinsic value: little is paid for time",
                s.intrinsic_ratio() * 100.0
            )
        },
        effect: Effect::Set(Recommendation::Option),
    },
    Rule {
        name: "rich_time_value",
        applies: |s| s.time_value_ratio() > RICH_TIME_VALUE_RATIO,
        reason: |s| {
            format!(
                "{:.0}% of the premium is time value that decays to zero at expiration",
                s.time_value_ratio() * 100.0
            )
        },
        effect: Effect::Note,
    },
    Rule {
        name: "high_leverage",
        applies: |s| s.leverage > HIGH_LEVERAGE,
        reason: |s| format!("The option controls the same shares with {:.1}x leverage", s.leverage),
        effect: Effect::SetUnless {
            value: Recommendation::Option,
            unless: Recommendation::Stock,
        },
    },
    Rule {
        name: "high_delta",
        applies: |s| s.delta.abs() > HIGH_DELTA,
        reason: |s| format!("High delta ({:.2}): the option tracks the stock closely", s.delta),
        effect: Effect::Note,
    },
    Rule {
        name: "low_delta",
        applies: |s| s.delta.abs() < LOW_DELTA,
        reason: |s| {
            format!(
                "Low delta ({:.2}): the stock must move a long way before the option gains much",
                s.delta
            )
        },
        effect: Effect::Note,
    },
    Rule {
        name: "option_outperforms",
        applies: |s| s.option_outperforms(),
        reason: |s| {
            format!(
                "Option return at target ({:.1}%) is more than double the stock return ({:.1}%)",
                s.option_roi_pct, s.stock_roi_pct
            )
        },
        effect: Effect::SetIfNeutral(Recommendation::Option),
    },
    Rule {
        name: "stock_outperforms",
        applies: |s| s.stock_roi_pct > s.option_roi_pct,
        reason: |s| {
            format!(
                "Stock return at target ({:.1}%) beats the option return ({:.1}%)",
                s.stock_roi_pct, s.option_roi_pct
            )
        },
        effect: Effect::Set(Recommendation::Stock),
    },
    Rule {
        name: "high_volatility",
        applies: |s| s.volatility > HIGH_VOLATILITY,
        reason: |s| {
            format!(
                "Implied volatility is high ({:.0}%): option premiums are expensive",
                s.volatility * 100.0
            )
        },
        effect: Effect::Note,
    },
];

/// Fold the rule chain over `signals`, starting from `Neutral`.
pub fn recommend(signals: &Signals) -> (Recommendation, Reasons) {
    RULES.iter().fold(
        (Recommendation::Neutral, Reasons::new()),
        |(current, mut reasons), rule| {
            if !(rule.applies)(signals) {
                return (current, reasons);
            }
            reasons.push((rule.reason)(signals));
            let next = rule.effect.apply(current);
            if next != current {
                tracing::trace!(rule = rule.name, from = %current, to = %next, "recommendation changed");
            }
            (next, reasons)
        },
    )
}
