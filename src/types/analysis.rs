use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{EventWindows, MomentumState, MomentumZone};

/// Price reference a trade enters or exits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceRef {
    /// Minimum low of the accumulation window.
    AccumulationPrice,
    /// Close of the session before the announcement (T-1).
    PreEventClose,
    /// Close `offset` sessions after the announcement (T+k).
    PostEventClose { offset: usize },
}

impl fmt::Display for PriceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceRef::AccumulationPrice => write!(f, "accumulation"),
            PriceRef::PreEventClose => write!(f, "T-1 close"),
            PriceRef::PostEventClose { offset } => write!(f, "T+{} close", offset),
        }
    }
}

/// Named entry/exit rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeDefinition {
    pub name: String,
    pub entry: PriceRef,
    pub exit: PriceRef,
}

impl TradeDefinition {
    pub fn new(name: impl Into<String>, entry: PriceRef, exit: PriceRef) -> Self {
        Self {
            name: name.into(),
            entry,
            exit,
        }
    }
}

/// Realized outcome of one trade definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReturn {
    pub entry: PriceRef,
    pub exit: PriceRef,
    pub entry_date: Option<NaiveDate>,
    pub entry_price: Option<f64>,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
    /// (exit - entry) / entry * 100, `None` when either leg is unavailable.
    pub return_pct: Option<f64>,
}

/// A session inside the accumulation window whose low equals the window minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulationDay {
    pub date: NaiveDate,
    pub low: f64,
    pub volume: u64,
    /// Volume over the short (tactical) frozen baseline.
    pub rvol_short: Option<f64>,
    /// Volume over the long (strategic) frozen baseline.
    pub rvol_long: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_percentile: Option<f64>,
    pub momentum_state: Option<MomentumState>,
    pub momentum_zone: Option<MomentumZone>,
    /// Trading sessions between this day and the anchor.
    pub days_before_earnings: i64,
    pub high_probability: bool,
}

/// Highest high preceding the dip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceHigh {
    pub price: f64,
    pub date: NaiveDate,
}

/// Complete analysis of one (instrument, earnings event) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub symbol: String,
    pub earnings_date: NaiveDate,
    pub quarter: String,
    pub windows: EventWindows,
    pub accumulation_price: f64,
    pub accumulation_days: Vec<AccumulationDay>,
    pub reference_high: ReferenceHigh,
    pub max_drawdown_pct: f64,
    pub returns: BTreeMap<String, TradeReturn>,
}

impl AnalysisResult {
    /// Earliest accumulation day.
    pub fn dip_date(&self) -> Option<NaiveDate> {
        self.accumulation_days.first().map(|d| d.date)
    }

    /// Percentage return of a named trade; `None` if unknown or undefined.
    pub fn return_pct(&self, name: &str) -> Option<f64> {
        self.returns.get(name).and_then(|r| r.return_pct)
    }

    pub fn has_high_probability_day(&self) -> bool {
        self.accumulation_days.iter().any(|d| d.high_probability)
    }
}

/// Result of one job in a batch run. Failures stay local to their job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub symbol: String,
    pub earnings_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_some()
    }
}
