use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category of a technical indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Trend,
    Momentum,
    Volatility,
    Volume,
}

/// Simple moving average of close for one configured lookback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAverage {
    pub lookback: usize,
    pub value: Option<f64>,
    /// (close - average) / average * 100.
    pub distance_pct: Option<f64>,
}

/// Indicator columns for one date of an annotated series.
///
/// Every field is `None` until its lookback is fully covered by history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSet {
    pub date: NaiveDate,
    pub rsi: Option<f64>,
    pub rsi_percentile: Option<f64>,
    pub atr: Option<f64>,
    pub atr_percentile: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_width: Option<f64>,
    pub trend: Vec<TrendAverage>,
    pub volume_sma_short: Option<f64>,
    pub volume_sma_long: Option<f64>,
    pub volume_percentile: Option<f64>,
}

impl IndicatorSet {
    /// Trend average for a specific lookback, if configured.
    pub fn trend_for(&self, lookback: usize) -> Option<&TrendAverage> {
        self.trend.iter().find(|t| t.lookback == lookback)
    }
}

/// Where a momentum percentile sits in its own trailing history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumZone {
    /// 0-20: extremely oversold historically.
    ExtremelyLow,
    /// 20-40: below average.
    Low,
    /// 40-60: average range.
    Average,
    /// 60-80: above average.
    High,
    /// 80-100: extremely overbought historically.
    ExtremelyHigh,
}

impl MomentumZone {
    pub fn from_percentile(percentile: f64) -> Self {
        match percentile {
            p if p < 20.0 => MomentumZone::ExtremelyLow,
            p if p < 40.0 => MomentumZone::Low,
            p if p < 60.0 => MomentumZone::Average,
            p if p < 80.0 => MomentumZone::High,
            _ => MomentumZone::ExtremelyHigh,
        }
    }
}

/// Classic RSI reading against fixed 30/70 levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumState {
    Oversold,
    Neutral,
    Overbought,
}

impl MomentumState {
    pub const OVERSOLD: f64 = 30.0;
    pub const OVERBOUGHT: f64 = 70.0;

    pub fn from_rsi(rsi: f64) -> Self {
        if rsi < Self::OVERSOLD {
            MomentumState::Oversold
        } else if rsi > Self::OVERBOUGHT {
            MomentumState::Overbought
        } else {
            MomentumState::Neutral
        }
    }
}
