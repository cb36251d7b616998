use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{AnalysisError, CoreResult};
use crate::types::{PriceRef, TradeDefinition};

/// Event window offsets, in trading days relative to the anchor T.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowConfig {
    /// Observation starts at T-O.
    pub observation_before: usize,
    /// Observation ends at T+P.
    pub observation_after: usize,
    /// Accumulation window starts at T-A.
    pub accumulation_start: usize,
    /// Accumulation window ends at T-B (B < A).
    pub accumulation_end: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            observation_before: 20,
            observation_after: 40,
            accumulation_start: 10,
            accumulation_end: 2,
        }
    }
}

/// Indicator lookbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub atr_period: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    /// Close SMA lookbacks (e.g. 20/50/100/200).
    pub trend_periods: Vec<usize>,
    /// Tactical volume baseline lookback.
    pub volume_short_period: usize,
    /// Strategic volume baseline lookback.
    pub volume_long_period: usize,
    /// Trailing window for historical percentile ranks.
    pub percentile_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            atr_period: 14,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            trend_periods: vec![20, 50, 100, 200],
            volume_short_period: 20,
            volume_long_period: 50,
            percentile_window: 252,
        }
    }
}

impl IndicatorConfig {
    /// Longest lookback of any column; the history buffer an upstream fetch
    /// should provide before the observation window.
    pub fn longest_lookback(&self) -> usize {
        self.trend_periods
            .iter()
            .copied()
            .chain([
                self.rsi_period,
                self.atr_period,
                self.bollinger_period,
                self.volume_short_period,
                self.volume_long_period,
                self.percentile_window,
            ])
            .max()
            .unwrap_or(0)
    }
}

/// Tuning for one analysis run. Passed explicitly to every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    pub windows: WindowConfig,
    pub indicators: IndicatorConfig,
    /// RVOL (long baseline) above which an accumulation day is high probability.
    pub rvol_threshold: f64,
    /// Exit offset of the event trade (T-1 close to T+k close).
    pub event_exit_offset: usize,
    /// Fixed-horizon exits, one accumulation-entry trade per offset.
    pub return_horizons: Vec<usize>,
    /// Additional named trades appended to the default menu.
    pub custom_trades: Vec<TradeDefinition>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            windows: WindowConfig::default(),
            indicators: IndicatorConfig::default(),
            rvol_threshold: 1.5,
            event_exit_offset: 2,
            return_horizons: vec![2, 5, 10, 20],
            custom_trades: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Load tuning from `ANALYSIS_*` environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let w = &defaults.windows;
        let i = &defaults.indicators;

        Self {
            windows: WindowConfig {
                observation_before: env_parse("ANALYSIS_OBSERVATION_BEFORE", w.observation_before),
                observation_after: env_parse("ANALYSIS_OBSERVATION_AFTER", w.observation_after),
                accumulation_start: env_parse("ANALYSIS_ACCUMULATION_START", w.accumulation_start),
                accumulation_end: env_parse("ANALYSIS_ACCUMULATION_END", w.accumulation_end),
            },
            indicators: IndicatorConfig {
                rsi_period: env_parse("ANALYSIS_RSI_PERIOD", i.rsi_period),
                atr_period: env_parse("ANALYSIS_ATR_PERIOD", i.atr_period),
                bollinger_period: env_parse("ANALYSIS_BB_PERIOD", i.bollinger_period),
                bollinger_std_dev: env_parse("ANALYSIS_BB_STD_DEV", i.bollinger_std_dev),
                trend_periods: env_list("ANALYSIS_TREND_PERIODS")
                    .unwrap_or_else(|| i.trend_periods.clone()),
                volume_short_period: env_parse(
                    "ANALYSIS_VOLUME_SHORT_PERIOD",
                    i.volume_short_period,
                ),
                volume_long_period: env_parse("ANALYSIS_VOLUME_LONG_PERIOD", i.volume_long_period),
                percentile_window: env_parse("ANALYSIS_PERCENTILE_WINDOW", i.percentile_window),
            },
            rvol_threshold: env_parse("ANALYSIS_RVOL_THRESHOLD", defaults.rvol_threshold),
            event_exit_offset: env_parse("ANALYSIS_EVENT_EXIT_OFFSET", defaults.event_exit_offset),
            return_horizons: env_list("ANALYSIS_RETURN_HORIZONS")
                .unwrap_or_else(|| defaults.return_horizons.clone()),
            custom_trades: Vec::new(),
        }
    }

    /// Reject tuning that cannot describe a meaningful analysis.
    pub fn validate(&self) -> CoreResult<()> {
        let w = &self.windows;
        let i = &self.indicators;

        if w.accumulation_end >= w.accumulation_start {
            return Err(AnalysisError::InvalidConfig(format!(
                "accumulation window T-{}..T-{} is empty",
                w.accumulation_start, w.accumulation_end
            )));
        }
        let periods = [
            ("rsi_period", i.rsi_period),
            ("atr_period", i.atr_period),
            ("bollinger_period", i.bollinger_period),
            ("volume_short_period", i.volume_short_period),
            ("volume_long_period", i.volume_long_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(AnalysisError::InvalidConfig(format!("{} must be positive", name)));
        }
        if i.trend_periods.iter().any(|p| *p == 0) {
            return Err(AnalysisError::InvalidConfig(
                "trend periods must be positive".to_string(),
            ));
        }
        if i.percentile_window < 2 {
            return Err(AnalysisError::InvalidConfig(
                "percentile window must cover at least 2 sessions".to_string(),
            ));
        }
        if !i.bollinger_std_dev.is_finite() || i.bollinger_std_dev < 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "bollinger std dev must be a non-negative number".to_string(),
            ));
        }
        if !self.rvol_threshold.is_finite() {
            return Err(AnalysisError::InvalidConfig(
                "rvol threshold must be finite".to_string(),
            ));
        }
        if self.event_exit_offset == 0 || self.return_horizons.iter().any(|k| *k == 0) {
            return Err(AnalysisError::InvalidConfig(
                "post-event exit offsets must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Default trade menu followed by any custom trades.
    ///
    /// run_up: accumulation -> T-1, event: T-1 -> T+k, profit_tN: accumulation -> T+N.
    pub fn trade_definitions(&self) -> Vec<TradeDefinition> {
        let mut trades = vec![
            TradeDefinition::new("run_up", PriceRef::AccumulationPrice, PriceRef::PreEventClose),
            TradeDefinition::new(
                "event",
                PriceRef::PreEventClose,
                PriceRef::PostEventClose {
                    offset: self.event_exit_offset,
                },
            ),
        ];
        trades.extend(self.return_horizons.iter().map(|k| {
            TradeDefinition::new(
                format!("profit_t{}", k),
                PriceRef::AccumulationPrice,
                PriceRef::PostEventClose { offset: *k },
            )
        }));
        trades.extend(self.custom_trades.iter().cloned());
        trades
    }
}

/// Runtime configuration of the command-line tool.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `{SYMBOL}_ohlcv.json` files.
    pub data_dir: PathBuf,
    /// Watchlist JSON (symbols and earnings dates).
    pub watchlist_path: PathBuf,
    /// Pretty-print the JSON report.
    pub pretty: bool,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            watchlist_path: env::var("WATCHLIST_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("configs/stockSymbolDetails.json")),
            pretty: env::var("PRETTY_OUTPUT")
                .ok()
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            analysis: AnalysisConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Comma-separated list, e.g. "2,5,10,20". Unparseable entries are skipped.
fn env_list(key: &str) -> Option<Vec<usize>> {
    let raw = env::var(key).ok()?;
    let values: Vec<usize> = raw
        .split(',')
        .filter_map(|v| v.trim().parse().ok())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
