//! Indicator engine.
//!
//! Annotates a price series once with every indicator column the detector and
//! charting need. The series itself is only borrowed; the columns live in the
//! returned [`AnnotatedSeries`].

use serde::Serialize;
use tracing::debug;

use super::indicators::{percentile_rank, Atr, BollingerBands, Indicator, Rsi, Sma, SmaSource};
use crate::config::IndicatorConfig;
use crate::types::{IndicatorSet, PriceBar, PriceSeries, TrendAverage};

/// A price series with one [`IndicatorSet`] per bar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedSeries<'a> {
    series: &'a PriceSeries,
    indicators: Vec<IndicatorSet>,
}

impl<'a> AnnotatedSeries<'a> {
    pub fn series(&self) -> &'a PriceSeries {
        self.series
    }

    pub fn bars(&self) -> &'a [PriceBar] {
        self.series.bars()
    }

    pub fn indicators(&self) -> &[IndicatorSet] {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    /// Bar and indicator columns at an index.
    pub fn row(&self, index: usize) -> Option<(&'a PriceBar, &IndicatorSet)> {
        Some((self.series.get(index)?, self.indicators.get(index)?))
    }
}

/// Computes the configured indicator columns.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Annotate a series. Never fails: uncovered lookbacks are `None`.
    pub fn annotate<'a>(&self, series: &'a PriceSeries) -> AnnotatedSeries<'a> {
        let bars = series.bars();
        let cfg = &self.config;

        let rsi = Rsi::new(cfg.rsi_period).compute(bars);
        let rsi_percentile = percentile_rank(&rsi, cfg.percentile_window);

        let atr = Atr::new(cfg.atr_period).compute(bars);
        let atr_percentile = percentile_rank(&atr, cfg.percentile_window);

        let bands = BollingerBands::new(cfg.bollinger_period, cfg.bollinger_std_dev).bands(bars);

        let trend: Vec<(usize, Vec<Option<f64>>)> = cfg
            .trend_periods
            .iter()
            .map(|p| (*p, Sma::new(*p, SmaSource::Close).compute(bars)))
            .collect();

        let volume_short = Sma::new(cfg.volume_short_period, SmaSource::Volume).compute(bars);
        let volume_long = Sma::new(cfg.volume_long_period, SmaSource::Volume).compute(bars);
        let raw_volume: Vec<Option<f64>> = bars.iter().map(|b| Some(b.volume as f64)).collect();
        let volume_percentile = percentile_rank(&raw_volume, cfg.percentile_window);

        let indicators = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let band = bands[i];
                IndicatorSet {
                    date: bar.date,
                    rsi: rsi[i],
                    rsi_percentile: rsi_percentile[i],
                    atr: atr[i],
                    atr_percentile: atr_percentile[i],
                    bb_lower: band.map(|b| b.lower),
                    bb_middle: band.map(|b| b.middle),
                    bb_upper: band.map(|b| b.upper),
                    bb_width: band.and_then(|b| b.width_pct()),
                    trend: trend
                        .iter()
                        .map(|(lookback, values)| TrendAverage {
                            lookback: *lookback,
                            value: values[i],
                            distance_pct: values[i]
                                .filter(|avg| *avg != 0.0)
                                .map(|avg| (bar.close - avg) / avg * 100.0),
                        })
                        .collect(),
                    volume_sma_short: volume_short[i],
                    volume_sma_long: volume_long[i],
                    volume_percentile: volume_percentile[i],
                }
            })
            .collect();

        debug!(
            "Annotated {} bars for {} ({} trend averages)",
            bars.len(),
            series.symbol(),
            cfg.trend_periods.len()
        );

        AnnotatedSeries { series, indicators }
    }
}
