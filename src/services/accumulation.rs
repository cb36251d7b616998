//! Accumulation detector.
//!
//! Finds the lowest low in the accumulation window [T-A, T-B] and every session
//! that touched it, then attaches relative volume against a baseline frozen
//! before the window opens.
//!
//! The baseline is the volume SMA over the sessions strictly before T-(A+1), so
//! nothing inside or after the accumulation window, and not the T-(A+1) session
//! itself, can move it. All accumulation days of an event share it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::calendar::TradingCalendar;
use super::engine::AnnotatedSeries;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, CoreResult};
use crate::types::{AccumulationDay, MomentumState, MomentumZone};

/// Volume baseline shared by every accumulation day of one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeBaseline {
    /// Last session included in the baseline averages.
    pub last_session: Option<NaiveDate>,
    pub short: Option<f64>,
    pub long: Option<f64>,
}

impl VolumeBaseline {
    fn ratio(volume: u64, baseline: Option<f64>) -> Option<f64> {
        baseline
            .filter(|b| *b > 0.0)
            .map(|b| volume as f64 / b)
    }
}

/// Output of the detector for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulationZone {
    /// Minimum low of the window.
    pub price: f64,
    /// Every session at that low, chronological.
    pub days: Vec<AccumulationDay>,
    pub baseline: VolumeBaseline,
}

impl AccumulationZone {
    /// Earliest accumulation day (the dip date).
    pub fn dip_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }
}

pub struct AccumulationDetector<'c> {
    config: &'c AnalysisConfig,
}

impl<'c> AccumulationDetector<'c> {
    pub fn new(config: &'c AnalysisConfig) -> Self {
        Self { config }
    }

    /// Frozen volume baseline for an anchor at index `anchor_idx`.
    pub fn baseline(&self, annotated: &AnnotatedSeries<'_>, anchor_idx: usize) -> VolumeBaseline {
        // the baseline excludes T-(A+1), so its last session is T-(A+2)
        let gap = self.config.windows.accumulation_start + 2;
        let Some(idx) = anchor_idx.checked_sub(gap) else {
            return VolumeBaseline {
                last_session: None,
                short: None,
                long: None,
            };
        };

        match annotated.row(idx) {
            Some((bar, set)) => VolumeBaseline {
                last_session: Some(bar.date),
                short: set.volume_sma_short,
                long: set.volume_sma_long,
            },
            None => VolumeBaseline {
                last_session: None,
                short: None,
                long: None,
            },
        }
    }

    /// Detect the accumulation zone around `anchor`.
    pub fn detect(
        &self,
        annotated: &AnnotatedSeries<'_>,
        calendar: &TradingCalendar,
        anchor: NaiveDate,
    ) -> CoreResult<AccumulationZone> {
        let windows = &self.config.windows;
        let t = calendar.index_of(anchor)?;

        // both bounds must exist; a window cut short by the series start is not analysed
        let start = calendar.offset_index(anchor, -(windows.accumulation_start as i64))?;
        let end = calendar.offset_index(anchor, -(windows.accumulation_end as i64))?;
        if start > end {
            return Err(AnalysisError::InvalidConfig(format!(
                "accumulation window T-{}..T-{} is empty",
                windows.accumulation_start, windows.accumulation_end
            )));
        }

        let price = annotated
            .bars()
            .get(start..=end)
            .unwrap_or_default()
            .iter()
            .map(|b| b.low)
            .fold(f64::INFINITY, f64::min);
        if !price.is_finite() {
            return Err(AnalysisError::InsufficientWindow(format!(
                "accumulation window before {} is empty",
                anchor
            )));
        }

        let baseline = self.baseline(annotated, t);
        let mut days = Vec::new();

        for idx in start..=end {
            let Some((bar, set)) = annotated.row(idx) else {
                continue;
            };
            if bar.low != price {
                continue;
            }

            let rvol_short = VolumeBaseline::ratio(bar.volume, baseline.short);
            let rvol_long = VolumeBaseline::ratio(bar.volume, baseline.long);
            // must both exceed the threshold and sit at the window low
            let high_probability =
                rvol_long.is_some_and(|r| r > self.config.rvol_threshold) && bar.low == price;

            days.push(AccumulationDay {
                date: bar.date,
                low: bar.low,
                volume: bar.volume,
                rvol_short,
                rvol_long,
                rsi: set.rsi,
                rsi_percentile: set.rsi_percentile,
                momentum_state: set.rsi.map(MomentumState::from_rsi),
                momentum_zone: set.rsi_percentile.map(MomentumZone::from_percentile),
                days_before_earnings: calendar.days_between(bar.date, anchor)?,
                high_probability,
            });
        }

        debug!(
            "Accumulation for {} at {}: {} day(s), baseline short={:?} long={:?}",
            anchor,
            price,
            days.len(),
            baseline.short,
            baseline.long
        );

        Ok(AccumulationZone {
            price,
            days,
            baseline,
        })
    }
}
