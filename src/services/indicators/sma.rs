//! Simple Moving Average (SMA) indicator.

use super::Indicator;
use crate::types::{PriceBar, SignalCategory};

/// Which bar field an SMA averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmaSource {
    Close,
    Volume,
}

/// SMA (Simple Moving Average) indicator.
///
/// Averages the close (trend) or the volume (volume baseline) over a period.
pub struct Sma {
    period: usize,
    source: SmaSource,
    id: String,
    name: String,
}

impl Sma {
    pub fn new(period: usize, source: SmaSource) -> Self {
        let (id, name) = match source {
            SmaSource::Close => (format!("sma_{}", period), format!("SMA ({})", period)),
            SmaSource::Volume => (
                format!("volume_sma_{}", period),
                format!("Volume SMA ({})", period),
            ),
        };
        Self {
            period,
            source,
            id,
            name,
        }
    }
}

impl Indicator for Sma {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> SignalCategory {
        match self.source {
            SmaSource::Close => SignalCategory::Trend,
            SmaSource::Volume => SignalCategory::Volume,
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        let values: Vec<f64> = match self.source {
            SmaSource::Close => bars.iter().map(|b| b.close).collect(),
            SmaSource::Volume => bars.iter().map(|b| b.volume as f64).collect(),
        };
        rolling_mean(&values, self.period)
    }
}

/// Trailing mean over `period` values, `None` until the window is full.
fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out[i] = Some(sum / period as f64);
        }
    }
    out
}
