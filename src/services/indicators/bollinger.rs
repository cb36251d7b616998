//! Bollinger Bands indicator.

use serde::{Deserialize, Serialize};

use crate::types::PriceBar;

/// Band values for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lower: f64,
    pub middle: f64,
    pub upper: f64,
}

impl Band {
    /// (upper - lower) / middle * 100. `None` for a zero middle band.
    pub fn width_pct(&self) -> Option<f64> {
        if self.middle == 0.0 {
            return None;
        }
        Some((self.upper - self.lower) / self.middle * 100.0)
    }
}

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(period) of close
/// - Upper band: SMA + k * StdDev
/// - Lower band: SMA - k * StdDev
///
/// Uses the population standard deviation of the trailing closes.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Calculate standard deviation.
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        variance.sqrt()
    }

    /// Bands for every bar, `None` until `period` closes are available.
    pub fn bands(&self, bars: &[PriceBar]) -> Vec<Option<Band>> {
        let mut out = vec![None; bars.len()];
        if self.period == 0 || bars.len() < self.period {
            return out;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        for (end, window) in closes.windows(self.period).enumerate() {
            let middle = window.iter().sum::<f64>() / self.period as f64;
            let std_dev = Self::std_dev(window, middle);
            out[end + self.period - 1] = Some(Band {
                lower: middle - self.std_dev_multiplier * std_dev,
                middle,
                upper: middle + self.std_dev_multiplier * std_dev,
            });
        }
        out
    }
}
