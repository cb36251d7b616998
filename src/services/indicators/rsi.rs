//! Relative Strength Index (RSI) indicator.

use super::Indicator;
use crate::types::{PriceBar, SignalCategory};

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses,
/// using Wilder's smoothing seeded with a simple average of the first `period`
/// changes. Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
    name: String,
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("RSI ({})", period),
        }
    }

    fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_loss == 0.0 {
            // Flat window has no direction.
            return if avg_gain == 0.0 { 50.0 } else { 100.0 };
        }
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

impl Indicator for Rsi {
    fn id(&self) -> &str {
        "rsi"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        let mut out = vec![None; bars.len()];
        if self.period == 0 || bars.len() < self.min_periods() {
            return out;
        }

        let mut gains = Vec::with_capacity(bars.len() - 1);
        let mut losses = Vec::with_capacity(bars.len() - 1);
        for pair in bars.windows(2) {
            let change = pair[1].close - pair[0].close;
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        let period = self.period as f64;
        let mut avg_gain = gains.iter().take(self.period).sum::<f64>() / period;
        let mut avg_loss = losses.iter().take(self.period).sum::<f64>() / period;
        // change k ends at bar k + 1
        out[self.period] = Some(Self::rsi_from_averages(avg_gain, avg_loss));

        for k in self.period..gains.len() {
            avg_gain = (avg_gain * (period - 1.0) + gains[k]) / period;
            avg_loss = (avg_loss * (period - 1.0) + losses[k]) / period;
            out[k + 1] = Some(Self::rsi_from_averages(avg_gain, avg_loss));
        }

        out
    }
}
