//! Average True Range (ATR) indicator.

use super::Indicator;
use crate::types::{PriceBar, SignalCategory};

/// ATR (Average True Range) indicator.
///
/// Measures market volatility by averaging true ranges:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// Seeded with the simple average of the first `period` true ranges, then
/// Wilder-smoothed. Reported in price units.
pub struct Atr {
    period: usize,
    name: String,
}

impl Default for Atr {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("ATR ({})", period),
        }
    }
}

impl Indicator for Atr {
    fn id(&self) -> &str {
        "atr"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Volatility
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        let mut out = vec![None; bars.len()];
        if self.period == 0 || bars.len() < self.min_periods() {
            return out;
        }

        // true_ranges[k] belongs to bar k + 1
        let true_ranges: Vec<f64> = bars
            .windows(2)
            .map(|pair| pair[1].true_range(&pair[0]))
            .collect();

        let period = self.period as f64;
        let mut atr = true_ranges.iter().take(self.period).sum::<f64>() / period;
        out[self.period] = Some(atr);

        for (k, tr) in true_ranges.iter().enumerate().skip(self.period) {
            atr = (atr * (period - 1.0) + tr) / period;
            out[k + 1] = Some(atr);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_uptrend_candles(count: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..count)
            .map(|i| {
                let base = 100.0 + i as f64 * 1.5;
                PriceBar {
                    date: start + chrono::Duration::days(i as i64),
                    open: base,
                    high: base + 2.0,
                    low: base - 1.0,
                    close: base + 1.0,
                    volume: 1000,
                }
            })
            .collect()
    }

    #[test]
    fn test_atr_id_and_name() {
        let atr = Atr::default();
        assert_eq!(atr.id(), "atr");
        assert_eq!(atr.name(), "ATR (14)");
        assert_eq!(atr.category(), SignalCategory::Volatility);
    }

    #[test]
    fn test_atr_min_periods() {
        assert_eq!(Atr::default().min_periods(), 15);
    }

    #[test]
    fn test_atr_insufficient_data() {
        let out = Atr::default().compute(&create_uptrend_candles(10));
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_atr_constant_range() {
        // Each bar: high - low = 3, |high - prev close| = 2.5, |low - prev close| = 0.5
        let out = Atr::new(5).compute(&create_uptrend_candles(30));
        assert!(out[4].is_none());
        for v in out.iter().skip(5) {
            let atr = v.unwrap();
            assert!((atr - 3.0).abs() < 1e-9, "expected 3.0, got {}", atr);
        }
    }

    #[test]
    fn test_atr_gap_uses_previous_close() {
        let mut candles = create_uptrend_candles(3);
        candles[2].high = candles[1].close + 20.0;
        candles[2].low = candles[1].close + 18.0;
        let out = Atr::new(1).compute(&candles);
        assert_eq!(out[2], Some(20.0));
    }
}
