use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, CoreResult};

/// One daily trading session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// True range against the previous session's close.
    ///
    /// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
    pub fn true_range(&self, previous: &PriceBar) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - previous.close).abs();
        let lc = (self.low - previous.close).abs();
        hl.max(hc).max(lc)
    }
}

/// Daily history for one instrument, strictly ascending by date.
///
/// The series is validated once on construction and never mutated afterwards;
/// every derived column lives alongside it in an annotated series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, rejecting empty input, unordered or duplicate dates,
    /// and non-positive prices.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> CoreResult<Self> {
        if bars.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }

        for (i, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
                return Err(AnalysisError::MalformedSeries(format!(
                    "non-positive price on {}",
                    bar.date
                )));
            }
            if i > 0 && bars[i - 1].date >= bar.date {
                return Err(AnalysisError::MalformedSeries(format!(
                    "dates not strictly ascending at {}",
                    bar.date
                )));
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PriceBar> {
        self.bars.get(index)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }
}
