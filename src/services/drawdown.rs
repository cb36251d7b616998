//! Pre-dip drawdown.
//!
//! The reference high is the highest high from the observation start up to the
//! session before the dip. The window end follows the detected dip rather than
//! a fixed offset.

use chrono::NaiveDate;
use tracing::debug;

use super::calendar::TradingCalendar;
use crate::error::{AnalysisError, CoreResult};
use crate::types::{PriceSeries, ReferenceHigh};

/// Reference high and the drawdown from it to the accumulation price.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawdown {
    pub reference_high: ReferenceHigh,
    /// (reference high - accumulation price) / reference high * 100.
    pub max_drawdown_pct: f64,
}

pub struct DrawdownCalculator<'s> {
    series: &'s PriceSeries,
    calendar: &'s TradingCalendar,
}

impl<'s> DrawdownCalculator<'s> {
    pub fn new(series: &'s PriceSeries, calendar: &'s TradingCalendar) -> Self {
        Self { series, calendar }
    }

    /// Highest high over [T-O, dip-1]. T-O must be inside the series.
    ///
    /// Ties resolve to the earliest session.
    pub fn reference_high(
        &self,
        anchor: NaiveDate,
        observation_before: usize,
        dip_date: NaiveDate,
    ) -> CoreResult<ReferenceHigh> {
        let start = self
            .calendar
            .offset_index(anchor, -(observation_before as i64))?;
        let dip = self.calendar.index_of(dip_date)?;

        if dip <= start {
            return Err(AnalysisError::InsufficientWindow(format!(
                "no sessions between observation start and dip {}",
                dip_date
            )));
        }

        let mut best: Option<ReferenceHigh> = None;
        for bar in self.series.bars().get(start..dip).unwrap_or_default() {
            if best.as_ref().map_or(true, |b| bar.high > b.price) {
                best = Some(ReferenceHigh {
                    price: bar.high,
                    date: bar.date,
                });
            }
        }

        best.ok_or_else(|| {
            AnalysisError::InsufficientWindow(format!(
                "reference window before {} is empty",
                dip_date
            ))
        })
    }

    /// Reference high plus the percentage drawdown to `accumulation_price`.
    pub fn calculate(
        &self,
        anchor: NaiveDate,
        observation_before: usize,
        dip_date: NaiveDate,
        accumulation_price: f64,
    ) -> CoreResult<Drawdown> {
        let reference_high = self.reference_high(anchor, observation_before, dip_date)?;
        let max_drawdown_pct = drawdown_pct(reference_high.price, accumulation_price)
            .ok_or_else(|| {
                AnalysisError::InsufficientWindow(format!(
                    "reference high on {} is not positive",
                    reference_high.date
                ))
            })?;

        debug!(
            "Reference high {} on {}, drawdown {:.2}%",
            reference_high.price, reference_high.date, max_drawdown_pct
        );

        Ok(Drawdown {
            reference_high,
            max_drawdown_pct,
        })
    }
}

/// Percentage drop from `high` to `low`; `None` when `high` is not positive.
pub fn drawdown_pct(high: f64, low: f64) -> Option<f64> {
    if high <= 0.0 {
        return None;
    }
    Some((high - low) / high * 100.0)
}
