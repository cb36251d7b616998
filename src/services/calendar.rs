//! Trading-day calendar.
//!
//! Trading days are exactly the dates present in the price series; there is
//! no holiday table. Offsets are index arithmetic over that date list, so
//! `offset(offset(t, n), -n) == t` whenever both calls stay in range.

use chrono::NaiveDate;

use crate::config::WindowConfig;
use crate::error::{AnalysisError, CoreResult};
use crate::types::{EventWindows, PriceSeries};

/// Sorted session dates of one instrument.
#[derive(Debug, Clone)]
pub struct TradingCalendar {
    dates: Vec<NaiveDate>,
}

impl TradingCalendar {
    /// Calendar over the sessions of a series.
    pub fn from_series(series: &PriceSeries) -> Self {
        Self {
            dates: series.dates().collect(),
        }
    }

    /// Calendar over an explicit date list. Dates are sorted and de-duplicated.
    pub fn from_dates(mut dates: Vec<NaiveDate>) -> Self {
        dates.sort_unstable();
        dates.dedup();
        Self { dates }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    /// Index position of a trading day.
    pub fn index_of(&self, date: NaiveDate) -> CoreResult<usize> {
        self.dates
            .binary_search(&date)
            .map_err(|_| AnalysisError::AnchorNotFound(date))
    }

    /// First session on or after `date`, as an index.
    pub fn session_on_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.dates.partition_point(|d| *d < date);
        (idx < self.dates.len()).then_some(idx)
    }

    /// Index `n` sessions away from `anchor`. The anchor must be a trading day.
    pub fn offset_index(&self, anchor: NaiveDate, n: i64) -> CoreResult<usize> {
        let base = self.index_of(anchor)? as i64;
        let target = base + n;
        if target < 0 || target >= self.dates.len() as i64 {
            return Err(AnalysisError::OutOfRange { anchor, offset: n });
        }
        Ok(target as usize)
    }

    /// Date `n` sessions away from `anchor`.
    pub fn offset(&self, anchor: NaiveDate, n: i64) -> CoreResult<NaiveDate> {
        let idx = self.offset_index(anchor, n)?;
        Ok(self.dates[idx])
    }

    /// Signed session count from `from` to `to` (positive when `to` is later).
    pub fn days_between(&self, from: NaiveDate, to: NaiveDate) -> CoreResult<i64> {
        let a = self.index_of(from)? as i64;
        let b = self.index_of(to)? as i64;
        Ok(b - a)
    }

    /// Resolve the observation and accumulation windows around an anchor session.
    ///
    /// Boundaries outside the series resolve to `None` instead of failing, so a
    /// caller can still chart whatever part of the event the data covers.
    pub fn event_windows(
        &self,
        anchor: NaiveDate,
        config: &WindowConfig,
    ) -> CoreResult<EventWindows> {
        self.index_of(anchor)?;
        let at = |n: i64| self.offset(anchor, n).ok();

        Ok(EventWindows {
            anchor,
            observation_start: at(-(config.observation_before as i64)),
            observation_end: at(config.observation_after as i64),
            accumulation_start: at(-(config.accumulation_start as i64)),
            accumulation_end: at(-(config.accumulation_end as i64)),
            pre_event: at(-1),
        })
    }
}
