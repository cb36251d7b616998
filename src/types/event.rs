use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// An earnings announcement for one instrument (the anchor date T).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsEvent {
    pub symbol: String,
    pub date: NaiveDate,
}

impl EarningsEvent {
    pub fn new(symbol: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            date,
        }
    }

    /// Fiscal quarter label on an April-March fiscal year.
    ///
    /// Q1: Apr-Jun, Q2: Jul-Sep, Q3: Oct-Dec, Q4: Jan-Mar.
    /// The fiscal year is named after the calendar year in which it ends.
    pub fn quarter_label(&self) -> String {
        let year = self.date.year();
        let (quarter, fiscal_year) = match self.date.month() {
            4..=6 => ("Q1", year + 1),
            7..=9 => ("Q2", year + 1),
            10..=12 => ("Q3", year + 1),
            _ => ("Q4", year),
        };
        format!("{} FY{:02}", quarter, fiscal_year.rem_euclid(100))
    }
}

/// Window boundaries of one event, resolved against the trading calendar.
///
/// Dates the series does not reach stay `None`; the windows that an analysis
/// cannot proceed without are checked by the components that consume them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWindows {
    /// The session the event is anchored on (first session on or after the announcement).
    pub anchor: NaiveDate,
    pub observation_start: Option<NaiveDate>,
    pub observation_end: Option<NaiveDate>,
    pub accumulation_start: Option<NaiveDate>,
    pub accumulation_end: Option<NaiveDate>,
    pub pre_event: Option<NaiveDate>,
}
