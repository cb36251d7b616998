use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EarningsEvent;

/// One instrument and its configured earnings dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument_token: Option<u64>,
    #[serde(default)]
    pub earnings_dates: Vec<NaiveDate>,
}

impl WatchlistEntry {
    /// Earnings events for this instrument, most recent first.
    pub fn events(&self) -> Vec<EarningsEvent> {
        let mut dates = self.earnings_dates.clone();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();
        dates
            .into_iter()
            .map(|d| EarningsEvent::new(self.symbol.clone(), d))
            .collect()
    }
}

/// Instruments under analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist {
    pub entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.symbol.as_str()).collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&WatchlistEntry> {
        self.entries
            .iter()
            .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
    }
}
