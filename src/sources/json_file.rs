//! OHLCV cache files on disk.
//!
//! Each symbol lives in `{SYMBOL}_ohlcv.json`: a JSON array of
//! `{date, open, high, low, close, volume}` records. Dates are either plain
//! `YYYY-MM-DD` or full timestamps, in which case only the calendar date is kept.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::SeriesSource;
use crate::error::{AnalysisError, AppError, Result};
use crate::types::{PriceBar, PriceSeries};

/// Raw record as written by the fetcher.
#[derive(Debug, Deserialize)]
struct OhlcvRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Loads series from a directory of `{SYMBOL}_ohlcv.json` files.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cache file for a symbol.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        let safe = symbol.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.dir.join(format!("{}_ohlcv.json", safe))
    }

    /// Parse file contents into a series. Records are ordered by date and a
    /// repeated date keeps the last record.
    pub fn parse(symbol: &str, content: &str) -> Result<PriceSeries> {
        let records: Vec<OhlcvRecord> = serde_json::from_str(content)?;
        let total = records.len();

        let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
        for record in records {
            let date = parse_date(&record.date).ok_or_else(|| {
                AnalysisError::MalformedSeries(format!("unparseable date '{}'", record.date))
            })?;
            if !record.volume.is_finite() || record.volume < 0.0 {
                return Err(
                    AnalysisError::MalformedSeries(format!("negative volume on {}", date)).into(),
                );
            }
            by_date.insert(
                date,
                PriceBar::new(
                    date,
                    record.open,
                    record.high,
                    record.low,
                    record.close,
                    record.volume.round() as u64,
                ),
            );
        }

        if by_date.len() < total {
            warn!(
                "{}: dropped {} duplicate date record(s)",
                symbol,
                total - by_date.len()
            );
        }

        Ok(PriceSeries::new(symbol, by_date.into_values().collect())?)
    }
}

impl SeriesSource for JsonFileSource {
    fn name(&self) -> &'static str {
        "json_file"
    }

    fn load(&self, symbol: &str) -> Result<PriceSeries> {
        let path = self.path_for(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("no price data at {}", path.display())));
            }
            Err(e) => return Err(e.into()),
        };

        let series = Self::parse(symbol, &content)?;
        debug!(
            "Loaded {} bars for {} from {:?}",
            series.len(),
            symbol,
            path
        );
        Ok(series)
    }
}

/// Calendar date of a `YYYY-MM-DD`, RFC 3339 or `YYYY-MM-DD HH:MM:SS` string.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|ts| ts.date())
}
