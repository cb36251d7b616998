//! Watchlist file: `[{symbol, instrument_token?, earnings_dates: [...]}]`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

use crate::error::{AppError, Result};
use crate::types::Watchlist;

/// Read and parse a watchlist file.
pub fn load_watchlist(path: impl AsRef<Path>) -> Result<Watchlist> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("watchlist {}", path.display())));
        }
        Err(e) => return Err(e.into()),
    };

    let watchlist: Watchlist = serde_json::from_str(&content)?;
    let events: usize = watchlist.entries.iter().map(|e| e.earnings_dates.len()).sum();
    info!(
        "Loaded watchlist with {} symbols and {} earnings dates",
        watchlist.entries.len(),
        events
    );
    Ok(watchlist)
}
