//! Read-only adapters that hand materialized data to the analysis core.

pub mod json_file;
pub mod watchlist;

pub use json_file::JsonFileSource;
pub use watchlist::load_watchlist;

use crate::error::Result;
use crate::types::PriceSeries;

/// Something that can produce a validated price series for a symbol.
pub trait SeriesSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Load the full daily history of `symbol`.
    fn load(&self, symbol: &str) -> Result<PriceSeries>;
}
