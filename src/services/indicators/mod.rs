//! Technical indicator implementations.
//!
//! Every indicator produces one value per bar, aligned with the input. A value
//! at index `i` depends only on bars `0..=i`, and is `None` until the lookback
//! is covered.

pub mod atr;
pub mod bollinger;
pub mod percentile;
pub mod rsi;
pub mod sma;

pub use atr::Atr;
pub use bollinger::{Band, BollingerBands};
pub use percentile::percentile_rank;
pub use rsi::Rsi;
pub use sma::{Sma, SmaSource};

use crate::types::{PriceBar, SignalCategory};

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Category this indicator belongs to.
    fn category(&self) -> SignalCategory;

    /// Minimum number of bars required before the first defined value.
    fn min_periods(&self) -> usize;

    /// Compute the indicator over the whole history.
    fn compute(&self, bars: &[PriceBar]) -> Vec<Option<f64>>;
}
