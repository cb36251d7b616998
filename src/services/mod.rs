pub mod accumulation;
pub mod analyzer;
pub mod calendar;
pub mod drawdown;
pub mod engine;
pub mod indicators;
pub mod returns;

pub use accumulation::{AccumulationDetector, AccumulationZone, VolumeBaseline};
pub use analyzer::{analyze, analyze_batch, indicators_for, AnalysisJob};
pub use calendar::TradingCalendar;
pub use drawdown::{drawdown_pct, Drawdown, DrawdownCalculator};
pub use engine::{AnnotatedSeries, IndicatorEngine};
pub use returns::{percentage_return, EventPrices, ReturnCalculator};
