//! Earnings Alpha - pre-earnings accumulation dip analysis

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use config::{AnalysisConfig, Config, IndicatorConfig, WindowConfig};
pub use error::{AnalysisError, AppError};
pub use services::{
    analyze, analyze_batch, indicators_for, AnalysisJob, AnnotatedSeries, TradingCalendar,
};
pub use types::*;
