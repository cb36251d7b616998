//! Per-event analysis pipeline.
//!
//! `analyze` wires the calendar, indicator engine, accumulation detector,
//! drawdown and return calculators together for one (instrument, event) pair.
//! Every call is a pure function of its inputs, so batches fan out over the
//! blocking pool without coordination.

use std::sync::Arc;
use tracing::{debug, warn};

use super::accumulation::AccumulationDetector;
use super::calendar::TradingCalendar;
use super::drawdown::DrawdownCalculator;
use super::engine::{AnnotatedSeries, IndicatorEngine};
use super::returns::{EventPrices, ReturnCalculator};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, CoreResult};
use crate::types::{AnalysisResult, BatchOutcome, EarningsEvent, PriceSeries};

/// Analyze one earnings event against a price series.
pub fn analyze(
    series: &PriceSeries,
    event: &EarningsEvent,
    config: &AnalysisConfig,
) -> CoreResult<AnalysisResult> {
    config.validate()?;

    let calendar = TradingCalendar::from_series(series);
    let anchor = calendar
        .session_on_or_after(event.date)
        .and_then(|idx| calendar.date_at(idx))
        .ok_or(AnalysisError::AnchorNotFound(event.date))?;
    if anchor != event.date {
        debug!(
            "{}: announcement {} snapped to session {}",
            series.symbol(),
            event.date,
            anchor
        );
    }

    let windows = calendar.event_windows(anchor, &config.windows)?;
    let pre_event_idx = calendar.offset_index(anchor, -1)?;
    let pre_event = series
        .get(pre_event_idx)
        .ok_or(AnalysisError::OutOfRange { anchor, offset: -1 })?;

    let annotated = indicators_for(series, config);
    let zone = AccumulationDetector::new(config).detect(&annotated, &calendar, anchor)?;
    let dip_date = zone.dip_date().ok_or_else(|| {
        AnalysisError::InsufficientWindow(format!("no accumulation day before {}", anchor))
    })?;

    let drawdown = DrawdownCalculator::new(series, &calendar).calculate(
        anchor,
        config.windows.observation_before,
        dip_date,
        zone.price,
    )?;

    let prices = EventPrices {
        anchor,
        accumulation_price: zone.price,
        dip_date,
        pre_event_date: pre_event.date,
        pre_event_close: pre_event.close,
    };
    let returns =
        ReturnCalculator::new(series, &calendar).calculate(&prices, &config.trade_definitions());

    debug!(
        "{} {}: accumulation {} on {} ({} day(s)), drawdown {:.2}%",
        series.symbol(),
        anchor,
        zone.price,
        dip_date,
        zone.days.len(),
        drawdown.max_drawdown_pct
    );

    Ok(AnalysisResult {
        symbol: series.symbol().to_string(),
        earnings_date: event.date,
        quarter: event.quarter_label(),
        windows,
        accumulation_price: zone.price,
        accumulation_days: zone.days,
        reference_high: drawdown.reference_high,
        max_drawdown_pct: drawdown.max_drawdown_pct,
        returns,
    })
}

/// Indicator columns for a series, independent of any event.
pub fn indicators_for<'a>(
    series: &'a PriceSeries,
    config: &AnalysisConfig,
) -> AnnotatedSeries<'a> {
    IndicatorEngine::new(config.indicators.clone()).annotate(series)
}

/// One unit of batch work.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub series: Arc<PriceSeries>,
    pub event: EarningsEvent,
}

impl AnalysisJob {
    pub fn new(series: Arc<PriceSeries>, event: EarningsEvent) -> Self {
        Self { series, event }
    }
}

/// Run independent analyses concurrently. Outcomes come back in job order and
/// a failing job only marks its own outcome.
pub async fn analyze_batch(
    jobs: Vec<AnalysisJob>,
    config: Arc<AnalysisConfig>,
) -> Vec<BatchOutcome> {
    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let config = Arc::clone(&config);
            let symbol = job.series.symbol().to_string();
            let earnings_date = job.event.date;
            let handle =
                tokio::task::spawn_blocking(move || analyze(&job.series, &job.event, &config));
            (symbol, earnings_date, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (symbol, earnings_date, handle) in handles {
        let outcome = match handle.await {
            Ok(Ok(result)) => BatchOutcome {
                symbol,
                earnings_date,
                result: Some(result),
                error: None,
            },
            Ok(Err(e)) => {
                warn!("{} {}: {}", symbol, earnings_date, e);
                BatchOutcome {
                    symbol,
                    earnings_date,
                    result: None,
                    error: Some(e.to_string()),
                }
            }
            Err(e) => {
                warn!("{} {}: analysis task failed: {}", symbol, earnings_date, e);
                BatchOutcome {
                    symbol,
                    earnings_date,
                    result: None,
                    error: Some(format!("analysis task failed: {}", e)),
                }
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}
