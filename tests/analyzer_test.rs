//! End-to-end analysis tests over synthetic series

use chrono::NaiveDate;
use earnings_alpha::services::{analyze, analyze_batch, indicators_for, AnalysisJob};
use earnings_alpha::{AnalysisConfig, AnalysisError, EarningsEvent, PriceBar, PriceSeries};
use std::sync::Arc;

const T: usize = 30;

fn config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.indicators.rsi_period = 5;
    config.indicators.atr_period = 5;
    config.indicators.bollinger_period = 5;
    config.indicators.trend_periods = vec![5, 10];
    config.indicators.volume_short_period = 5;
    config.indicators.volume_long_period = 10;
    config.indicators.percentile_window = 20;
    config
}

fn date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap() + chrono::Duration::days(i as i64)
}

/// Flat bars: close 100, high 101, low 99, volume 1000 before the
/// accumulation window opens and 5000 from T-(A+1) on.
fn base_bars(count: usize) -> Vec<PriceBar> {
    (0..count)
        .map(|i| {
            let volume = if i + 11 >= T { 5_000 } else { 1_000 };
            PriceBar::new(date(i), 100.0, 101.0, 99.0, 100.0, volume)
        })
        .collect()
}

/// Single dip at T-5 with double the baseline volume and a peak at index 15.
fn single_dip_bars(count: usize) -> Vec<PriceBar> {
    let mut bars = base_bars(count);
    bars[T - 5].low = 90.0;
    bars[T - 5].volume = 2_000;
    bars[15].high = 120.0;
    // outside the reference window: before T-20 and after the dip
    bars[5].high = 150.0;
    bars[T - 4].high = 130.0;
    bars
}

fn event() -> EarningsEvent {
    EarningsEvent::new("SYN", date(T))
}

#[test]
fn test_single_dip_scenario() {
    let series = PriceSeries::new("SYN", single_dip_bars(40)).unwrap();
    let result = analyze(&series, &event(), &config()).unwrap();

    assert_eq!(result.accumulation_days.len(), 1);
    let day = &result.accumulation_days[0];
    assert_eq!(day.date, date(T - 5));
    assert_eq!(day.low, result.accumulation_price);
    assert_eq!(result.accumulation_price, 90.0);
    assert!((day.rvol_long.unwrap() - 2.0).abs() < 1e-12);
    assert!(day.high_probability);
    assert_eq!(day.days_before_earnings, 5);

    assert_eq!(result.reference_high.price, 120.0);
    assert_eq!(result.reference_high.date, date(15));
    assert!((result.max_drawdown_pct - 25.0).abs() < 1e-12);
}

#[test]
fn test_tied_minimum_keeps_both_days() {
    let mut bars = base_bars(40);
    bars[T - 8].low = 90.0;
    bars[T - 8].volume = 3_000;
    bars[T - 4].low = 90.0;
    bars[T - 4].volume = 1_000;
    let series = PriceSeries::new("SYN", bars).unwrap();

    let result = analyze(&series, &event(), &config()).unwrap();

    assert_eq!(result.accumulation_days.len(), 2);
    let (first, second) = (&result.accumulation_days[0], &result.accumulation_days[1]);
    assert_eq!(first.date, date(T - 8));
    assert_eq!(second.date, date(T - 4));
    assert_eq!(first.low, second.low);
    assert!((first.rvol_long.unwrap() - 3.0).abs() < 1e-12);
    assert!((second.rvol_long.unwrap() - 1.0).abs() < 1e-12);
    assert!(first.high_probability);
    assert!(!second.high_probability);

    // the earliest tie drives the drawdown window
    assert_eq!(result.dip_date(), Some(date(T - 8)));
    assert!(result.reference_high.date < date(T - 8));
}

#[test]
fn test_series_ending_at_t_plus_10() {
    let series = PriceSeries::new("SYN", single_dip_bars(T + 11)).unwrap();
    let result = analyze(&series, &event(), &config()).unwrap();

    assert!(result.return_pct("profit_t2").is_some());
    assert!(result.return_pct("profit_t10").is_some());
    assert_eq!(result.return_pct("profit_t20"), None);
    assert!(result.returns["profit_t20"].exit_date.is_none());

    assert!(result.return_pct("run_up").is_some());
    assert!(result.return_pct("event").is_some());
    assert_eq!(result.accumulation_days.len(), 1);
    assert_eq!(result.windows.observation_end, None);
}

#[test]
fn test_return_values() {
    let mut bars = single_dip_bars(40);
    bars[T - 1].close = 99.0;
    bars[T + 2].close = 108.0;
    let series = PriceSeries::new("SYN", bars).unwrap();
    let result = analyze(&series, &event(), &config()).unwrap();

    // 90 -> 99
    assert!((result.return_pct("run_up").unwrap() - 10.0).abs() < 1e-9);
    // 99 -> 108
    assert!((result.return_pct("event").unwrap() - 100.0 / 11.0).abs() < 1e-9);
    // 90 -> 108
    assert!((result.return_pct("profit_t2").unwrap() - 20.0).abs() < 1e-9);
}

#[test]
fn test_baseline_ignores_volume_from_window_onward() {
    let quiet = PriceSeries::new("SYN", single_dip_bars(40)).unwrap();

    let mut loud_bars = single_dip_bars(40);
    for (i, bar) in loud_bars.iter_mut().enumerate() {
        if i + 11 >= T && i != T - 5 {
            bar.volume = 90_000;
        }
    }
    let loud = PriceSeries::new("SYN", loud_bars).unwrap();

    let a = analyze(&quiet, &event(), &config()).unwrap();
    let b = analyze(&loud, &event(), &config()).unwrap();

    assert_eq!(a.accumulation_days[0].rvol_long, b.accumulation_days[0].rvol_long);
    assert_eq!(a.accumulation_days[0].rvol_short, b.accumulation_days[0].rvol_short);
}

#[test]
fn test_drawdown_matches_reported_fields() {
    let series = PriceSeries::new(
        "WAVE",
        (0..120)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.4).sin() * 8.0;
                PriceBar::new(date(i), c, c + 3.0, c - 3.0, c, 1_000 + (i as u64 % 9) * 250)
            })
            .collect(),
    )
    .unwrap();

    for t in (40..100).step_by(7) {
        let event = EarningsEvent::new("WAVE", date(t));
        let result = analyze(&series, &event, &config()).unwrap();
        let high = result.reference_high.price;
        let expected = (high - result.accumulation_price) / high * 100.0;

        assert!((result.max_drawdown_pct - expected).abs() < 1e-9);
        assert!(result.max_drawdown_pct >= 0.0);
        assert!(result.reference_high.date < result.dip_date().unwrap());
        for day in &result.accumulation_days {
            assert_eq!(day.low, result.accumulation_price);
        }
    }
}

#[test]
fn test_anchor_on_first_session_is_out_of_range() {
    let series = PriceSeries::new("SYN", base_bars(40)).unwrap();
    let result = analyze(&series, &EarningsEvent::new("SYN", date(0)), &config());
    assert!(matches!(result, Err(AnalysisError::OutOfRange { offset: -1, .. })));
}

#[test]
fn test_accumulation_start_before_series_is_out_of_range() {
    let series = PriceSeries::new("SYN", base_bars(40)).unwrap();
    let result = analyze(&series, &EarningsEvent::new("SYN", date(6)), &config());
    assert!(matches!(
        result,
        Err(AnalysisError::OutOfRange { offset: -10, .. })
    ));

    // anchor before T-B as well
    let result = analyze(&series, &EarningsEvent::new("SYN", date(1)), &config());
    assert!(matches!(
        result,
        Err(AnalysisError::OutOfRange { offset: -10, .. })
    ));
}

#[test]
fn test_observation_start_before_series_is_out_of_range() {
    let mut bars = base_bars(40);
    bars[12].low = 90.0;
    let series = PriceSeries::new("SYN", bars).unwrap();

    let result = analyze(&series, &EarningsEvent::new("SYN", date(15)), &config());
    assert!(matches!(
        result,
        Err(AnalysisError::OutOfRange { offset: -20, .. })
    ));
}

#[test]
fn test_successful_result_has_both_window_starts() {
    let series = PriceSeries::new("SYN", base_bars(40)).unwrap();
    for t in [20, 25, 39] {
        let result = analyze(&series, &EarningsEvent::new("SYN", date(t)), &config()).unwrap();
        assert_eq!(result.windows.observation_start, Some(date(t - 20)));
        assert_eq!(result.windows.accumulation_start, Some(date(t - 10)));
    }
}

#[test]
fn test_dip_on_observation_start() {
    // with O == A the dip can land on T-O, leaving no session before it
    let mut bars = base_bars(40);
    bars[2].low = 80.0;
    let series = PriceSeries::new("SYN", bars).unwrap();
    let mut config = config();
    config.windows.observation_before = 10;

    let result = analyze(&series, &EarningsEvent::new("SYN", date(12)), &config);
    assert!(matches!(result, Err(AnalysisError::InsufficientWindow(_))));
}

#[test]
fn test_result_serializes() {
    let series = PriceSeries::new("SYN", single_dip_bars(40)).unwrap();
    let result = analyze(&series, &event(), &config()).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["symbol"], "SYN");
    assert_eq!(json["accumulationPrice"], 90.0);
    assert_eq!(json["quarter"], "Q2 FY25");
    assert!(json["returns"]["profit_t20"]["returnPct"].is_null());
}

#[test]
fn test_indicators_for_is_event_free() {
    let series = PriceSeries::new("SYN", single_dip_bars(40)).unwrap();
    let annotated = indicators_for(&series, &config());
    assert_eq!(annotated.len(), series.len());
    assert!(annotated.indicators()[39].volume_sma_long.is_some());
}

#[tokio::test]
async fn test_batch_isolates_failures() {
    let good = Arc::new(PriceSeries::new("SYN", single_dip_bars(40)).unwrap());
    let jobs = vec![
        AnalysisJob::new(Arc::clone(&good), event()),
        AnalysisJob::new(Arc::clone(&good), EarningsEvent::new("SYN", date(0))),
        AnalysisJob::new(Arc::clone(&good), EarningsEvent::new("SYN", date(T + 1))),
    ];

    let outcomes = analyze_batch(jobs, Arc::new(config())).await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_ok());
    assert!(!outcomes[1].is_ok());
    assert!(outcomes[1].error.is_some());
    assert_eq!(outcomes[1].earnings_date, date(0));
    assert!(outcomes[2].is_ok());
}

#[test]
fn test_batch_matches_sequential() {
    let series = Arc::new(PriceSeries::new("SYN", single_dip_bars(40)).unwrap());
    let config = Arc::new(config());
    let jobs = vec![AnalysisJob::new(Arc::clone(&series), event())];
    let outcomes = tokio_test::block_on(analyze_batch(jobs, Arc::clone(&config)));

    let direct = analyze(&series, &event(), &config).unwrap();
    assert_eq!(outcomes[0].result.as_ref(), Some(&direct));
}
