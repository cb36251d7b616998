//! Fixed-rule trade returns around an earnings event.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

use super::calendar::TradingCalendar;
use crate::types::{PriceRef, PriceSeries, TradeDefinition, TradeReturn};

/// Prices the trade legs are resolved against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPrices {
    pub anchor: NaiveDate,
    pub accumulation_price: f64,
    pub dip_date: NaiveDate,
    pub pre_event_date: NaiveDate,
    pub pre_event_close: f64,
}

pub struct ReturnCalculator<'s> {
    series: &'s PriceSeries,
    calendar: &'s TradingCalendar,
}

impl<'s> ReturnCalculator<'s> {
    pub fn new(series: &'s PriceSeries, calendar: &'s TradingCalendar) -> Self {
        Self { series, calendar }
    }

    /// Date and price of one leg; `(None, None)` past the end of the series.
    pub fn resolve(
        &self,
        price_ref: PriceRef,
        prices: &EventPrices,
    ) -> (Option<NaiveDate>, Option<f64>) {
        match price_ref {
            PriceRef::AccumulationPrice => (Some(prices.dip_date), Some(prices.accumulation_price)),
            PriceRef::PreEventClose => (Some(prices.pre_event_date), Some(prices.pre_event_close)),
            PriceRef::PostEventClose { offset } => {
                match self.calendar.offset_index(prices.anchor, offset as i64) {
                    Ok(idx) => match self.series.get(idx) {
                        Some(bar) => (Some(bar.date), Some(bar.close)),
                        None => (None, None),
                    },
                    Err(_) => (None, None),
                }
            }
        }
    }

    /// Evaluate every trade. A leg outside the series leaves only that trade undefined.
    pub fn calculate(
        &self,
        prices: &EventPrices,
        trades: &[TradeDefinition],
    ) -> BTreeMap<String, TradeReturn> {
        trades
            .iter()
            .map(|trade| {
                let (entry_date, entry_price) = self.resolve(trade.entry, prices);
                let (exit_date, exit_price) = self.resolve(trade.exit, prices);
                let return_pct = match (entry_price, exit_price) {
                    (Some(entry), Some(exit)) => percentage_return(entry, exit),
                    _ => None,
                };
                if return_pct.is_none() {
                    debug!("Trade {} undefined for event {}", trade.name, prices.anchor);
                }

                (
                    trade.name.clone(),
                    TradeReturn {
                        entry: trade.entry,
                        exit: trade.exit,
                        entry_date,
                        entry_price,
                        exit_date,
                        exit_price,
                        return_pct,
                    },
                )
            })
            .collect()
    }
}

/// (exit - entry) / entry * 100; `None` for a non-positive entry.
pub fn percentage_return(entry: f64, exit: f64) -> Option<f64> {
    if entry <= 0.0 || !entry.is_finite() || !exit.is_finite() {
        return None;
    }
    Some((exit - entry) / entry * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceBar;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, c)| {
                PriceBar::new(
                    start + chrono::Duration::days(i as i64),
                    *c,
                    c + 1.0,
                    c - 1.0,
                    *c,
                    100,
                )
            })
            .collect();
        PriceSeries::new("RET", bars).unwrap()
    }

    #[test]
    fn test_percentage_return_exact() {
        assert!((percentage_return(100.0, 110.0).unwrap() - 10.0).abs() < 1e-12);
        assert!((percentage_return(100.0, 90.0).unwrap() + 10.0).abs() < 1e-12);
        assert_eq!(percentage_return(0.0, 90.0), None);
    }

    #[test]
    fn test_post_event_leg_past_series_end() {
        let s = series(&[50.0, 55.0, 60.0, 66.0]);
        let calendar = TradingCalendar::from_series(&s);
        let calc = ReturnCalculator::new(&s, &calendar);
        let prices = EventPrices {
            anchor: s.get(1).unwrap().date,
            accumulation_price: 40.0,
            dip_date: s.get(0).unwrap().date,
            pre_event_date: s.get(0).unwrap().date,
            pre_event_close: 50.0,
        };

        let trades = vec![
            TradeDefinition::new(
                "t2",
                PriceRef::AccumulationPrice,
                PriceRef::PostEventClose { offset: 2 },
            ),
            TradeDefinition::new(
                "t5",
                PriceRef::AccumulationPrice,
                PriceRef::PostEventClose { offset: 5 },
            ),
            TradeDefinition::new(
                "run_up",
                PriceRef::AccumulationPrice,
                PriceRef::PreEventClose,
            ),
        ];
        let returns = calc.calculate(&prices, &trades);

        assert!((returns["t2"].return_pct.unwrap() - 65.0).abs() < 1e-12);
        assert_eq!(returns["t2"].exit_date, s.get(3).map(|b| b.date));
        assert_eq!(returns["t5"].return_pct, None);
        assert_eq!(returns["t5"].exit_price, None);
        assert!((returns["run_up"].return_pct.unwrap() - 25.0).abs() < 1e-12);
    }
}
