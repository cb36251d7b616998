//! Trailing historical percentile rank.
//!
//! For each index `i` the window is the last `window` values ending at `i`,
//! clipped to the available history. The rank is the position of the current
//! value between the window's min and max, scaled to 0-100.

use std::collections::VecDeque;

/// Rank each value within its trailing window.
///
/// - current value undefined -> `None`
/// - fewer than 2 defined values in the window -> `None`
/// - window max == min -> exactly `50.0`
///
/// Min and max are tracked with monotonic deques, so the whole pass is O(n).
pub fn percentile_rank(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }

    // (index, value), values increasing front to back
    let mut min_q: VecDeque<(usize, f64)> = VecDeque::new();
    // (index, value), values decreasing front to back
    let mut max_q: VecDeque<(usize, f64)> = VecDeque::new();
    let mut defined_in_window = 0usize;

    for (i, raw) in values.iter().enumerate() {
        if i >= window && defined(values[i - window]).is_some() {
            defined_in_window -= 1;
        }
        while min_q.front().is_some_and(|(idx, _)| idx + window <= i) {
            min_q.pop_front();
        }
        while max_q.front().is_some_and(|(idx, _)| idx + window <= i) {
            max_q.pop_front();
        }

        let Some(current) = defined(*raw) else {
            continue;
        };

        defined_in_window += 1;
        while min_q.back().is_some_and(|(_, v)| *v >= current) {
            min_q.pop_back();
        }
        min_q.push_back((i, current));
        while max_q.back().is_some_and(|(_, v)| *v <= current) {
            max_q.pop_back();
        }
        max_q.push_back((i, current));

        if defined_in_window < 2 {
            continue;
        }

        let (Some(&(_, min)), Some(&(_, max))) = (min_q.front(), max_q.front()) else {
            continue;
        };
        out[i] = Some(if max == min {
            50.0
        } else {
            ((current - min) / (max - min) * 100.0).clamp(0.0, 100.0)
        });
    }

    out
}

fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
