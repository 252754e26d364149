//! Turning-point detection.
//!
//! The primary detector is a percentage-reversal zigzag filter; when it
//! yields too few pivots (quiet markets, short series) the analyzer falls
//! back to strict local extrema over a symmetric window.

use itertools::Itertools;

/// Reduces a price sequence to the indices of its trend reversals.
///
/// Walks the series keeping a running extreme for the current trend
/// direction (initially up). A move beyond the extreme updates it; a move of
/// at least `threshold` (fractional, 0.03 = 3%) against it emits the
/// extreme's index as a pivot and flips direction. Index 0 is always the
/// first pivot and the final running extreme is appended if not already
/// last, so a monotone series yields exactly {0, last} and a flat one {0}.
///
/// Output indices are strictly increasing and alternate between local highs
/// and lows by construction.
pub fn zigzag(prices: &[f64], threshold: f64) -> Vec<usize> {
    if prices.is_empty() {
        return Vec::new();
    }

    let mut up_trend = true;
    let mut last_extreme = prices[0];
    let mut last_extreme_idx = 0usize;
    let mut turning_points = vec![0usize];

    for (i, &price) in prices.iter().enumerate().skip(1) {
        if up_trend {
            if price > last_extreme {
                last_extreme = price;
                last_extreme_idx = i;
            } else if price < last_extreme * (1.0 - threshold) {
                // Reversal: record the high we fell from, start tracking a low
                if turning_points.last() != Some(&last_extreme_idx) {
                    turning_points.push(last_extreme_idx);
                }
                up_trend = false;
                last_extreme = price;
                last_extreme_idx = i;
            }
        } else if price < last_extreme {
            last_extreme = price;
            last_extreme_idx = i;
        } else if price > last_extreme * (1.0 + threshold) {
            if turning_points.last() != Some(&last_extreme_idx) {
                turning_points.push(last_extreme_idx);
            }
            up_trend = true;
            last_extreme = price;
            last_extreme_idx = i;
        }
    }

    if turning_points.last() != Some(&last_extreme_idx) {
        turning_points.push(last_extreme_idx);
    }

    turning_points
}

/// Strict local maxima and minima over a symmetric window, merged sorted.
///
/// A point qualifies when it strictly beats every neighbour within `window`
/// points on each side (clamped at the boundaries); the first and last index
/// never qualify. Both extrema streams are already sorted, so an ordered
/// merge yields the combined pivot list.
pub fn local_extrema(prices: &[f64], window: usize) -> Vec<usize> {
    let window = window.max(1);
    let maxima = strict_extrema(prices, window, |candidate, other| candidate > other);
    let minima = strict_extrema(prices, window, |candidate, other| candidate < other);
    maxima.into_iter().merge(minima).collect()
}

fn strict_extrema(
    prices: &[f64],
    window: usize,
    beats: impl Fn(f64, f64) -> bool,
) -> Vec<usize> {
    let n = prices.len();
    if n < 3 {
        return Vec::new();
    }

    let mut extrema = Vec::new();
    for i in 1..n - 1 {
        let lo = i.saturating_sub(window);
        let hi = (i + window).min(n - 1);
        let is_extremum = (lo..=hi)
            .filter(|&j| j != i)
            .all(|j| beats(prices[i], prices[j]));
        if is_extremum {
            extrema.push(i);
        }
    }
    extrema
}
