//! Rolling-mean computation for the two dashboard overlays.
//!
//! Both averages are trailing simple moving averages with a shrinking window
//! at the start of the series (minimum period 1): position `i` averages
//! `close[max(0, i + 1 - window)..=i]`. The window never looks ahead and
//! every position gets a value, so the output is as long as the input with
//! no undefined entries. Output depends on input order; callers hand the
//! records over in source order and this module does not re-sort.

use crate::config::SmaGrouping;
use crate::dataset::StockRecord;
use std::collections::HashMap;

pub const SMA_SHORT_WINDOW: usize = 50;
pub const SMA_LONG_WINDOW: usize = 200;

/// Populate `sma50` and `sma200` on every record in place.
pub fn compute_moving_averages(records: &mut [StockRecord], grouping: SmaGrouping) {
    match grouping {
        SmaGrouping::Global => {
            let all: Vec<usize> = (0..records.len()).collect();
            apply_windows(records, &all);
        }
        SmaGrouping::PerStock => {
            for indices in group_by_stock(records).values() {
                apply_windows(records, indices);
            }
        }
    }
}

/// Indices of each distinct symbol, preserving relative source order within
/// each group.
fn group_by_stock(records: &[StockRecord]) -> HashMap<String, Vec<usize>> {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        groups.entry(record.stock.clone()).or_default().push(i);
    }
    groups
}

/// Run both windows over the subsequence named by `indices` and scatter the
/// results back onto those records.
fn apply_windows(records: &mut [StockRecord], indices: &[usize]) {
    let closes: Vec<f64> = indices.iter().map(|&i| records[i].close).collect();
    let sma50 = rolling_mean(&closes, SMA_SHORT_WINDOW);
    let sma200 = rolling_mean(&closes, SMA_LONG_WINDOW);
    for (k, &i) in indices.iter().enumerate() {
        records[i].sma50 = sma50[k];
        records[i].sma200 = sma200[k];
    }
}

/// Trailing mean with shrinking start window, via prefix sums.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut prefix = vec![0.0; values.len() + 1];
    for (i, &v) in values.iter().enumerate() {
        prefix[i + 1] = prefix[i] + v;
    }
    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(window - 1);
            let count = (i - start + 1) as f64;
            (prefix[i + 1] - prefix[start]) / count
        })
        .collect()
}
