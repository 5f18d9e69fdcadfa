use crate::config::SmaGrouping;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One cleaned row of the price history with its derived columns attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub date: NaiveDate,
    pub stock: String,
    pub category: String,
    pub close: f64,
    pub sma50: f64,
    pub sma200: f64,
}

/// The full cleaned dataset. Built once at startup, read-only afterwards;
/// queries return views and never touch the underlying rows.
#[derive(Debug, Clone)]
pub struct StockDataset {
    records: Vec<StockRecord>,
    rows_dropped: usize,
    grouping: SmaGrouping,
}

// Shared handle for the request handlers. No lock: nothing mutates after load.
pub type SharedDataset = Arc<StockDataset>;

impl StockDataset {
    pub(crate) fn new(
        records: Vec<StockRecord>,
        rows_dropped: usize,
        grouping: SmaGrouping,
    ) -> Self {
        Self {
            records,
            rows_dropped,
            grouping,
        }
    }

    /// All records in source order.
    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows discarded at load time because their date did not parse.
    pub fn rows_dropped(&self) -> usize {
        self.rows_dropped
    }

    pub fn grouping(&self) -> SmaGrouping {
        self.grouping
    }

    /// Distinct non-empty categories, sorted for presentation.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .records
            .iter()
            .filter(|r| !r.category.is_empty())
            .map(|r| r.category.clone())
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Distinct non-empty stock symbols within `category`, sorted. An
    /// unknown category yields an empty list, not an error.
    pub fn stocks_in(&self, category: &str) -> Vec<String> {
        let mut out: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.category == category && !r.stock.is_empty())
            .map(|r| r.stock.clone())
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Count of distinct stock symbols across the whole dataset.
    pub fn stock_count(&self) -> usize {
        let mut stocks: Vec<&str> = self.records.iter().map(|r| r.stock.as_str()).collect();
        stocks.sort_unstable();
        stocks.dedup();
        stocks.len()
    }

    /// Ordered subsequence matching both fields exactly (case-sensitive).
    /// Source order is preserved; an empty result is valid.
    pub fn filter(&self, category: &str, stock: &str) -> Vec<&StockRecord> {
        self.records
            .iter()
            .filter(|r| r.category == category && r.stock == stock)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, stock: &str, category: &str, close: f64) -> StockRecord {
        StockRecord {
            date: date.parse().unwrap(),
            stock: stock.to_string(),
            category: category.to_string(),
            close,
            sma50: close,
            sma200: close,
        }
    }

    fn sample() -> StockDataset {
        StockDataset::new(
            vec![
                record("2025-01-01", "TCS", "IT", 100.0),
                record("2025-01-01", "HDFC", "Bank", 90.0),
                record("2025-01-02", "TCS", "IT", 102.0),
                record("2025-01-02", "INFY", "IT", 55.0),
                record("2025-01-03", "HDFC", "Bank", 91.0),
            ],
            1,
            SmaGrouping::Global,
        )
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        assert_eq!(sample().categories(), vec!["Bank", "IT"]);
    }

    #[test]
    fn stocks_are_scoped_to_category() {
        let ds = sample();
        assert_eq!(ds.stocks_in("IT"), vec!["INFY", "TCS"]);
        assert_eq!(ds.stocks_in("Bank"), vec!["HDFC"]);
        assert!(ds.stocks_in("Pharma").is_empty());
    }

    #[test]
    fn filter_matches_both_fields_exactly() {
        let ds = sample();
        let rows = ds.filter("IT", "TCS");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.category == "IT" && r.stock == "TCS"));
        // case-sensitive
        assert!(ds.filter("it", "TCS").is_empty());
        assert!(ds.filter("IT", "tcs").is_empty());
    }

    #[test]
    fn filter_preserves_source_order_and_is_idempotent() {
        let ds = sample();
        let first = ds.filter("IT", "TCS");
        let second = ds.filter("IT", "TCS");
        assert_eq!(first, second);
        assert!(first[0].date < first[1].date);
    }

    #[test]
    fn category_stock_pairs_reconstruct_the_dataset() {
        let ds = sample();
        let mut reconstructed = 0;
        for category in ds.categories() {
            for stock in ds.stocks_in(&category) {
                reconstructed += ds.filter(&category, &stock).len();
            }
        }
        assert_eq!(reconstructed, ds.len());
    }
}
