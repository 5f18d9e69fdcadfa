//! CSV ingestion and date cleaning.
//!
//! The input is the dashboard's price history export: a header row, an
//! unnamed leading index column, then `Date`, `Stock`, `Category`, `Close`
//! and whatever else the export carries. Extra columns pass through unused.
//! Rows whose date does not parse are dropped and counted, never kept as
//! placeholders; a missing file or missing required column aborts the load.

use crate::analysis;
use crate::config::SmaGrouping;
use crate::dataset::{StockDataset, StockRecord};
use crate::error::LoadError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const REQUIRED_COLUMNS: [&str; 4] = ["Date", "Stock", "Category", "Close"];

/// Accepted date formats, tried in order. Ambiguous slash dates such as
/// `02/01/2025` resolve day-first (Jan 2), not month-first as pandas
/// `to_datetime` would; the exports this service reads are day-first.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Raw CSV row before date cleaning. Serde ignores the unnamed index column
/// and any extra columns.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Stock")]
    stock: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Close")]
    close: f64,
}

/// Load the dataset from `path`, drop rows with unparseable dates, and
/// attach the derived moving-average columns. One-shot: on failure the
/// session cannot proceed.
pub fn load(path: impl AsRef<Path>, grouping: SmaGrouping) -> Result<StockDataset, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let dataset = load_from_str(&content, grouping)?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        rows_dropped = dataset.rows_dropped(),
        grouping = grouping.as_str(),
        "Dataset loaded"
    );
    Ok(dataset)
}

/// Parse CSV content into a dataset. Split out from [`load`] so tests and
/// non-file sources can feed content directly.
pub fn load_from_str(content: &str, grouping: SmaGrouping) -> Result<StockDataset, LoadError> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    let mut rows_dropped = 0usize;
    for row in reader.deserialize::<RawRecord>() {
        let raw = row?;
        match parse_date(raw.date.trim()) {
            Some(date) => records.push(StockRecord {
                date,
                stock: raw.stock.trim().to_string(),
                category: raw.category.trim().to_string(),
                close: raw.close,
                sma50: 0.0,
                sma200: 0.0,
            }),
            None => rows_dropped += 1,
        }
    }

    if rows_dropped > 0 {
        warn!(rows_dropped, "Dropped rows with unparseable dates");
    }

    analysis::compute_moving_averages(&mut records, grouping);

    let dataset = StockDataset::new(records, rows_dropped, grouping);
    if grouping == SmaGrouping::Global && dataset.stock_count() > 1 {
        warn!(
            stocks = dataset.stock_count(),
            "Global SMA windows over multiple symbols: adjacent symbols share windows. \
             Set SMA_GROUPING=per-stock to window each symbol separately"
        );
    }
    Ok(dataset)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
