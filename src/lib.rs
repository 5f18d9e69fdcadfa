//! Data service backing the Nifty stocks dashboard.
//!
//! Loads a CSV of historical closing prices once at startup, attaches 50-day
//! and 200-day simple moving averages to every row, and serves category and
//! stock filter queries over HTTP to the chart front end. The dataset is
//! parsed exactly once and shared read-only; every request filters from the
//! same in-memory table.

pub mod analysis;
pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
