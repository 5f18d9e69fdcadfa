use crate::dataset::{SharedDataset, StockRecord};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[derive(Debug, Deserialize)]
pub struct StocksQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    pub category: Option<String>,
    pub stock: Option<String>,
}

/// What is loaded, for the dashboard's header and for operators.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub rows_dropped: usize,
    pub categories: usize,
    pub stocks: usize,
    pub sma_grouping: &'static str,
}

pub async fn health_handler() -> impl IntoResponse {
    StatusCode::OK
}

#[instrument(skip(state))]
pub async fn list_categories_handler(State(state): State<SharedDataset>) -> impl IntoResponse {
    debug!("Received request for categories");

    let categories = state.categories();

    info!(count = categories.len(), "Returning categories");
    (StatusCode::OK, Json(categories))
}

#[instrument(skip(state), fields(category = %params.category.as_deref().unwrap_or("-")))]
pub async fn list_stocks_handler(
    State(state): State<SharedDataset>,
    Query(params): Query<StocksQuery>,
) -> Response {
    debug!("Received request for stocks in category");

    let Some(category) = params.category else {
        return (StatusCode::BAD_REQUEST, "missing `category` query parameter").into_response();
    };

    let stocks = state.stocks_in(&category);

    info!(count = stocks.len(), "Returning stocks for category");
    (StatusCode::OK, Json(stocks)).into_response()
}

#[instrument(
    skip(state),
    fields(
        category = %params.category.as_deref().unwrap_or("-"),
        stock = %params.stock.as_deref().unwrap_or("-"),
    )
)]
pub async fn get_series_handler(
    State(state): State<SharedDataset>,
    Query(params): Query<SeriesQuery>,
) -> Response {
    debug!("Received request for price series");

    let (Some(category), Some(stock)) = (params.category, params.stock) else {
        return (
            StatusCode::BAD_REQUEST,
            "missing `category` or `stock` query parameter",
        )
            .into_response();
    };

    // An empty match is a valid result; the front end renders an empty chart.
    let records: Vec<StockRecord> = state
        .filter(&category, &stock)
        .into_iter()
        .cloned()
        .collect();

    info!(rows = records.len(), "Returning price series");
    (StatusCode::OK, Json(records)).into_response()
}

#[instrument(skip(state))]
pub async fn dataset_summary_handler(State(state): State<SharedDataset>) -> impl IntoResponse {
    debug!("Received request for dataset summary");

    let summary = DatasetSummary {
        rows: state.len(),
        rows_dropped: state.rows_dropped(),
        categories: state.categories().len(),
        stocks: state.stock_count(),
        sma_grouping: state.grouping().as_str(),
    };

    info!(rows = summary.rows, rows_dropped = summary.rows_dropped, "Returning dataset summary");
    (StatusCode::OK, Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmaGrouping;
    use crate::dataset::StockDataset;
    use axum::{Router, body::Body, http::Request, routing::get};
    use std::sync::Arc;
    use tower::ServiceExt;

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

    fn app() -> Router {
        let dataset = StockDataset::new(
            vec![
                record("2025-01-01", "TCS", "IT", 100.0),
                record("2025-01-02", "TCS", "IT", 102.0),
                record("2025-01-01", "HDFC", "Bank", 90.0),
            ],
            1,
            SmaGrouping::Global,
        );
        Router::new()
            .route("/categories", get(list_categories_handler))
            .route("/stocks", get(list_stocks_handler))
            .route("/series", get(get_series_handler))
            .route("/summary", get(dataset_summary_handler))
            .with_state(Arc::new(dataset))
    }

    async fn send(path: &str) -> Response {
        app()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn stocks_without_category_is_bad_request() {
        let response = send("/stocks").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn series_with_missing_parameter_is_bad_request() {
        let response = send("/series?category=IT").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send("/series?stock=TCS").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_series_is_ok_with_empty_array() {
        let response = send("/series?category=IT&stock=WIPRO").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"[]");
    }

    #[tokio::test]
    async fn series_returns_records_in_order() {
        let response = send("/series?category=IT&stock=TCS").await;
        assert_eq!(response.status(), StatusCode::OK);

        let rows: Vec<StockRecord> =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].date < rows[1].date);
    }

    #[tokio::test]
    async fn summary_reports_the_loaded_shape() {
        let response = send("/summary").await;
        assert_eq!(response.status(), StatusCode::OK);

        let summary: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(summary["rows"], 3);
        assert_eq!(summary["rows_dropped"], 1);
        assert_eq!(summary["categories"], 2);
        assert_eq!(summary["stocks"], 2);
        assert_eq!(summary["sma_grouping"], "global");
    }
}
