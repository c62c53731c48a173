//! # REST API for Transactions
//!
//! Endpoints for listing, creating, and inspecting transactions, plus the
//! income/expense/balance summary.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use log::{error, info};
use serde::Deserialize;

use crate::AppState;
use shared::{CreateTransactionRequest, Period, TransactionListRequest};

// Query parameters for transaction listing and summary APIs
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub period: Option<String>,
    pub date: Option<NaiveDate>,
}

fn parse_list_query(query: TransactionListQuery) -> Result<TransactionListRequest, String> {
    let period = match query.period {
        Some(raw) => Some(raw.parse::<Period>().map_err(|e| e.to_string())?),
        None => None,
    };

    Ok(TransactionListRequest {
        period,
        date: query.date,
    })
}

/// List transactions, optionally narrowed to a period window
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionListQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions - query: {:?}", query);

    let request = match parse_list_query(query) {
        Ok(request) => request,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    match state.transaction_service.list_transactions(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list transactions: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing transactions").into_response()
        }
    }
}

/// Create a new transaction
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    info!("POST /api/transactions - request: {:?}", request);

    match state.transaction_service.create_transaction(request).await {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(e) => {
            error!("Failed to create transaction: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Fetch a single transaction by ID
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/transactions/{}", transaction_id);

    match state.transaction_service.get_transaction(&transaction_id).await {
        Ok(Some(transaction)) => (StatusCode::OK, Json(transaction)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Transaction not found").into_response(),
        Err(e) => {
            error!("Failed to fetch transaction {}: {}", transaction_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching transaction").into_response()
        }
    }
}

/// Income / expense / balance totals over the (optionally filtered) list
pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<TransactionListQuery>,
) -> impl IntoResponse {
    info!("GET /api/transactions/summary - query: {:?}", query);

    let request = match parse_list_query(query) {
        Ok(request) => request,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    match state.transaction_service.summarize(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to compute summary: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error computing summary").into_response()
        }
    }
}
