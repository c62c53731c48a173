//! # REST API for Receipt Scanning
//!
//! Upload a captured receipt image, then confirm or discard the extracted
//! result. The pipeline makes a single attempt; failures are logged here
//! and reported as plain messages.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::AppState;
use shared::{ConfirmScanRequest, DiscardScanRequest};

/// Run an uploaded image through the extraction pipeline
pub async fn scan_receipt(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    info!("POST /api/scan/receipt - {} bytes", body.len());

    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, "No image data").into_response();
    }

    match state.scan_service.scan_receipt(&body).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Receipt scan failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Receipt scan failed").into_response()
        }
    }
}

/// Turn a reviewed scan into a transaction
pub async fn confirm_scan(
    State(state): State<AppState>,
    Json(request): Json<ConfirmScanRequest>,
) -> impl IntoResponse {
    info!("POST /api/scan/confirm - scan: {}", request.scan_id);

    match state.scan_service.confirm(request).await {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(e) => {
            error!("Scan confirmation failed: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Drop a pending scan without creating a transaction
pub async fn discard_scan(
    State(state): State<AppState>,
    Json(request): Json<DiscardScanRequest>,
) -> impl IntoResponse {
    info!("POST /api/scan/discard - scan: {}", request.scan_id);

    match state.scan_service.discard(&request.scan_id) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            error!("Scan discard failed: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}
