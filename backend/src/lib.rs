//! # Expense Tracker Backend
//!
//! UI-agnostic backend for the expense tracker: a thin shell (mobile or
//! desktop) drives it over a local REST API.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! UI shell
//!     |
//! IO Layer (REST API, handlers)
//!     |
//! Domain Layer (services)
//!     |
//! Storage / Clients (document store, auth service, vision model)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with CORS for the shell
//! - Coordinate between domain logic, persistence, and remote services

pub mod clients;
pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::Method,
    routing::{delete, get, post},
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::clients::{HttpAuthClient, HttpVisionClient};
use crate::config::{AppConfig, StorageBackend};
use crate::domain::{AuthService, ScanService, SessionHandle, TransactionService};
use crate::storage::csv::CsvConnection;
use crate::storage::remote::RemoteConnection;
use crate::storage::Connection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub transaction_service: TransactionService,
    pub scan_service: ScanService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    let http = reqwest::Client::new();
    let session = SessionHandle::new();

    info!("Setting up authentication");
    if config.auth.api_key.is_none() {
        warn!("No auth API key configured; sign-in will fail");
    }
    let auth_client = Arc::new(HttpAuthClient::new(
        http.clone(),
        config.auth.base_url.clone(),
        config.auth.api_key.clone().unwrap_or_default(),
    ));
    let auth_service = AuthService::new(auth_client, session.clone());

    info!("Setting up {} storage", config.storage.backend.as_str());
    let store = match config.storage.backend {
        StorageBackend::Remote => RemoteConnection::new(
            http.clone(),
            config.storage.remote_url.clone(),
            Arc::new(session.clone()),
        )
        .create_transaction_store(),
        StorageBackend::Csv => {
            let connection = match &config.storage.data_dir {
                Some(dir) => CsvConnection::new(dir)?,
                None => CsvConnection::new_default()?,
            };
            connection.create_transaction_store()
        }
    };

    let transaction_service = TransactionService::new(store, session.clone());

    info!("Setting up receipt scanning");
    if config.vision.api_key.is_none() {
        warn!("No vision API key configured; receipt scanning will fail");
    }
    let vision_client = Arc::new(HttpVisionClient::new(
        http,
        config.vision.base_url.clone(),
        config.vision.model.clone(),
        config.vision.api_key.clone().unwrap_or_default(),
    ));
    let scan_service = ScanService::new(vision_client, transaction_service.clone());

    Ok(AppState {
        auth_service,
        transaction_service,
        scan_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup so the shell can make requests from its own origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/auth/sign-up", post(io::sign_up))
        .route("/auth/sign-in", post(io::sign_in))
        .route("/auth/sign-out", post(io::sign_out))
        .route("/auth/account", delete(io::delete_account))
        .route("/auth/profile", get(io::get_profile))
        .route(
            "/transactions",
            get(io::list_transactions).post(io::create_transaction),
        )
        .route("/transactions/summary", get(io::get_summary))
        .route("/transactions/:id", get(io::get_transaction))
        .route("/categories", get(io::list_categories))
        .route("/scan/receipt", post(io::scan_receipt))
        .route("/scan/confirm", post(io::confirm_scan))
        .route("/scan/discard", post(io::discard_scan));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
pub(crate) mod test_support;
