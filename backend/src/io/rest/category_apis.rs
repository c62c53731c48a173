//! # REST API for Categories
//!
//! The default category list that seeds the entry form's picker.

use axum::{http::StatusCode, response::{IntoResponse, Json}};

use shared::{CategoryListResponse, DEFAULT_CATEGORIES};

pub async fn list_categories() -> impl IntoResponse {
    let categories = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    (StatusCode::OK, Json(CategoryListResponse { categories })).into_response()
}
