//! # REST API for Authentication
//!
//! Sign-up, sign-in, sign-out, account deletion, and the current profile.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::AppState;
use shared::{ProfileResponse, SignInRequest, SignUpRequest};

/// Create an account and sign the user in
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/sign-up - email: {}", request.email);

    match state.auth_service.sign_up(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Sign-up failed: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Exchange email/password for a session
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/sign-in - email: {}", request.email);

    match state.auth_service.sign_in(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Sign-in failed: {}", e);
            (StatusCode::UNAUTHORIZED, e.to_string()).into_response()
        }
    }
}

/// Drop the current session
pub async fn sign_out(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/auth/sign-out");
    state.auth_service.sign_out();
    StatusCode::OK
}

/// Permanently delete the signed-in account
pub async fn delete_account(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/auth/account");

    match state.auth_service.delete_account().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            error!("Account deletion failed: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Profile of the signed-in user, if any
pub async fn get_profile(State(state): State<AppState>) -> impl IntoResponse {
    let profile = state.auth_service.current_profile();
    (StatusCode::OK, Json(ProfileResponse { profile })).into_response()
}
