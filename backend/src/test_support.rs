//! Shared fixtures for handler tests: stub remote clients and a fully
//! wired application state over a temporary CSV store.

use anyhow::Result;
use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use shared::UserProfile;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

use crate::clients::auth::AuthClient;
use crate::clients::vision::{VisionClient, VisionError};
use crate::domain::session::{Session, SessionHandle};
use crate::domain::{AuthService, ScanService, TransactionService};
use crate::storage::csv::CsvConnection;
use crate::storage::Connection;
use crate::AppState;

pub(crate) struct StubAuthClient;

#[async_trait]
impl AuthClient for StubAuthClient {
    async fn sign_up(
        &self,
        email: &str,
        _password: &str,
        display_name: Option<&str>,
    ) -> Result<Session> {
        Ok(stub_session(email, display_name))
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session> {
        Ok(stub_session(email, None))
    }

    async fn delete_account(&self, _session: &Session) -> Result<()> {
        Ok(())
    }
}

pub(crate) struct StubVisionClient;

#[async_trait]
impl VisionClient for StubVisionClient {
    async fn extract_text(
        &self,
        _image_jpeg: &[u8],
        _instruction: &str,
    ) -> Result<String, VisionError> {
        Ok("Corner Market\nBread 2 x 2.50\nTOTAL: 5.00\n".to_string())
    }
}

fn stub_session(email: &str, display_name: Option<&str>) -> Session {
    Session {
        profile: UserProfile {
            id: format!("uid-{}", email),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
        },
        id_token: format!("token-{}", email),
        refresh_token: format!("refresh-{}", email),
    }
}

/// A PNG the size of a typical camera capture
pub(crate) fn receipt_photo() -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
        1600,
        1200,
        image::Rgb([230, 230, 230]),
    ));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    bytes.into_inner()
}

fn build_state(session: SessionHandle) -> (AppState, TempDir) {
    let temp = TempDir::new().unwrap();
    let connection = CsvConnection::new(temp.path()).unwrap();

    let auth_service = AuthService::new(Arc::new(StubAuthClient), session.clone());
    let transaction_service =
        TransactionService::new(connection.create_transaction_store(), session);
    let scan_service = ScanService::new(Arc::new(StubVisionClient), transaction_service.clone());

    (
        AppState {
            auth_service,
            transaction_service,
            scan_service,
        },
        temp,
    )
}

/// Application state over a temporary CSV store, no session set
pub(crate) fn signed_out_state() -> (AppState, TempDir) {
    build_state(SessionHandle::new())
}

/// Application state with a signed-in test user
pub(crate) fn signed_in_state() -> (AppState, TempDir) {
    let session = SessionHandle::new();
    session.set(stub_session("test@example.com", None));
    build_state(session)
}
