//! Authentication session logic: sign-up, sign-in, sign-out, and account
//! deletion against the remote authentication service.

use anyhow::{anyhow, Result};
use log::info;
use shared::{AuthResponse, SignInRequest, SignUpRequest, UserProfile};
use std::sync::Arc;

use crate::clients::auth::AuthClient;
use crate::domain::session::SessionHandle;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone)]
pub struct AuthService {
    client: Arc<dyn AuthClient>,
    session: SessionHandle,
}

impl AuthService {
    pub fn new(client: Arc<dyn AuthClient>, session: SessionHandle) -> Self {
        Self { client, session }
    }

    pub async fn sign_up(&self, request: SignUpRequest) -> Result<AuthResponse> {
        Self::validate_credentials(&request.email, &request.password)?;

        let session = self
            .client
            .sign_up(
                &request.email,
                &request.password,
                request.display_name.as_deref(),
            )
            .await?;

        let profile = session.profile.clone();
        self.session.set(session);
        info!("Signed up {}", profile.email);

        Ok(AuthResponse {
            profile,
            success_message: "Account created".to_string(),
        })
    }

    pub async fn sign_in(&self, request: SignInRequest) -> Result<AuthResponse> {
        Self::validate_credentials(&request.email, &request.password)?;

        let session = self.client.sign_in(&request.email, &request.password).await?;

        let profile = session.profile.clone();
        self.session.set(session);
        info!("Signed in {}", profile.email);

        Ok(AuthResponse {
            profile,
            success_message: "Signed in".to_string(),
        })
    }

    /// Dropping the tokens is the whole remote contract for sign-out
    pub fn sign_out(&self) {
        if let Some(session) = self.session.current() {
            info!("Signing out {}", session.profile.email);
        }
        self.session.clear();
    }

    pub async fn delete_account(&self) -> Result<()> {
        let session = self.session.require()?;
        self.client.delete_account(&session).await?;
        self.session.clear();
        info!("Deleted account {}", session.profile.email);
        Ok(())
    }

    pub fn current_profile(&self) -> Option<UserProfile> {
        self.session.current().map(|session| session.profile)
    }

    fn validate_credentials(email: &str, password: &str) -> Result<()> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(anyhow!("A valid email address is required"));
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(anyhow!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }
        Ok(())
    }
}
