use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;
use serde::Deserialize;
use serde_json::json;
use shared::UserProfile;

use crate::domain::session::Session;

/// Interface to the remote authentication service.
///
/// The HTTP implementation talks to the identity provider's REST API; the
/// tests swap in an in-memory mock.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Create an account and return the signed-in session
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Session>;

    /// Exchange email/password for a session
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Permanently delete the account behind the session
    async fn delete_account(&self, session: &Session) -> Result<()>;
}

/// Auth client backed by the identity provider's REST API
pub struct HttpAuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Account payload returned by the sign-up / sign-in endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountPayload {
    local_id: String,
    email: String,
    id_token: String,
    refresh_token: String,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl HttpAuthClient {
    pub fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/v1/accounts:{}?key={}", self.base_url, action, self.api_key)
    }

    async fn post_account_action(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<AccountPayload> {
        let response = self.http.post(self.endpoint(action)).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<ApiErrorBody>().await {
                Ok(err) => err.error.message,
                Err(_) => status.to_string(),
            };
            return Err(anyhow!("Authentication failed: {}", message));
        }

        Ok(response.json::<AccountPayload>().await?)
    }

    fn session_from_payload(payload: AccountPayload) -> Session {
        Session {
            profile: UserProfile {
                id: payload.local_id,
                email: payload.email,
                display_name: payload.display_name,
            },
            id_token: payload.id_token,
            refresh_token: payload.refresh_token,
        }
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Session> {
        info!("Signing up account for {}", email);

        let payload = self
            .post_account_action(
                "signUp",
                json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        let mut session = Self::session_from_payload(payload);

        // The sign-up endpoint ignores profile fields; a follow-up update
        // call attaches the display name.
        if let Some(name) = display_name {
            self.post_account_action(
                "update",
                json!({
                    "idToken": session.id_token,
                    "displayName": name,
                    "returnSecureToken": true,
                }),
            )
            .await?;
            session.profile.display_name = Some(name.to_string());
        }

        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        info!("Signing in {}", email);

        let payload = self
            .post_account_action(
                "signInWithPassword",
                json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        Ok(Self::session_from_payload(payload))
    }

    async fn delete_account(&self, session: &Session) -> Result<()> {
        info!("Deleting account {}", session.profile.id);

        let response = self
            .http
            .post(self.endpoint("delete"))
            .json(&json!({ "idToken": session.id_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow!("Account deletion failed ({})", status));
        }

        Ok(())
    }
}
