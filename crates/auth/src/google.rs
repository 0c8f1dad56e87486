//! Google ID-token verification boundary.
//!
//! The verifier is a trait so the HTTP layer and tests can stand in for the
//! network call. Verification is a black box: token in, `{email, name}` out
//! or failure. Any failure means the login fails; nothing is assumed valid.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

const TOKENINFO_ENDPOINT: &str = "https://oauth2.googleapis.com/tokeninfo";
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity asserted by a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
    /// Display name; falls back to the email when Google sends none.
    pub name: String,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token verification request failed: {0}")]
    Transport(String),

    #[error("Invalid Google token")]
    Rejected,

    #[error("Invalid token audience")]
    AudienceMismatch,

    #[error("verified token carries no email")]
    MissingEmail,
}

#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, VerifyError>;
}

/// Verifies tokens against Google's tokeninfo endpoint.
pub struct GoogleApiVerifier {
    http: reqwest::Client,
    client_id: String,
}

impl GoogleApiVerifier {
    pub fn new(client_id: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(VERIFY_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            client_id: client_id.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    email: Option<String>,
    name: Option<String>,
}

#[async_trait]
impl GoogleTokenVerifier for GoogleApiVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, VerifyError> {
        let response = self
            .http
            .get(TOKENINFO_ENDPOINT)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| VerifyError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "google token verification rejected");
            return Err(VerifyError::Rejected);
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| VerifyError::Transport(e.to_string()))?;

        if info.aud != self.client_id {
            tracing::warn!("google token audience mismatch");
            return Err(VerifyError::AudienceMismatch);
        }

        let email = info
            .email
            .filter(|e| !e.is_empty())
            .ok_or(VerifyError::MissingEmail)?;
        let name = info
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.clone());

        tracing::info!(%email, "google token verified");
        Ok(VerifiedIdentity { email, name })
    }
}
