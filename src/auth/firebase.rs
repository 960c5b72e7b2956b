//! Password login against the Firebase identity toolkit.

use crate::config::AuthConfig;
use crate::errors::{Result, TestingError};
use crate::observability::sanitize_url;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

/// Body of a `verifyPassword` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPasswordRequest<'a> {
    pub return_secure_token: bool,
    pub email: &'a str,
    pub password: &'a str,
}

/// ID token returned by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct IdToken(String);

impl IdToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdToken([REDACTED])")
    }
}

/// Logs test users in with email and password.
///
/// Every call performs a fresh request; tokens are not cached.
#[derive(Clone, Debug)]
pub struct FirebaseAuthenticator {
    client: reqwest::Client,
    config: AuthConfig,
}

impl FirebaseAuthenticator {
    /// Create an authenticator for a validated configuration
    pub fn new(config: AuthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { client: reqwest::Client::new(), config })
    }

    /// Create an authenticator from `FIREBASE_APIKEY` and `FIREBASE_AUTH_ENDPOINT`
    pub fn from_env() -> Result<Self> {
        Self::new(AuthConfig::from_env()?)
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    fn request_url(&self) -> Result<url::Url> {
        url::Url::parse_with_params(&self.config.endpoint, &[("key", self.config.api_key.as_str())])
            .map_err(|e| TestingError::config(format!("Invalid auth endpoint: {}", e)))
    }

    /// Log in and return the `idToken` of the response.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<IdToken> {
        let body = serde_json::to_vec(&VerifyPasswordRequest {
            return_secure_token: true,
            email,
            password,
        })
        .map_err(|e| TestingError::Serialization {
            source: e,
            context: "failed to marshal authenticate request".to_string(),
        })?;

        let url = self.request_url()?;
        debug!(url = %sanitize_url(url.as_str()), email = %email, "Authenticating test user");

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TestingError::Http {
                source: e,
                context: "failed to POST authentication".to_string(),
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| TestingError::Http {
            source: e,
            context: "failed to read response body".to_string(),
        })?;

        let parsed: Value = serde_json::from_slice(&bytes).map_err(|e| TestingError::Serialization {
            source: e,
            context: format!("failed to unmarshal JSON response body (status {})", status),
        })?;

        let token = extract_id_token(&parsed)?;
        info!(email = %email, "Test user authenticated");
        Ok(token)
    }
}

/// Pull `idToken` out of a `verifyPassword` response.
///
/// Error responses (`{"error": {"message": ...}}`) surface the provider's message.
pub fn extract_id_token(response: &Value) -> Result<IdToken> {
    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(TestingError::auth(format!("identity provider rejected login: {}", message)));
    }

    match response.get("idToken") {
        Some(Value::String(token)) => Ok(IdToken(token.clone())),
        Some(other) => Err(TestingError::auth(format!("idToken is not a string: {}", other))),
        None => Err(TestingError::auth("response has no idToken")),
    }
}
