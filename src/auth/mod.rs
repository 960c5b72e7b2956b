//! # Test-User Authentication
//!
//! Obtains ID tokens for test users from the external identity provider so
//! tests can call authenticated endpoints.

pub mod firebase;

pub use firebase::{extract_id_token, FirebaseAuthenticator, IdToken, VerifyPasswordRequest};

/// Log a test user in with credentials from `FIREBASE_APIKEY` and return the ID token.
///
/// Any failure (missing key, network error, unreadable or unparsable
/// response, absent or non-string `idToken`) panics, failing the running test.
pub async fn login(email: &str, password: &str) -> String {
    let authenticator = FirebaseAuthenticator::from_env()
        .unwrap_or_else(|e| panic!("failed to configure authentication: {}", e));

    match authenticator.authenticate(email, password).await {
        Ok(token) => token.into_inner(),
        Err(e) => panic!("failed to authenticate {}: {}", email, e),
    }
}
