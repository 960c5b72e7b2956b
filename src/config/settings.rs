//! # Configuration Settings
//!
//! Defines the configuration structures consumed by the test-support helpers.

use crate::errors::{Result, TestingError};
use once_cell::sync::Lazy;
use std::fmt;
use std::path::PathBuf;
use validator::Validate;

/// Environment variable holding the Firebase API key used to log users in.
pub const ENV_FIREBASE_API_KEY: &str = "FIREBASE_APIKEY";

/// Environment variable overriding the identity-toolkit endpoint.
pub const ENV_AUTH_ENDPOINT: &str = "FIREBASE_AUTH_ENDPOINT";

/// Environment variable overriding the golden-file root directory.
pub const ENV_GOLDEN_ROOT: &str = "GOLDEN_ROOT";

/// Password verification endpoint of the Firebase identity toolkit.
pub const DEFAULT_AUTH_ENDPOINT: &str =
    "https://www.googleapis.com/identitytoolkit/v3/relyingparty/verifyPassword";

/// Directory, relative to the crate under test, holding golden files.
pub const DEFAULT_GOLDEN_ROOT: &str = "testdata";

static DOTENV: Lazy<Option<PathBuf>> = Lazy::new(|| dotenvy::dotenv().ok());

/// Load a `.env` file from the working directory or its parents, once per process.
///
/// Returns the path of the loaded file, if any.
pub fn load_dotenv() -> Option<&'static PathBuf> {
    DOTENV.as_ref()
}

/// Identity provider configuration
#[derive(Clone, Validate)]
pub struct AuthConfig {
    /// API key appended to the endpoint as the `key` query parameter
    #[validate(length(min = 1, message = "API key cannot be empty"))]
    pub api_key: String,

    /// Password verification endpoint
    #[validate(url(message = "Endpoint must be a valid URL"))]
    pub endpoint: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { api_key: String::new(), endpoint: DEFAULT_AUTH_ENDPOINT.to_string() }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl AuthConfig {
    /// Create a configuration for the default endpoint
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self { api_key: api_key.into(), ..Default::default() }
    }

    /// Point the configuration at a different endpoint
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Create configuration from environment variables
    ///
    /// The API key is read from `FIREBASE_APIKEY` on every call.
    pub fn from_env() -> Result<Self> {
        load_dotenv();

        let api_key = std::env::var(ENV_FIREBASE_API_KEY).map_err(|_| {
            TestingError::config(format!("{} is not set", ENV_FIREBASE_API_KEY))
        })?;

        let endpoint = std::env::var(ENV_AUTH_ENDPOINT)
            .unwrap_or_else(|_| DEFAULT_AUTH_ENDPOINT.to_string());

        let config = Self { api_key, endpoint };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(TestingError::from)
    }
}

/// Golden-file storage configuration
#[derive(Debug, Clone)]
pub struct GoldenConfig {
    /// Root directory under which per-test directories are created
    pub root: PathBuf,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        Self { root: PathBuf::from(DEFAULT_GOLDEN_ROOT) }
    }
}

impl GoldenConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        load_dotenv();

        let root = match std::env::var(ENV_GOLDEN_ROOT) {
            Ok(root) if root.trim().is_empty() => {
                return Err(TestingError::validation_field(
                    "golden root cannot be empty",
                    ENV_GOLDEN_ROOT,
                ));
            }
            Ok(root) => PathBuf::from(root),
            Err(_) => PathBuf::from(DEFAULT_GOLDEN_ROOT),
        };

        Ok(Self { root })
    }
}
