//! # Configuration Management
//!
//! Explicit configuration for the identity-provider login and golden-file
//! helpers, with environment-sourced constructors for test suites.

pub mod settings;

pub use settings::{
    load_dotenv, AuthConfig, GoldenConfig, DEFAULT_AUTH_ENDPOINT, DEFAULT_GOLDEN_ROOT,
    ENV_AUTH_ENDPOINT, ENV_FIREBASE_API_KEY, ENV_GOLDEN_ROOT,
};
