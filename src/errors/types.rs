//! # Error Types
//!
//! Error types for the agnus test-support helpers using `thiserror`.

/// Custom result type for test-support operations
pub type Result<T> = std::result::Result<T, TestingError>;

/// Main error type for the test-support helpers
#[derive(thiserror::Error, Debug)]
pub enum TestingError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Database errors, annotated with the statement and arguments involved
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: sqlx::Error,
        context: String,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// A bulk-load record lacks a column defined by the first record
    #[error("json field \"{field}\" does not exist: {context}")]
    MissingField { field: String, context: String },

    /// Outbound HTTP errors
    #[error("HTTP error: {context}")]
    Http {
        #[source]
        source: reqwest::Error,
        context: String,
    },

    /// The identity provider refused or returned an unusable response
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },
}

impl TestingError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a database error with context
    pub fn database<S: Into<String>>(source: sqlx::Error, context: S) -> Self {
        Self::Database { source, context: context.into() }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(source: std::io::Error, context: S) -> Self {
        Self::Io { source, context: context.into() }
    }

    /// Create a missing-field error
    pub fn missing_field<F: Into<String>, S: Into<String>>(field: F, context: S) -> Self {
        Self::MissingField { field: field.into(), context: context.into() }
    }

    /// Create an authentication error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth { message: message.into() }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Prefix the context of this error, where the variant carries one
    pub(crate) fn add_context(&mut self, context: &str) {
        match self {
            TestingError::Database { context: ref mut ctx, .. }
            | TestingError::Io { context: ref mut ctx, .. }
            | TestingError::Serialization { context: ref mut ctx, .. }
            | TestingError::MissingField { context: ref mut ctx, .. }
            | TestingError::Http { context: ref mut ctx, .. } => {
                *ctx = format!("{}: {}", context, ctx);
            }
            TestingError::Auth { message }
            | TestingError::Config { message }
            | TestingError::Validation { message, .. } => {
                *message = format!("{}: {}", context, message);
            }
        }
    }
}

/// Attach operation context to a failing result
pub trait ErrorContext<T> {
    /// Prefix the error's context with `context`
    fn context<S: AsRef<str>>(self, context: S) -> Result<T>;

    /// Like [`ErrorContext::context`], building the context lazily
    fn with_context<S: AsRef<str>, F: FnOnce() -> S>(self, f: F) -> Result<T>;
}

impl<T, E: Into<TestingError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context<S: AsRef<str>>(self, context: S) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            error.add_context(context.as_ref());
            error
        })
    }

    fn with_context<S: AsRef<str>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            error.add_context(f().as_ref());
            error
        })
    }
}

// Error conversions for common external error types
impl From<sqlx::Error> for TestingError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database { source: error, context: "Database operation failed".to_string() }
    }
}

impl From<std::io::Error> for TestingError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for TestingError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<reqwest::Error> for TestingError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http { source: error, context: "HTTP request failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for TestingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}
