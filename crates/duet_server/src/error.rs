//! Server error taxonomy.
//!
//! Startup failures (config, bind) abort the process; once the listener
//! is up every failure is scoped to a single room or connection and
//! handled in place, so nothing past startup surfaces here.

/// Structured error type for server startup operations.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration loading or validation failure.
    #[error("Config error: {0}")]
    Config(String),

    /// Connection and binding issues.
    #[error("Network error: {0}")]
    Network(String),
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::Network(e.to_string())
    }
}
