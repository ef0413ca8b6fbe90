//! Error types for the CloudSense harness
//!
//! One error enum shared by the session resolver, the browser handle and the
//! convergence helpers.

use std::time::Duration;

use thiserror::Error;

/// Main error type for harness operations
#[derive(Error, Debug)]
pub enum CloudSenseError {
    /// An external command exited non-zero or could not be spawned
    #[error("command `{command}` failed: {message}")]
    Cli { command: String, message: String },

    /// Spawned program is not on PATH
    #[error("`{0}` not found on PATH")]
    ProgramNotFound(String),

    /// `sf` binary is not on PATH
    #[error("Salesforce CLI not found. Install with: npm install -g @salesforce/cli")]
    SfCliNotFound,

    /// CLI output contained no JSON object
    #[error("Unexpected CLI output (no JSON found): {0}")]
    NoJson(String),

    /// Session URL could not be resolved from CLI output
    #[error("Session error: {0}")]
    Session(String),

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,

    /// A convergence wait the caller asked to be fatal timed out
    #[error("Timed out after {elapsed:?} waiting for {what}")]
    WaitTimedOut { what: String, elapsed: Duration },

    /// The signed-in page does not show the expected app
    #[error("App '{app}' not visible at {url}")]
    AppNotVisible { app: String, url: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Convenience Result type for harness operations
pub type Result<T> = std::result::Result<T, CloudSenseError>;

impl CloudSenseError {
    /// Create a CLI failure error
    pub fn cli(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Cli {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a session resolution error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap an error with additional context
    pub fn with_context<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_message() {
        let err = CloudSenseError::with_context(
            "Failed to get org info",
            CloudSenseError::cli("sf org display", "No authorization found"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to get org info: command `sf org display` failed: No authorization found"
        );
    }

    #[test]
    fn test_no_json_message() {
        let err = CloudSenseError::NoJson("Warning: update available".to_string());
        assert!(err.to_string().contains("no JSON found"));
    }
}
