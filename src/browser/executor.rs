//! Browser executor - wraps agent-browser CLI
//!
//! Implements [`PageHandle`] over agent-browser commands.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::browser::page::{LoadState, PageHandle};
use crate::core::config::BrowserConfig;
use crate::core::{CloudSenseError, Result};
use crate::salesforce::cli::{CommandRunner, ProcessRunner};

/// Executor for browser automation via agent-browser CLI
#[derive(Clone)]
pub struct BrowserExecutor {
    runner: Arc<dyn CommandRunner>,
    /// Binary name or path
    binary: String,
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
}

impl BrowserExecutor {
    /// Create a new browser executor
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            runner: Arc::new(ProcessRunner),
            binary: "agent-browser".to_string(),
            session_name: session_name.into(),
            headed: false,
        }
    }

    /// Create an executor from configuration
    pub fn from_config(config: &BrowserConfig) -> Self {
        let mut executor = Self::new(config.session_name.clone());
        executor.binary = config.binary.clone();
        executor.headed = config.headed;
        executor
    }

    /// Replace the process runner
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Set headed mode
    pub fn set_headed(&mut self, headed: bool) {
        self.headed = headed;
    }

    /// Session name passed to agent-browser
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Check if agent-browser is installed
    pub async fn is_available(&self) -> bool {
        self.runner
            .run(&self.binary, &["--version".to_string()], None)
            .await
            .is_ok()
    }

    /// Full argument vector for a command
    fn command_args(&self, args: &[&str]) -> Vec<String> {
        let mut full = vec!["--session".to_string(), self.session_name.clone()];
        if self.headed {
            full.push("--headed".to_string());
        }
        full.extend(args.iter().map(|a| a.to_string()));
        full
    }

    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let full = self.command_args(args);
        self.runner
            .run(&self.binary, &full, None)
            .await
            .map_err(|e| match e {
                CloudSenseError::ProgramNotFound(_) => CloudSenseError::AgentBrowserNotFound,
                CloudSenseError::Cli { message, .. } => {
                    CloudSenseError::browser(format!("agent-browser command failed: {}", message))
                }
                other => other,
            })
    }

    /// Close the browser session
    pub async fn close(&self) -> Result<()> {
        self.run_command(&["close"]).await.map(|_| ())
    }
}

#[async_trait]
impl PageHandle for BrowserExecutor {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!(session = %self.session_name, "navigating");
        self.run_command(&["open", url]).await.map(|_| ())
    }

    async fn wait_for_load(&self, state: LoadState) -> Result<()> {
        self.run_command(&["wait", "--load", state.as_str()])
            .await
            .map(|_| ())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let output = self.run_command(&["is", "visible", selector]).await?;
        parse_bool(&output)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let output = self.run_command(&["get", "count", selector]).await?;
        parse_count(&output)
    }

    async fn current_url(&self) -> Result<String> {
        self.run_command(&["get", "url"])
            .await
            .map(|s| s.trim().to_string())
    }
}

fn parse_bool(output: &str) -> Result<bool> {
    match output.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(CloudSenseError::browser(format!(
            "expected true/false, got '{}'",
            other
        ))),
    }
}

fn parse_count(output: &str) -> Result<usize> {
    output
        .trim()
        .parse()
        .map_err(|_| CloudSenseError::browser(format!("expected a count, got '{}'", output.trim())))
}

impl Default for BrowserExecutor {
    fn default() -> Self {
        Self::new("cloudsense")
    }
}
