//! CLI commands
//!
//! Subcommands of the `cloudsense` binary and their handlers.

use std::path::PathBuf;

use clap::Subcommand;
use tracing::warn;

use crate::core::{CloudSenseError, Result};
use crate::harness::Harness;
use crate::salesforce::SalesforceAuth;

/// Harness subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show org details reported by `sf org display`
    OrgInfo,

    /// Resolve a URL that opens an authenticated session
    SessionUrl {
        /// Open the URL in the system browser instead of only printing it
        #[arg(long)]
        open: bool,
    },

    /// Build a frontdoor URL from a saved `sf org display --json` file
    Frontdoor {
        /// Path to the saved JSON
        auth_file: PathBuf,
    },

    /// Sign the agent-browser session in and wait for the page to settle
    Login {
        /// Fail when spinners or the Lightning shell do not settle in time
        #[arg(long)]
        strict: bool,
    },

    /// Sign in, then check the CloudSense app is visible; closes the session
    Verify,

    /// Print the effective configuration as TOML
    Config,
}

/// Execute a command, returning the text to print
pub async fn run_command(command: &Command, harness: &Harness) -> Result<String> {
    match command {
        Command::OrgInfo => {
            let info = harness.auth().org_info().await?;
            Ok(serde_json::to_string_pretty(&info)?)
        }

        Command::SessionUrl { open } => {
            let url = harness.auth().session_url().await?;
            if *open {
                webbrowser::open(&url)
                    .map_err(|e| CloudSenseError::with_context("Failed to open browser", e))?;
            }
            Ok(url)
        }

        Command::Frontdoor { auth_file } => SalesforceAuth::frontdoor_from_auth_file(auth_file),

        Command::Login { strict } => {
            let report = harness.login().await?;
            if *strict {
                report.spinners.into_result("spinners to clear")?;
                report.shell.into_result("the Lightning shell")?;
            }
            Ok(format!(
                "Signed in to '{}' (session '{}')\n  spinners: {}\n  shell:    {}",
                harness.auth().org_alias(),
                harness.browser().session_name(),
                describe(report.spinners),
                describe(report.shell),
            ))
        }

        Command::Verify => {
            let result = harness.verify_app().await;
            if let Err(e) = harness.browser().close().await {
                warn!(error = %e, "failed to close browser session");
            }
            let report = result?;
            Ok(format!(
                "'{}' is visible at {} (after {:?})",
                harness.config().cloudsense.app_name,
                report.url,
                report.app_visible_after,
            ))
        }

        Command::Config => harness.config().to_toml(),
    }
}

fn describe(outcome: crate::wait::WaitOutcome) -> String {
    if outcome.is_ready() {
        format!("ready after {:?}", outcome.elapsed())
    } else {
        format!("timed out after {:?}", outcome.elapsed())
    }
}
