//! CloudSense E2E harness
//!
//! Support code for end-to-end UI tests of the CloudSense Salesforce
//! extension: resolve an authenticated session URL for an org through the
//! `sf` CLI, drive a browser page to it, and let the page settle before
//! asserting.
//!
//! # Architecture
//!
//! - **Core**: Configuration, error handling and typed CLI payloads
//! - **Salesforce**: `sf` invocation, output extraction, session resolution
//! - **Browser**: Page handle trait and the agent-browser implementation
//! - **Wait**: Predicate polling and bounded retry
//! - **Harness**: The sign-in flow and app check tying the above together
//! - **CLI**: Subcommands of the `cloudsense` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use cloudsense_e2e::{Config, Harness};
//!
//! #[tokio::main]
//! async fn main() {
//!     let harness = Harness::with_config(Config::load());
//!     let report = harness.login().await.unwrap();
//!     assert!(report.is_ready());
//! }
//! ```

pub mod browser;
pub mod cli;
pub mod core;
pub mod harness;
pub mod salesforce;
pub mod wait;

// Re-export commonly used items
pub use core::{CloudSenseError, Config, Result};
pub use harness::{AppReport, Harness, LoginReport};
pub use salesforce::SalesforceAuth;
pub use wait::{retry_action, wait_for_no_spinners, RetryPolicy, WaitOutcome};
