//! Salesforce module
//!
//! `sf` CLI invocation, output extraction and session URL resolution.

pub mod auth;
pub mod cli;
pub mod output;

pub use auth::{classify_open_output, parse_org_info, SalesforceAuth, LOGIN_USERNAME_SELECTOR};
pub use cli::{CommandRunner, ProcessRunner, SfCli};
