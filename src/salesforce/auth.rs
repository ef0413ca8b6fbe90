//! Org session resolution
//!
//! Turns an org alias into a URL that lands a browser in an authenticated
//! Lightning session. `sf org open` output is read JSON first, then as a bare
//! URL, then as an opaque session id that is exchanged through frontdoor.jsp
//! on the org's instance.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::browser::{LoadState, PageHandle};
use crate::core::config::DEFAULT_INSTANCE_URL;
use crate::core::{CliEnvelope, CloudSenseError, OrgInfo, Result, SessionSource};
use crate::salesforce::cli::SfCli;
use crate::salesforce::output::{
    first_url, frontdoor_url, parse_embedded_json, snippet, url_from_json,
};

/// Username field of the classic login form
pub const LOGIN_USERNAME_SELECTOR: &str = r#"input[placeholder="Username"]"#;

/// Session resolver for one org alias
#[derive(Clone)]
pub struct SalesforceAuth {
    org_alias: String,
    cli: SfCli,
    fallback_instance_url: String,
}

impl SalesforceAuth {
    /// Create a resolver for `org_alias`
    pub fn new(org_alias: impl Into<String>, cli: SfCli) -> Self {
        Self {
            org_alias: org_alias.into(),
            cli,
            fallback_instance_url: DEFAULT_INSTANCE_URL.to_string(),
        }
    }

    /// Instance used for frontdoor URLs when org display reports none
    pub fn with_fallback_instance_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_instance_url = url.into();
        self
    }

    pub fn org_alias(&self) -> &str {
        &self.org_alias
    }

    /// Org details from `sf org display`
    pub async fn org_info(&self) -> Result<OrgInfo> {
        self.fetch_org_info()
            .await
            .map_err(|e| CloudSenseError::with_context("Failed to get org info", e))
    }

    async fn fetch_org_info(&self) -> Result<OrgInfo> {
        let stdout = self.cli.org_display(&self.org_alias).await?;
        parse_org_info(&stdout)
    }

    /// URL that opens an authenticated session in a browser
    pub async fn session_url(&self) -> Result<String> {
        self.resolve_session_url()
            .await
            .map_err(|e| CloudSenseError::with_context("Failed to get session URL", e))
    }

    async fn resolve_session_url(&self) -> Result<String> {
        let stdout = self.cli.org_open(&self.org_alias).await?;

        match classify_open_output(&stdout) {
            Some(SessionSource::Direct(url)) => {
                info!(org = %self.org_alias, "session URL resolved from CLI output");
                Ok(url)
            }
            Some(SessionSource::Token(token)) => {
                warn!(org = %self.org_alias, "no URL in CLI output, composing frontdoor URL");
                let info = self.org_info().await?;
                let instance = info
                    .instance_url
                    .filter(|u| !u.trim().is_empty())
                    .unwrap_or_else(|| self.fallback_instance_url.clone());
                frontdoor_url(&instance, &token)
            }
            None => Err(CloudSenseError::session(format!(
                "no URL or session id in CLI output: '{}'",
                snippet(&stdout)
            ))),
        }
    }

    /// Navigate `page` into an authenticated session.
    ///
    /// Lands on the login form when the one-time URL was already spent; in
    /// that case a fresh URL is resolved and tried once more.
    pub async fn authenticate_in_browser(&self, page: &dyn PageHandle) -> Result<()> {
        let auth_url = self.session_url().await?;
        page.goto(&auth_url).await?;
        page.wait_for_load(LoadState::NetworkIdle).await?;

        if page
            .is_visible(LOGIN_USERNAME_SELECTOR)
            .await
            .unwrap_or(false)
        {
            warn!(org = %self.org_alias, "landed on login page, retrying with a fresh URL");
            let retry_url = self.session_url().await?;
            if retry_url != auth_url {
                page.goto(&retry_url).await?;
                page.wait_for_load(LoadState::NetworkIdle).await?;
            } else {
                debug!("CLI returned the same URL, not navigating again");
            }
        }

        Ok(())
    }

    /// Frontdoor URL from a saved `sf org display --json` file
    pub fn frontdoor_from_auth_file(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).map_err(|e| {
            CloudSenseError::with_context(format!("Failed to read {}", path.display()), e)
        })?;
        parse_org_info(&content)?.frontdoor_url()
    }
}

impl OrgInfo {
    /// `<instanceUrl>/secur/frontdoor.jsp?sid=<accessToken>`
    pub fn frontdoor_url(&self) -> Result<String> {
        match (self.instance_url.as_deref(), self.access_token.as_deref()) {
            (Some(instance), Some(token)) => frontdoor_url(instance, token),
            _ => Err(CloudSenseError::session(
                "org info needs both instanceUrl and accessToken",
            )),
        }
    }
}

/// Parse `sf org display --json` output, tolerating surrounding noise
pub fn parse_org_info(stdout: &str) -> Result<OrgInfo> {
    let value = parse_embedded_json(stdout)?;
    let envelope: CliEnvelope<OrgInfo> = serde_json::from_value(value)?;
    Ok(envelope.result.unwrap_or_default())
}

/// Decide what `sf org open` printed.
///
/// `None` means the output was blank.
pub fn classify_open_output(stdout: &str) -> Option<SessionSource> {
    let trimmed = stdout.trim();

    if let Ok(value) = parse_embedded_json(trimmed) {
        if let Some(url) = url_from_json(&value) {
            return Some(SessionSource::Direct(url));
        }
    }

    if let Some(url) = first_url(trimmed) {
        return Some(SessionSource::Direct(url.to_string()));
    }

    if trimmed.is_empty() {
        None
    } else {
        Some(SessionSource::Token(trimmed.to_string()))
    }
}
