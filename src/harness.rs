//! Test harness
//!
//! Bundles the configuration, the session resolver and a browser page, and
//! runs the sign-in flow every test starts with: authenticate, let spinners
//! clear, wait for the Lightning shell. `verify_app` additionally checks the
//! CloudSense app is open once the shell is up.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::browser::{BrowserExecutor, LoadState, PageHandle};
use crate::core::{CloudSenseError, Config, Result};
use crate::salesforce::{CommandRunner, SalesforceAuth, SfCli};
use crate::wait::{
    retry_action, wait_for_any_visible, wait_for_no_spinners, wait_for_visible, PollOptions,
    WaitOutcome,
};

/// Global header rendered once the Lightning shell is up
pub const SHELL_SELECTOR: &str = r#"header[role="banner"], div.slds-global-header"#;

/// What the sign-in flow observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginReport {
    pub spinners: WaitOutcome,
    pub shell: WaitOutcome,
}

impl LoginReport {
    /// Both waits converged
    pub fn is_ready(&self) -> bool {
        self.spinners.is_ready() && self.shell.is_ready()
    }
}

/// What the app check observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppReport {
    pub login: LoginReport,
    /// Time until the app showed
    pub app_visible_after: Duration,
    /// Page URL when the app was found
    pub url: String,
}

/// Selectors that show `app_name` is the open Lightning app
pub fn app_selectors(app_name: &str) -> Vec<String> {
    let quoted = app_name.replace('\\', "\\\\").replace('"', "\\\"");
    vec![
        format!(r#"span[title="{}"]"#, quoted),
        format!(r#"span:has-text("{}")"#, quoted),
        format!(r#"a:has-text("{}")"#, quoted),
    ]
}

/// Harness for one org and one browser session
pub struct Harness {
    config: Config,
    auth: SalesforceAuth,
    browser: BrowserExecutor,
}

impl Harness {
    /// Create a harness from configuration, spawning real processes
    pub fn with_config(config: Config) -> Self {
        let cli = SfCli::new(&config.sf);
        let browser = BrowserExecutor::from_config(&config.browser);
        Self::build(config, cli, browser)
    }

    /// Create a harness whose `sf` and agent-browser calls go through `runner`
    pub fn with_runner(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        let cli = SfCli::with_runner(&config.sf, runner.clone());
        let browser = BrowserExecutor::from_config(&config.browser).with_runner(runner);
        Self::build(config, cli, browser)
    }

    fn build(config: Config, cli: SfCli, browser: BrowserExecutor) -> Self {
        let auth = SalesforceAuth::new(config.salesforce.org_alias.clone(), cli)
            .with_fallback_instance_url(config.sf.fallback_instance_url.clone());
        Self {
            config,
            auth,
            browser,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth(&self) -> &SalesforceAuth {
        &self.auth
    }

    pub fn browser(&self) -> &BrowserExecutor {
        &self.browser
    }

    /// Sign in on the harness's own browser session
    pub async fn login(&self) -> Result<LoginReport> {
        self.login_on(&self.browser).await
    }

    /// Sign in on `page`.
    ///
    /// Authentication is retried per the configured policy. The waits that
    /// follow never fail; inspect the report to decide.
    pub async fn login_on(&self, page: &dyn PageHandle) -> Result<LoginReport> {
        let policy = self.config.retry_policy();
        retry_action(&policy, move || self.auth.authenticate_in_browser(page)).await?;

        let spinners = wait_for_no_spinners(page, self.spinner_poll()).await;

        if let Some(url) = self.config.lightning_url() {
            page.goto(&url).await?;
            page.wait_for_load(LoadState::DomContentLoaded).await?;
        }

        let shell = wait_for_visible(page, SHELL_SELECTOR, self.page_ready_poll()).await;

        let report = LoginReport { spinners, shell };
        if report.is_ready() {
            info!(org = %self.auth.org_alias(), "signed in");
        } else {
            warn!(org = %self.auth.org_alias(), ?report, "signed in, page not settled");
        }
        Ok(report)
    }

    /// Sign in on the harness's own browser session and check the app
    pub async fn verify_app(&self) -> Result<AppReport> {
        self.verify_app_on(&self.browser).await
    }

    /// Sign in on `page`, then require the Lightning shell and the configured
    /// app to be visible.
    pub async fn verify_app_on(&self, page: &dyn PageHandle) -> Result<AppReport> {
        let login = self.login_on(page).await?;
        login.shell.into_result("the Lightning shell")?;

        let app = &self.config.cloudsense.app_name;
        let outcome =
            wait_for_any_visible(page, &app_selectors(app), self.page_ready_poll()).await;
        let url = page.current_url().await.unwrap_or_default();

        match outcome {
            WaitOutcome::Ready { elapsed } => {
                info!(app = %app, url = %url, "app is visible");
                Ok(AppReport {
                    login,
                    app_visible_after: elapsed,
                    url,
                })
            }
            WaitOutcome::TimedOut { .. } => Err(CloudSenseError::AppNotVisible {
                app: app.clone(),
                url,
            }),
        }
    }

    fn spinner_poll(&self) -> PollOptions {
        PollOptions::new(self.config.spinner_timeout()).with_interval(self.config.poll_interval())
    }

    fn page_ready_poll(&self) -> PollOptions {
        PollOptions::new(self.config.page_ready_timeout())
            .with_interval(self.config.poll_interval())
    }
}
