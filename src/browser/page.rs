//! Page handle abstraction
//!
//! The session resolver and the convergence helpers only need a handful of
//! page operations, so they work against this trait rather than a concrete
//! browser driver.

use async_trait::async_trait;

use crate::core::Result;

/// Load states accepted by [`PageHandle::wait_for_load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Load,
    DomContentLoaded,
    NetworkIdle,
}

impl LoadState {
    /// Name understood by browser drivers
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A browser page owned by a single test
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigate to a URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// Wait for the page to reach a load state
    async fn wait_for_load(&self, state: LoadState) -> Result<()>;

    /// Whether the first element matching `selector` is visible
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> Result<usize>;

    /// URL currently loaded
    async fn current_url(&self) -> Result<String>;
}
