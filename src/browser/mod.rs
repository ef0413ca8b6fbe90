//! Browser module
//!
//! Page handle trait and its agent-browser implementation.

mod executor;
mod page;

pub use executor::BrowserExecutor;
pub use page::{LoadState, PageHandle};
