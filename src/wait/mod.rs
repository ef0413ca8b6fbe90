//! Convergence helpers
//!
//! Polling waits for page predicates and a bounded retry loop for flaky
//! actions.

mod poll;
mod retry;

pub use poll::{
    poll_until, wait_for_any_visible, wait_for_no_spinners, wait_for_visible, PollOptions,
    WaitOutcome, DEFAULT_POLL_INTERVAL, DEFAULT_SPINNER_TIMEOUT, SPINNER_SELECTOR,
};
pub use retry::{retry_action, RetryPolicy};
