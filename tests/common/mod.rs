//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use cloudsense_e2e::browser::{LoadState, PageHandle};
use cloudsense_e2e::core::config::SfCliConfig;
use cloudsense_e2e::harness::SHELL_SELECTOR;
use cloudsense_e2e::salesforce::{CommandRunner, SfCli, LOGIN_USERNAME_SELECTOR};
use cloudsense_e2e::wait::SPINNER_SELECTOR;
use cloudsense_e2e::{CloudSenseError, Result};

/// Canned reply for one CLI call
#[derive(Debug, Clone)]
pub enum Reply {
    Stdout(String),
    Fail(String),
}

/// Answers `sf org <subcommand>` calls from per-subcommand queues.
///
/// The last reply in a queue is repeated once the queue drains.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, subcommand: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(subcommand.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn stdout(self, subcommand: &str, stdout: &str) -> Self {
        self.reply(subcommand, Reply::Stdout(stdout.to_string()))
    }

    pub fn fail(self, subcommand: &str, message: &str) -> Self {
        self.reply(subcommand, Reply::Fail(message.to_string()))
    }

    /// Number of calls made for `org <subcommand>`
    pub fn count(&self, subcommand: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|args| args.get(1).map(String::as_str) == Some(subcommand))
            .count()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[String], _cwd: Option<&Path>) -> Result<String> {
        self.calls.lock().unwrap().push(args.to_vec());

        let subcommand = args.get(1).cloned().unwrap_or_default();
        let reply = {
            let mut replies = self.replies.lock().unwrap();
            let queue = replies.entry(subcommand.clone()).or_default();
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };

        match reply {
            Some(Reply::Stdout(out)) => Ok(out),
            Some(Reply::Fail(message)) => Err(CloudSenseError::cli(
                format!("{} {}", program, args.join(" ")),
                message,
            )),
            None => Err(CloudSenseError::cli(program, format!("no reply for {}", subcommand))),
        }
    }
}

/// `SfCli` over a scripted runner
pub fn sf_cli(runner: std::sync::Arc<ScriptedRunner>) -> SfCli {
    SfCli::with_runner(&SfCliConfig::default(), runner)
}

/// In-memory page
pub struct FakePage {
    pub visits: Mutex<Vec<String>>,
    pub loads: Mutex<Vec<LoadState>>,
    spinner_counts: Mutex<VecDeque<usize>>,
    login_visible: Mutex<VecDeque<bool>>,
    shell_visible: bool,
    visible: Vec<String>,
    pub probes: Mutex<u32>,
    pub checked: Mutex<Vec<String>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            visits: Mutex::new(Vec::new()),
            loads: Mutex::new(Vec::new()),
            spinner_counts: Mutex::new(VecDeque::from([0])),
            login_visible: Mutex::new(VecDeque::from([false])),
            shell_visible: true,
            visible: Vec::new(),
            probes: Mutex::new(0),
            checked: Mutex::new(Vec::new()),
        }
    }

    /// Spinner counts reported by successive probes, last one sticky
    pub fn with_spinners(self, counts: &[usize]) -> Self {
        *self.spinner_counts.lock().unwrap() = counts.iter().copied().collect();
        self
    }

    /// Login form visibility on successive checks, last one sticky
    pub fn with_login_form(self, visible: &[bool]) -> Self {
        *self.login_visible.lock().unwrap() = visible.iter().copied().collect();
        self
    }

    pub fn with_shell(mut self, visible: bool) -> Self {
        self.shell_visible = visible;
        self
    }

    /// Make `selector` visible; anything else besides the shell is hidden
    pub fn with_visible(mut self, selector: &str) -> Self {
        self.visible.push(selector.to_string());
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

fn next_sticky<T: Copy>(queue: &Mutex<VecDeque<T>>, default: T) -> T {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front().unwrap_or(default)
    } else {
        queue.front().copied().unwrap_or(default)
    }
}

#[async_trait]
impl PageHandle for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.visits.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn wait_for_load(&self, state: LoadState) -> Result<()> {
        self.loads.lock().unwrap().push(state);
        Ok(())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.checked.lock().unwrap().push(selector.to_string());
        if selector == LOGIN_USERNAME_SELECTOR {
            Ok(next_sticky(&self.login_visible, false))
        } else if selector == SHELL_SELECTOR {
            Ok(self.shell_visible)
        } else {
            Ok(self.visible.iter().any(|v| v == selector))
        }
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        assert_eq!(selector, SPINNER_SELECTOR);
        *self.probes.lock().unwrap() += 1;
        Ok(next_sticky(&self.spinner_counts, 0))
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.visits.lock().unwrap().last().cloned().unwrap_or_default())
    }
}
