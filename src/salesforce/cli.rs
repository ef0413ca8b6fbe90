//! Salesforce CLI invocation
//!
//! Commands are always spawned with an argument vector. The org alias comes
//! from configuration or the command line and is passed as a single argv
//! element, never through a shell.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::core::config::SfCliConfig;
use crate::core::{CloudSenseError, Result};

/// Runs an external program and returns its stdout
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program args...` in `cwd`, returning stdout on success
    async fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> Result<String>;
}

/// [`CommandRunner`] backed by real child processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], cwd: Option<&Path>) -> Result<String> {
        let command_line = display_command(program, args);
        debug!(command = %command_line, "spawning");

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        cmd.env("NO_COLOR", "1");
        cmd.env("FORCE_COLOR", "0");
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CloudSenseError::ProgramNotFound(program.to_string())
            } else {
                CloudSenseError::cli(&command_line, format!("failed to spawn: {}", e))
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        // `sf --json` reports failures as JSON on stdout
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        Err(CloudSenseError::cli(
            command_line,
            format!("exit {}: {}", output.status.code().unwrap_or(-1), message),
        ))
    }
}

/// The `sf` binary bound to a project directory and runner
#[derive(Clone)]
pub struct SfCli {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    loglevel: String,
    project_path: Option<PathBuf>,
}

impl SfCli {
    /// Create a CLI wrapper that spawns real processes
    pub fn new(config: &SfCliConfig) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    /// Create a CLI wrapper over a custom runner
    pub fn with_runner(config: &SfCliConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            binary: config.binary.clone(),
            loglevel: config.loglevel.clone(),
            project_path: config.project_path.clone(),
        }
    }

    /// `sf org display --target-org <alias> --json`
    pub async fn org_display(&self, alias: &str) -> Result<String> {
        self.run_org_command("display", alias).await
    }

    /// `sf org open --target-org <alias> --json`
    pub async fn org_open(&self, alias: &str) -> Result<String> {
        self.run_org_command("open", alias).await
    }

    /// Argument vector for an `org` subcommand
    pub fn org_args(&self, subcommand: &str, alias: &str) -> Vec<String> {
        vec![
            "org".to_string(),
            subcommand.to_string(),
            "--target-org".to_string(),
            alias.to_string(),
            "--json".to_string(),
            "--loglevel".to_string(),
            self.loglevel.clone(),
        ]
    }

    async fn run_org_command(&self, subcommand: &str, alias: &str) -> Result<String> {
        let args = self.org_args(subcommand, alias);
        self.runner
            .run(&self.binary, &args, self.project_path.as_deref())
            .await
            .map_err(|e| match e {
                CloudSenseError::ProgramNotFound(_) => CloudSenseError::SfCliNotFound,
                other => other,
            })
    }
}

fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
