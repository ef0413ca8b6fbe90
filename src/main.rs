//! CloudSense E2E harness
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;

use clap::Parser;
use cloudsense_e2e::cli::{run_command, Command};
use cloudsense_e2e::{Config, Harness};
use tracing_subscriber::EnvFilter;

/// CloudSense E2E harness - Salesforce session and page convergence tooling
#[derive(Parser, Debug)]
#[command(name = "cloudsense")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Target org alias (overrides config and SF_TARGET_ORG)
    #[arg(long, short = 'o', global = true)]
    org: Option<String>,

    /// Config file (.toml or .json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    /// Run in headed browser mode (visible window)
    #[arg(long, global = true)]
    headed: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Build configuration
    let mut config = match args.config {
        Some(ref path) => {
            let _ = dotenvy::dotenv();
            Config::load_from_path(path)?
        }
        None => Config::load(),
    };

    // Apply CLI overrides
    if let Some(ref org) = args.org {
        config.set_org_alias(org);
    }

    if args.headed {
        config.browser.headed = true;
    }

    let harness = Harness::with_config(config);
    let output = run_command(&args.command, &harness).await?;
    println!("{}", output);

    Ok(())
}
