//! `sysprobe-cli` – platform support checks from the command line
//!
//! Loads a detected platform and a list of support constraints from
//! `sysprobe.toml` (see [`config`]) and either:
//!
//! - `check`: reports whether the platform satisfies the constraints
//!   (exit 0 when supported, 1 when not), or
//! - `get <key>`: prints one platform attribute (`name`, `family`,
//!   `families`, `release`, `arch`).
//!
//! Configuration and usage errors exit with status 2.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sysprobe_platform::{PlatformIdentity, SupportMatcher, SupportSpecification};
use sysprobe_types::ProbeError;

#[derive(Debug, Parser)]
#[command(name = "sysprobe", version, about = "Check a platform against support constraints")]
struct Cli {
    /// Path to the probe config file.
    #[arg(long, short, global = true, default_value = config::DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate the support constraints against the platform.
    Check {
        /// Use this JSON array of constraint groups instead of the config's
        /// `[[supports]]` tables.
        #[arg(long)]
        json: Option<String>,
    },
    /// Print a single platform attribute.
    Get { key: String },
}

enum Outcome {
    Pass,
    Fail,
}

fn main() -> ExitCode {
    init_logging(std::env::var("SYSPROBE_LOG_FORMAT").as_deref() == Ok("json"));

    let cli = Cli::parse();

    match run(cli) {
        Ok(Outcome::Pass) => ExitCode::SUCCESS,
        Ok(Outcome::Fail) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr so stdout carries only results.  `RUST_LOG` selects the
/// filter, defaulting to `info`.  Returns `false` when a global subscriber
/// was already installed.
fn init_logging(json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.compact().try_init().is_ok()
    }
}

fn run(cli: Cli) -> Result<Outcome, ProbeError> {
    let cfg = config::load_from(&cli.config)?;
    debug!(path = %cli.config.display(), "config loaded");
    let platform = PlatformIdentity::new(cfg.platform()?.clone());

    match cli.command {
        Command::Check { json } => {
            let spec = match json {
                Some(raw) => parse_json_spec(&raw)?,
                None => cfg.supports,
            };
            let supported = SupportMatcher::evaluate(&spec, &platform);
            print_verdict(&platform, supported);
            Ok(if supported { Outcome::Pass } else { Outcome::Fail })
        }
        Command::Get { key } => match platform.attribute(&key) {
            Some(value) => {
                println!("{value}");
                Ok(Outcome::Pass)
            }
            None => {
                println!("{}", "(none)".dimmed());
                Ok(Outcome::Fail)
            }
        },
    }
}

fn parse_json_spec(raw: &str) -> Result<SupportSpecification, ProbeError> {
    serde_json::from_str(raw).map_err(|e| ProbeError::ConfigParse(e.to_string()))
}

fn print_verdict(platform: &PlatformIdentity, supported: bool) {
    let release = platform.release().unwrap_or("-");
    let target = format!("{} {} ({})", platform.name(), release, platform.arch());
    if supported {
        println!("{} {}", "✓ supported:".green().bold(), target);
    } else {
        println!("{} {}", "✗ unsupported:".red().bold(), target);
    }
}
