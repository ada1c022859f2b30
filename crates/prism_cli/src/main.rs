//! Prism CLI: maintenance tool for persistent shader caches.
//!
//! Provides `prism inspect` for a read-only report on a cache file pair and
//! `prism clear` for a full cache reset.

#![warn(missing_docs)]

mod clear;
mod inspect;
mod target;

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use prism_common::FeatureLevel;
use tracing_subscriber::EnvFilter;

/// Persistent shader bytecode cache tools.
#[derive(Parser, Debug)]
#[command(name = "prism", version, about = "Prism shader cache tools")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `prism.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report on a cache file pair without modifying it.
    Inspect(InspectArgs),
    /// Delete a cache file pair.
    Clear(TargetArgs),
}

/// Selects which cache file pair to operate on.
///
/// Flags override the configuration file.
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Cache directory.
    #[arg(short, long)]
    pub dir: Option<String>,

    /// Feature level (e.g. "11_0").
    #[arg(short = 'l', long)]
    pub feature_level: Option<FeatureLevel>,

    /// Select the debug-compiled cache.
    #[arg(long)]
    pub debug: bool,
}

/// Arguments for the `prism inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Which cache to inspect.
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a configuration file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Inspect(ref args) => inspect::run(args, &global),
        Command::Clear(ref args) => clear::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs a stderr subscriber; `RUST_LOG` wins over the flags.
fn init_logging(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_inspect_default() {
        let cli = Cli::parse_from(["prism", "inspect"]);
        match cli.command {
            Command::Inspect(ref args) => {
                assert!(args.target.dir.is_none());
                assert!(args.target.feature_level.is_none());
                assert!(!args.target.debug);
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Inspect command"),
        }
    }

    #[test]
    fn parse_inspect_with_args() {
        let cli = Cli::parse_from([
            "prism",
            "inspect",
            "--dir",
            "cache",
            "--feature-level",
            "10_1",
            "--debug",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Inspect(ref args) => {
                assert_eq!(args.target.dir.as_deref(), Some("cache"));
                assert_eq!(args.target.feature_level, Some(FeatureLevel::Level10_1));
                assert!(args.target.debug);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Inspect command"),
        }
    }

    #[test]
    fn parse_clear_short_flags() {
        let cli = Cli::parse_from(["prism", "clear", "-d", "shaders", "-l", "12.1"]);
        match cli.command {
            Command::Clear(ref args) => {
                assert_eq!(args.dir.as_deref(), Some("shaders"));
                assert_eq!(args.feature_level, Some(FeatureLevel::Level12_1));
            }
            _ => panic!("expected Clear command"),
        }
    }

    #[test]
    fn invalid_feature_level_rejected() {
        let result = Cli::try_parse_from(["prism", "clear", "--feature-level", "9_3"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["prism", "--quiet", "--config", "prism.toml", "inspect"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("prism.toml"));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["prism", "clear", "--verbose"]);
        assert!(cli.verbose);
    }
}
