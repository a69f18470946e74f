//! Binary crate for the `atmos` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive chat and configuration prompts
//! - Terminal rendering of the forecast transcript

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod terminal;

/// Log filter for a `-v` count; `RUST_LOG` wins when set.
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(cmd.verbose)));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    cmd.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_by_default() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn each_flag_raises_the_level() {
        assert_eq!(log_filter_from_verbosity(1), "info");
        assert_eq!(log_filter_from_verbosity(2), "debug");
        assert_eq!(log_filter_from_verbosity(3), "trace");
    }

    #[test]
    fn extra_flags_stay_at_trace() {
        assert_eq!(log_filter_from_verbosity(10), "trace");
        assert_eq!(log_filter_from_verbosity(u8::MAX), "trace");
    }

    #[test]
    fn verbose_flag_is_counted() {
        let cli = cli::Cli::parse_from(["atmos", "-vv", "status"]);
        assert_eq!(cli.verbose, 2);
    }
}
