//! avscan: F-Secure scanner front end.
//!
//! `avscan scan <path>` prints the JSON report (or a markdown table with
//! `--table`), optionally storing it in Elasticsearch and POSTing it to a
//! webhook. `avscan update` refreshes the definitions and `avscan web`
//! starts the upload service.

mod commands;

use anyhow::Result;
use avscan_core::Config;
use clap::{Parser, Subcommand};
use commands::scan::ScanOptions;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "avscan", about = "F-Secure AntiVirus scanner plugin")]
struct Cli {
    /// Verbose output
    #[arg(short = 'V', long, global = true)]
    verbose: bool,

    /// Elasticsearch URL to store results in
    #[arg(long, global = true, env = "MALICE_ELASTICSEARCH_URL")]
    elasticsearch: Option<String>,

    /// Output as markdown table
    #[arg(short, long, global = true)]
    table: bool,

    /// POST results to the MALICE_ENDPOINT webhook
    #[arg(short, long, global = true)]
    callback: bool,

    /// Send the webhook through MALICE_PROXY
    #[arg(short = 'x', long, global = true)]
    proxy: bool,

    /// Scan timeout in seconds
    #[arg(long, global = true, env = "MALICE_TIMEOUT")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a file
    Scan {
        /// Path to the file to scan
        path: PathBuf,
    },
    /// Update virus definitions
    #[command(visible_alias = "u")]
    Update,
    /// Start the upload scan web service
    Web,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = avscan_infra::init_telemetry(cli.verbose) {
        eprintln!("Failed to initialize telemetry: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "avscan failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if cli.elasticsearch.is_some() {
        config.elasticsearch_url = cli.elasticsearch.clone();
    }

    match cli.command {
        Commands::Scan { ref path } => {
            let options = ScanOptions {
                table: cli.table,
                callback: cli.callback,
                proxy: cli.proxy,
                timeout_secs: cli.timeout.unwrap_or(config.timeout_secs),
            };
            commands::scan::run(&config, path, &options).await
        }
        Commands::Update => commands::update::run(&config).await,
        Commands::Web => avscan_api::run(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_with_flags() {
        let cli = Cli::try_parse_from([
            "avscan", "-V", "--table", "--timeout", "30", "scan", "/malware/sample",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(cli.table);
        assert_eq!(cli.timeout, Some(30));
        match cli.command {
            Commands::Scan { path } => assert_eq!(path, PathBuf::from("/malware/sample")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["avscan", "scan", "sample", "-c", "-x"]).unwrap();
        assert!(cli.callback);
        assert!(cli.proxy);
    }

    #[test]
    fn test_update_alias() {
        let cli = Cli::try_parse_from(["avscan", "u"]).unwrap();
        assert!(matches!(cli.command, Commands::Update));
    }

    #[test]
    fn test_scan_requires_path() {
        assert!(Cli::try_parse_from(["avscan", "scan"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["avscan"]).is_err());
    }
}
