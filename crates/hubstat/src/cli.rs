//! Clap derive structures for the hubstat exporter.

use std::path::PathBuf;

use clap::Parser;

/// hubstat -- Prometheus exporter for GitHub repository statistics
#[derive(Debug, Parser)]
#[command(
    name = "hubstat",
    version,
    about = "Export GitHub repository statistics as Prometheus metrics",
    long_about = "Polls the GitHub API for repository statistics (stars, forks, open \n\
        issues, open pull requests) and serves them on /metrics. Repositories \n\
        are named explicitly or enumerated from configured users; results are \n\
        cached between scrapes."
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', env = "HUBSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address override (e.g. 0.0.0.0:9090)
    #[arg(long, env = "HUBSTAT_LISTEN")]
    pub listen: Option<String>,

    /// Log debug messages
    #[arg(long, short = 'd')]
    pub debug: bool,
}
