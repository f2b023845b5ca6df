use anyhow::anyhow;
use clap::Parser;
use env_logger::Builder;
use log::{LevelFilter, info};
use std::path::PathBuf;

use loyal_customers::AnalyzerConfig;
use loyal_customers::analyzer::run_analysis;

/// Report users who visited on several days and browsed several pages.
#[derive(Debug, Parser)]
#[command(name = "loyal-customers", version, about)]
struct Cli {
    /// Day log files, oldest first
    #[arg(value_name = "DAY_LOG", required = true, num_args = 2..)]
    day_logs: Vec<PathBuf>,

    /// TOML file with `min-days` and `min-distinct-pages`
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the minimum number of distinct days
    #[arg(long, value_name = "N")]
    min_days: Option<usize>,

    /// Override the minimum number of distinct pages
    #[arg(long, value_name = "N")]
    min_pages: Option<usize>,

    /// Debug output for this tool
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("loyal_customers"), if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .parse_default_env()
        .init();

    let config = match &cli.config {
        Some(path) => AnalyzerConfig::load(path).map_err(|e| anyhow!("{} ({})", e, path.display()))?,
        None => AnalyzerConfig::default(),
    };
    let config = config.with_overrides(cli.min_days, cli.min_pages).map_err(|e| anyhow!(e))?;
    info!("Using {:?}", config);

    let report = run_analysis(&cli.day_logs, config.criteria())?;
    for user in &report.loyal_users {
        println!("Loyal User: {}", user);
    }

    Ok(())
}
