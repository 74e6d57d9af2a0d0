mod alerts;
mod collectors;
mod config;
mod error;
mod models;
mod monitor;
mod util;

use alerts::Origin;
use anyhow::{bail, Context, Result};
use clap::Parser;
use config::Config;
use std::path::{Path, PathBuf};
use tracing::info;
use util::notify::{DryRunNotifier, Notifier};
use util::sns::SnsNotifier;

#[derive(Parser, Debug)]
#[command(name = "diskwatch", about = "Alert via SNS when disk usage crosses a threshold", version)]
struct Cli {
    /// Path to the TOML config (default: <config dir>/diskwatch/diskwatch.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured threshold (0-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Evaluate targets and log alerts without publishing them
    #[arg(long)]
    dry_run: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Write a starter config file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable debug output (raw df output, SDK setup)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.init_config {
        return run_init_config(cli.config.as_deref());
    }

    let mut cfg = Config::load(cli.config.as_deref()).context("loading configuration")?;
    // clap already bounds the override to 0-100
    if let Some(t) = cli.threshold {
        cfg.threshold = t;
    }

    if cli.print_config {
        return run_print_config(&cfg, cli.config.as_deref());
    }

    run_monitor(&cfg, cli.dry_run).await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .with_level(verbose)
        .init();
}

fn run_init_config(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None    => Config::config_path().context("no config directory available")?,
    };
    config::write_template(&path)?;
    println!("Wrote starter config to {}", path.display());
    Ok(())
}

fn run_print_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(Config::config_path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    println!("# Config: {}", path);
    println!();
    print!("{}", cfg.to_toml().context("rendering configuration")?);
    Ok(())
}

async fn run_monitor(cfg: &Config, dry_run: bool) -> Result<()> {
    let sampler = collectors::for_kind(cfg.sampler);
    let notifier: Box<dyn Notifier> = if dry_run {
        Box::new(DryRunNotifier { topic: cfg.topic.clone() })
    } else {
        Box::new(SnsNotifier::new(&cfg.region, &cfg.topic).await)
    };
    let origin = Origin::current();

    info!(
        "diskwatch checking {} target(s) on {} (threshold {}%)",
        cfg.targets.len(), origin.host, cfg.threshold
    );

    let report = monitor::run(cfg, sampler.as_ref(), notifier.as_ref(), &origin).await?;

    info!(
        "Done: {} target(s) sampled, {} alert(s) sent",
        report.sampled, report.alerts_sent
    );
    if !report.is_success() {
        bail!(
            "{} of {} target(s) failed: {}",
            report.failures.len(),
            cfg.targets.len(),
            report.failures.iter().map(|f| f.label()).collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}
