//! CLI demo entry point.
//!
//! # Responsibility
//! - Run the dashboard startup flow over a JSON sample fixture.
//! - Print the resulting cards in display order.

use beactive_core::{
    default_log_level, init_logging, DashboardConfig, DashboardService, HealthSnapshot,
    InMemoryHealthSource, SummarySnapshot, SummaryStore,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "beactive-cli", version, about = "Render activity summary cards")]
struct Cli {
    /// JSON health snapshot (quantity samples, workouts).
    #[arg(long, required_unless_present = "preview")]
    fixture: Option<PathBuf>,

    /// JSON dashboard config; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the preview cards instead of reading a fixture.
    #[arg(long)]
    preview: bool,

    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("beactive-cli: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())?;
    }

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path).map_err(|err| err.to_string())?,
        None => DashboardConfig::default(),
    };

    if cli.preview {
        print_cards(&SummaryStore::preview(&config).snapshot());
        return Ok(());
    }

    let Some(fixture) = cli.fixture else {
        return Err("--fixture is required without --preview".to_string());
    };
    let snapshot = HealthSnapshot::load(&fixture).map_err(|err| err.to_string())?;
    let store = Arc::new(SummaryStore::new());
    let service = DashboardService::new(InMemoryHealthSource::new(snapshot), store, config);

    let report = service.start().await.map_err(|err| err.to_string())?;
    for failure in &report.failed {
        eprintln!("warning: {}", failure.error);
    }
    info!(
        "event=cli_render module=cli status=ok cards={}",
        service.store().len()
    );
    print_cards(&service.store().snapshot());
    Ok(())
}

fn print_cards(snapshot: &SummarySnapshot) {
    for record in snapshot.sorted_records() {
        println!(
            "{:<16} {:<14} {:>12}  [{} / {}]",
            record.title,
            record.subtitle,
            record.amount,
            record.icon.symbol_name(),
            record.accent.as_str()
        );
    }
}
