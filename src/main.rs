use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

use tempmon::cli::Cli;
use tempmon::config::Config;
use tempmon::datasources::FileTemperatureSource;
use tempmon::error::{Result, TempMonError};
use tempmon::logic::{self, Monitor, ShutdownFlag};
use tempmon::models::RuleSet;
use tempmon::pins::{PinInterface, SimulatedPins};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    tempmon::logging::init(cli.verbose);

    let program = std::env::args().next().unwrap_or_else(|| "tempmon".into());
    let config_path = Config::resolve_path(cli.config.clone());
    tracing::info!("Started {} config file {}", program, config_path.display());

    match run(&cli, &config_path).await {
        Ok(()) => {
            tracing::info!("Stopped {}", program);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli, config_path: &Path) -> Result<()> {
    let rules = Config::load(config_path)?;
    tracing::debug!(rules = rules.len(), "Rule set loaded");

    let source = FileTemperatureSource::new(cli.read_timeout());

    if cli.check {
        for line in logic::sample_all(&rules, &source).await {
            println!("{}", line);
        }
        return Ok(());
    }

    if cli.dry_run {
        tracing::info!("Dry run: outputs are simulated");
        monitor(cli, rules, source, SimulatedPins::new()).await
    } else {
        monitor(cli, rules, source, cli.sysfs_pins()).await
    }
}

async fn monitor<P: PinInterface>(
    cli: &Cli,
    rules: RuleSet,
    source: FileTemperatureSource,
    pins: P,
) -> Result<()> {
    let shutdown = ShutdownFlag::new();
    let mut monitor = Monitor::new(rules, source, pins, shutdown.clone(), cli.timing());
    monitor.initialize()?;

    logic::install_signal_handlers(shutdown).map_err(TempMonError::SignalSetup)?;

    monitor.run().await;
    Ok(())
}
