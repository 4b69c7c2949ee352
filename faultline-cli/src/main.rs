use anyhow::{Context, Result};
use clap::Parser;
use faultline_config::{ConfigLoader, FaultlineConfig};
use faultline_core::Report;
use faultline_engine::{CancellationToken, ScenarioOrchestrator};
use faultline_http::HttpManager;
use faultline_logging::{init_logging_from_config, init_simple_tracing, WorkerGuard};
use faultline_output::ReportWriter;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

mod cli;
use cli::{Cli, Commands, ConfigCommands};

/// Exit status after a Ctrl-C, matching the shell convention for SIGINT
const EXIT_INTERRUPTED: u8 = 130;

/// Load configuration from file, or from environment and defaults
fn load_config(config_path: Option<&Path>) -> Result<FaultlineConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => {
            if path.exists() {
                info!("Loading configuration from: {:?}", path);
                loader
                    .from_file(path)
                    .context(format!("Failed to load configuration from {:?}", path))
            } else {
                warn!("Configuration file not found: {:?}. Using defaults.", path);
                loader
                    .from_env()
                    .context("Failed to load configuration from environment")
            }
        }
        None => {
            debug!("No configuration file specified. Loading from environment or defaults.");
            loader
                .from_env()
                .context("Failed to load configuration from environment")
        }
    }
}

/// Initialize logging from configuration with fallback to simple tracing
fn init_logging(config: &FaultlineConfig, log_level: Option<&str>) -> Result<Option<WorkerGuard>> {
    match init_logging_from_config(&config.logging, log_level) {
        Ok(guard) => {
            debug!("Logging initialized");
            Ok(guard)
        }
        Err(e) => {
            eprintln!(
                "Failed to initialize configured logging: {}, falling back to simple tracing",
                e
            );
            init_simple_tracing(log_level.unwrap_or("info"))?;
            Ok(None)
        }
    }
}

/// Cancel the run on the first Ctrl-C; exit immediately on the second
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Unable to listen for Ctrl-C; interrupts will not be handled gracefully");
            return;
        }
        warn!("Interrupt received: stopping the current scenario and writing a partial report");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Second interrupt received, exiting without cleanup");
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
    });
}

/// Run every configured scenario and write the report
async fn run_command(config: FaultlineConfig) -> Result<ExitCode> {
    info!(
        target_url = %config.target.base_url,
        control_plane = %config.control_plane.api_url,
        scenarios = config.scenarios.len(),
        concurrency = config.load.concurrency,
        "Starting chaos run"
    );

    let http = HttpManager::with_config((&config.http).into());
    let cancel = CancellationToken::new();
    let orchestrator = ScenarioOrchestrator::from_config(&config, &http)
        .context("Failed to set up the run")?
        .with_cancellation(cancel.clone());

    spawn_interrupt_handler(cancel);

    let outcome = orchestrator.run().await.context("Run aborted")?;

    let report = Report::new(config.report.title.clone(), outcome.results)
        .interrupted(outcome.interrupted);
    let path = ReportWriter::from_config(&config.report)
        .write(&report)
        .await
        .context("Failed to write report")?;

    println!("{}", path.display());

    if outcome.interrupted {
        warn!(path = %path.display(), "Run interrupted; partial report written");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    info!(path = %path.display(), "Chaos run complete");
    Ok(ExitCode::SUCCESS)
}

/// Print the scenario sequence in execution order
fn list_scenarios(config: &FaultlineConfig) {
    for (index, scenario) in config.scenarios.iter().enumerate() {
        let fault = scenario
            .fault
            .as_ref()
            .map(|fault| fault.to_string())
            .unwrap_or_else(|| "none".to_string());
        println!(
            "{:>2}. {:<24} {:>4}s @ {:<6} rps  fault: {}",
            index + 1,
            scenario.name,
            scenario.duration_secs,
            scenario.target_rate,
            fault
        );
    }
}

/// Handle configuration validation
fn handle_config_validate(file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", file);

    if !file.exists() {
        return Err(anyhow::anyhow!("Configuration file not found: {:?}", file));
    }

    match ConfigLoader::new().from_file(file) {
        Ok(config) => {
            println!(
                "✅ Configuration file is valid ({} scenarios)",
                config.scenarios.len()
            );
            info!("Configuration validation passed");
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {}", e);
            error!("Configuration validation failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handle configuration generation
fn handle_config_generate(output: &Path, force: bool) -> Result<()> {
    info!("Generating configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
    }

    fs::write(output, FaultlineConfig::generate_sample())
        .with_context(|| format!("Failed to write configuration to {:?}", output))?;

    println!("✅ Configuration written to {:?}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Config commands operate on a named file, not the run configuration
    if let Some(Commands::Config { config_cmd }) = &cli.command {
        init_simple_tracing(cli.log_level.as_deref().unwrap_or("warn"))?;
        match config_cmd {
            ConfigCommands::Validate { file } => handle_config_validate(file)?,
            ConfigCommands::Generate { output, force } => handle_config_generate(output, *force)?,
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(output_dir) = &cli.output_dir {
        config.report.output_dir = output_dir.clone();
    }
    if cli.json {
        config.report.write_json = true;
    }

    let _log_guard = init_logging(&config, cli.log_level.as_deref())?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_command(config).await,
        Commands::Scenarios => {
            list_scenarios(&config);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { .. } => Ok(ExitCode::SUCCESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_then_validate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("faultline.yaml");

        handle_config_generate(&path, false).unwrap();
        assert!(path.exists());
        handle_config_validate(&path).unwrap();

        // Refuses to overwrite without --force
        assert!(handle_config_generate(&path, false).is_err());
        assert!(handle_config_generate(&path, true).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.yaml");
        fs::write(&path, "scenarios: []\n").unwrap();

        assert!(handle_config_validate(&path).is_err());
        assert!(handle_config_validate(&temp_dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.yaml");
        let config = load_config(Some(missing.as_path())).unwrap();
        assert_eq!(config.scenarios.len(), 4);
    }
}
