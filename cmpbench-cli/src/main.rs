use anyhow::{Context, Result};
use clap::Parser;
use cmpbench_config::{BenchConfig, ConfigLoader, LogFormat, LoggingConfig};
use cmpbench_core::{BenchmarkRunner, IdentitySource, RunSettings, TargetRegistry};
use cmpbench_http::{HttpClient, HttpManager};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands, ConfigCommands, RunArgs};

/// Load configuration from file or from defaults plus environment
fn load_config(config_path: Option<&PathBuf>) -> Result<BenchConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}

/// Initialize tracing on stderr; stdout is reserved for the report
///
/// `--log-level` wins, then `RUST_LOG`, then the configured level.
fn init_tracing(logging: &LoggingConfig, log_level: Option<&String>) -> Result<()> {
    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| {
            eprintln!(
                "Invalid log level '{}', falling back to '{}'",
                level, logging.level
            );
            EnvFilter::new(logging.level.as_str())
        }),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str())),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    debug!("Tracing initialized ({} format)", logging.format);
    Ok(())
}

/// Fold command-line overrides into the loaded configuration and re-validate
fn apply_run_overrides(config: &mut BenchConfig, args: &RunArgs) -> Result<()> {
    if let Some(requests) = args.requests {
        config.benchmark.requests_per_target = requests;
    }
    if let Some(workers) = args.workers {
        config.benchmark.workers = workers;
    }
    if args.seed.is_some() {
        config.benchmark.seed = args.seed;
    }
    if args.log_bodies {
        config.benchmark.log_bodies = true;
    }

    config
        .validate_all()
        .context("Invalid command-line overrides")
}

/// Benchmark the selected targets and print the report to stdout
async fn run_command(mut config: BenchConfig, args: &RunArgs) -> Result<()> {
    apply_run_overrides(&mut config, args)?;

    let http = HttpManager::with_config(config.http.clone().into())
        .context("Failed to build HTTP client")?;
    let client: Arc<dyn HttpClient> = Arc::new(http);

    let registry = TargetRegistry::from_config(&config.targets)?;
    // Resolved against the full registry so the source need not be benchmarked
    let identities = IdentitySource::from_config(Arc::clone(&client), &registry, &config.identity)?;
    let registry = if args.targets.is_empty() {
        registry
    } else {
        registry.select(&args.targets)?
    };

    info!(
        "Benchmarking {} targets: {} requests each on {} workers",
        registry.len(),
        config.benchmark.requests_per_target,
        config.benchmark.workers
    );
    debug!("Identity source: {}", identities.url());

    let mut runner = BenchmarkRunner::new(client, RunSettings::from(&config.benchmark));
    let report = runner.run_all(&registry, &identities).await?;

    if let Some(fastest) = report.fastest() {
        info!("Fastest target: {}", fastest.name);
    }
    println!("{}", report);
    Ok(())
}

/// Print the configured targets in benchmark order
fn handle_targets(config: &BenchConfig) -> Result<()> {
    let registry = TargetRegistry::from_config(&config.targets)?;

    for target in registry.iter() {
        let marker = if target.name() == config.identity.target {
            " (identity source)"
        } else {
            ""
        };
        println!(
            "{:>10}: {} [{}]{}",
            target.name(),
            target.endpoint(),
            target.pagination(),
            marker
        );
    }
    Ok(())
}

/// Handle configuration validation
fn handle_config_validate(config_file: &PathBuf) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file not found: {:?}",
            config_file
        ));
    }

    match load_config(Some(config_file)) {
        Ok(config) => {
            println!(
                "✅ Configuration file is valid ({} targets)",
                config.targets.len()
            );
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {:#}", e);
            error!("Configuration validation failed: {:#}", e);
            Err(e)
        }
    }
}

/// Write the default configuration as YAML
fn handle_config_generate(output: &PathBuf, force: bool) -> Result<()> {
    info!("Generating configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    fs::write(output, BenchConfig::generate_sample())
        .context("Failed to write configuration file")?;

    println!("✅ Configuration generated at: {:?}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));

    // Config commands work on an explicit file, not the loaded configuration
    if let Commands::Config { config_cmd } = &command {
        init_tracing(&LoggingConfig::default(), cli.log_level.as_ref())?;
        return match config_cmd {
            ConfigCommands::Validate { config_file } => handle_config_validate(config_file),
            ConfigCommands::Generate { output, force } => handle_config_generate(output, *force),
        };
    }

    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config.logging, cli.log_level.as_ref())?;
    debug!("cmpbench starting");

    match command {
        Commands::Run(args) => run_command(config, &args).await,
        Commands::Targets => handle_targets(&config),
        Commands::Config { .. } => Ok(()),
    }
}
