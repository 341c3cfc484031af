//! sysload-reporter - version 0.1.0
//!
//! Console reporter of host utilization with tracing logging.
//! This is the main entry point that resolves configuration, installs the
//! shutdown signal handlers and runs the sampling loop or a subcommand.

mod cli;
mod commands;
mod config;
mod startup_checks;

use clap::Parser;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sysload_reporter::{run, Sampler, StatusLine};
use tokio::signal;
use tracing::{debug, error, info, Level};

use cli::{Args, Commands, LogLevel};
use commands::{command_check, command_config, command_test};
use config::{resolve_config, show_config, validate_effective_config, Config, DEFAULT_LOG_LEVEL};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr; stdout carries the status line.
fn setup_logging(config: &Config, args: &Args) {
    let level = match &args.log_level {
        Some(level) => level.clone(),
        None => match config
            .log_level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_lowercase()
            .as_str()
        {
            "off" => LogLevel::Off,
            "error" => LogLevel::Error,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Warn,
        },
    };

    if matches!(level, LogLevel::Off) {
        return;
    }

    let max_level = match &level {
        LogLevel::Off | LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    info!("Logging initialized with level: {:?}", level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Spawns a task that sets `stop` on SIGINT or SIGTERM.
fn install_shutdown_handler(stop: Arc<AtomicBool>) -> io::Result<()> {
    #[cfg(unix)]
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    tokio::spawn(async move {
        #[cfg(unix)]
        let terminate = terminate.recv();

        #[cfg(not(unix))]
        let terminate = std::future::pending::<Option<()>>();

        tokio::select! {
            result = signal::ctrl_c() => match result {
                Ok(()) => info!("Received SIGINT (Ctrl+C), shutting down gracefully..."),
                Err(e) => {
                    error!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
            },
            _ = terminate => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }

        stop.store(true, Ordering::SeqCst);
    });

    Ok(())
}

/// Main application entry point.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format.clone());
    }

    // Config generation doesn't need config validation
    if let Some(Commands::Config {
        output,
        format,
        commented,
    }) = &args.command
    {
        return command_config(output.clone(), format.clone(), *commented);
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config, &args);

    match &args.command {
        Some(Commands::Check) => return command_check(&config),
        Some(Commands::Test {
            iterations,
            verbose,
        }) => return command_test(*iterations, *verbose, &config).await,
        Some(Commands::Config { .. }) => unreachable!("Config handled above"),
        None => {}
    }

    info!("Starting sysload-reporter");

    let sampler_config = config.sampler_config();
    if let Err(e) = startup_checks::validate_sources(&sampler_config) {
        error!("❌ Startup validation failed: {}", e);
        error!("   Sampling will start but affected metrics may fail!");
        // Continue anyway - the sampler's failure policy decides
    }

    let stop = Arc::new(AtomicBool::new(false));
    install_shutdown_handler(stop.clone())?;

    let interval = Duration::from_millis(config.interval_ms());
    debug!(
        "Sampling every {:?}, count limit: {:?}, sources: {:?}",
        interval, config.count, sampler_config
    );

    let mut sampler = Sampler::new(sampler_config);
    let mut status = StatusLine::new(io::stdout());

    match run(&mut sampler, &mut status, interval, config.count, stop).await {
        Ok(ticks) => {
            info!("sysload-reporter stopped gracefully after {} samples", ticks);
            Ok(())
        }
        Err(e) => {
            error!("Sampling stopped on a fatal error: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
