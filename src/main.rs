// hybridconn - Azure App Service Hybrid Connection reconciler
// Copyright (c) 2025 Hybridconn Contributors
// Licensed under the MIT License

use clap::Parser;
use hybridconn::cli::{Cli, Commands};
use hybridconn::config::{load_config, LoggingConfig};
use hybridconn::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = logging_settings(&cli);
    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "hybridconn - App Service Hybrid Connection reconciler"
    );

    let (stop_tx, stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C), abandoning in-flight operation...");
                    println!("\n⚠️  Stop signal received, abandoning in-flight operation...");
                    let _ = stop_tx.send(true);
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, abandoning in-flight operation...");
                    println!("\n⚠️  Stop signal received, abandoning in-flight operation...");
                    let _ = stop_tx.send(true);
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), abandoning in-flight operation...");
                println!("\n⚠️  Stop signal received, abandoning in-flight operation...");
                let _ = stop_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, stop_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    drop(logging_guard);
    process::exit(exit_code);
}

/// Log level and logging sections to start with
///
/// The configuration file is consulted when it loads; otherwise console
/// logging is used and the command reports the configuration error itself.
fn logging_settings(cli: &Cli) -> (String, LoggingConfig) {
    let loaded = if cli.command.uses_config() {
        load_config(&cli.config).ok()
    } else {
        None
    };

    match loaded {
        Some(config) => (
            cli.log_level
                .clone()
                .unwrap_or(config.application.log_level),
            config.logging,
        ),
        None => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, stop_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Apply(args) => args.execute(&cli.config, stop_signal).await,
        Commands::Refresh(args) => args.execute(&cli.config, stop_signal).await,
        Commands::Destroy(args) => args.execute(&cli.config, stop_signal).await,
        Commands::Import(args) => args.execute(&cli.config, stop_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
