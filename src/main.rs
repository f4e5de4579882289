// Mutirao - headless client for the volunteer-registration site
//
// The site is a hash-routed single page: navigation swaps <main> fragments
// fetched over HTTP, and the registration form is validated entirely on
// the client. This binary runs that page without a browser.
//
// Architecture:
// - Driver: reads commands from stdin (navigate, click, type, submit)
// - Engine: single-threaded event loop owning the live page state
// - Router: hash -> fragment resolution with an ordering guard for loads
// - Form: field rules, error markers, and the submission flow
// - Event system: one mpsc channel connects all components

mod cli;
mod config;
mod driver;
mod engine;
mod events;
mod fetch;
mod form;
mod fragment;
mod notify;
mod router;
mod routes;
mod shell;
mod template;

use anyhow::Result;
use clap::Parser;
use config::{Config, LogRotation};
use engine::Engine;
use fetch::HttpFetcher;
use notify::ToastRack;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Handle CLI commands first (config --show, --reset, --path)
    if cli::handle_command(&args) {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    cli::apply_flags(&mut config, &args);

    // Initialize tracing. Precedence: RUST_LOG env var > config file >
    // default "info". File logging optionally adds a JSON layer with a
    // rotating appender; the guard must outlive main so logs flush.
    let default_filter = format!("mutirao={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard> = if config
        .logging
        .file_enabled
    {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let file_appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Daily => tracing_appender::rolling::daily(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Never => tracing_appender::rolling::never(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                };
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                tracing_subscriber::registry()
                    .with(filter)
                    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(non_blocking)
                            .with_ansi(false),
                    )
                    .init();
                Some(guard)
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                tracing_subscriber::registry()
                    .with(filter)
                    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                    .init();
                None
            }
        }
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        None
    };

    tracing::info!(
        base_url = %config.base_url,
        route = %config.initial_route,
        "mutirao {} starting",
        config::VERSION
    );

    // One channel feeds the engine: driver input, fetch completions, timers
    let (events_tx, events_rx) = mpsc::channel(64);

    let mut engine = Engine::new(
        &config.base_url,
        Arc::new(HttpFetcher::new()),
        ToastRack::new(),
        events_tx.clone(),
    );
    engine.boot(&config.initial_route);

    // The driver is attached exactly once; it sends Quit on EOF
    let driver_handle = tokio::spawn(driver::run(events_tx));

    engine.run(events_rx).await?;

    let _ = driver_handle.await;
    Ok(())
}
