mod cli;
mod config;
mod error;
mod output;
mod snapshot;
mod view;

use clap::Parser;
use cli::Command;
use config::RenderConfig;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() {
    // Before parsing, so env-backed arguments can come from .env.
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Render(args) => {
            let config = RenderConfig {
                sides: args.side,
                format: args.format,
                class_name: args.class_name,
                price_decimals: args.decimals.price_decimals,
                size_decimals: args.decimals.size_decimals,
            };

            if let Err(e) = output::run_render(&config, args.input.as_deref()) {
                tracing::error!(error = %e, "render failed");
                std::process::exit(1);
            }
        }

        Command::View(args) => {
            let config = RenderConfig {
                price_decimals: args.decimals.price_decimals,
                size_decimals: args.decimals.size_decimals,
                ..Default::default()
            };

            // Shared cancellation token + signal handlers.
            let cancel = setup_signal_handlers();

            if let Err(e) = view::run_view(config, args.input, cancel).await {
                tracing::error!(error = %e, "view error");
                std::process::exit(1);
            }
        }
    }
}

/// Register SIGINT and SIGTERM handlers that trigger the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            let mut sig = match tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate(),
            ) {
                Ok(sig) => sig,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to register SIGTERM handler");
                    return;
                }
            };
            sig.recv().await;
            info!("received SIGTERM, shutting down");
            cancel_clone.cancel();
        });
    }

    cancel
}
