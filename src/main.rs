//! SparkKV - An In-Memory Key-Value Server
//!
//! This is the main entry point for the SparkKV server.
//! It sets up logging, the storage engine and the TCP listener, then
//! serves connections until Ctrl+C.

use clap::Parser;
use sparkkv::commands::CommandHandler;
use sparkkv::config::Config;
use sparkkv::connection::{handle_connection, ConnectionStats};
use sparkkv::storage::StorageEngine;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Set up logging; RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    info!(version = sparkkv::VERSION, "Starting SparkKV");

    let storage = Arc::new(StorageEngine::with_shards(config.shards));
    info!(
        "Storage engine initialized with {} shards",
        storage.shard_count()
    );

    let stats = Arc::new(ConnectionStats::new());

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(address = %address, "Listening");

    // Main accept loop, until Ctrl+C
    tokio::select! {
        _ = accept_loop(listener, Arc::clone(&storage), Arc::clone(&stats)) => {}
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Shutdown signal received, stopping server..."),
                Err(e) => error!("Failed to listen for shutdown signal: {}", e),
            }
        }
    }

    let storage_stats = storage.stats();
    let connection_stats = stats.snapshot();
    info!(
        keys = storage_stats.keys,
        connections = connection_stats.connections_accepted,
        commands = connection_stats.commands_processed,
        rejected_updates = storage_stats.rejected_updates,
        "Server shutdown complete"
    );
    Ok(())
}

/// Accepts sockets forever, one task per client.
async fn accept_loop(
    listener: TcpListener,
    storage: Arc<StorageEngine>,
    stats: Arc<ConnectionStats>,
) {
    let commands = CommandHandler::new(storage);

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "Failed to accept connection");
                continue;
            }
        };

        tokio::spawn(handle_connection(
            socket,
            peer,
            commands.clone(),
            Arc::clone(&stats),
        ));
    }
}
