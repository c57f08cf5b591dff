//! Client connections.
//!
//! The accept loop in `main.rs` hands every socket to [`handle_connection`],
//! which runs a [`ConnectionHandler`] on its own task:
//!
//! ```text
//! TcpListener::accept ──> tokio::spawn ──> ConnectionHandler::run
//!                                              │
//!                         read ──> take_line ──> CommandHandler::execute
//!                          ▲                         │
//!                          └──── write reply line ◄──┘
//! ```
//!
//! All connections share one [`ConnectionStats`].
//!
//! ```ignore
//! use sparkkv::commands::CommandHandler;
//! use sparkkv::connection::{handle_connection, ConnectionStats};
//! use sparkkv::storage::StorageEngine;
//! use std::sync::Arc;
//!
//! let commands = CommandHandler::new(Arc::new(StorageEngine::new()));
//! let stats = Arc::new(ConnectionStats::new());
//!
//! let (socket, peer) = listener.accept().await?;
//! tokio::spawn(handle_connection(socket, peer, commands.clone(), Arc::clone(&stats)));
//! ```

pub mod handler;

pub use handler::{
    handle_connection, ConnectionError, ConnectionHandler, ConnectionSnapshot, ConnectionStats,
    MAX_LINE_LENGTH,
};
