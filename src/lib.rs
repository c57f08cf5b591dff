//! # SparkKV - An In-Memory Key-Value Server with Float Counters
//!
//! SparkKV is a small in-memory key-value server written in Rust. Besides
//! plain `SET`/`GET`/`DEL` it supports atomic numeric updates, most notably
//! `INCRBYFLOAT`, which adds a decimal increment to a stored value and
//! writes back the shortest text that reads back as the same number.
//!
//! ## Request path
//!
//! ```text
//!  "INCRBYFLOAT foo 0.1\n"
//!          │  connection::ConnectionHandler   frames lines
//!          ▼
//!  protocol::parse_line                       verb + argument slices
//!          │
//!          ▼
//!  commands::CommandTable::dispatch           unknown verb / arity
//!          │
//!          ▼
//!  incr::cmd_incrbyfloat ──> StorageEngine::atomic_update(shard write lock)
//!          │
//!          ▼
//!  protocol::Reply  ──>  "0.1\n"
//! ```
//!
//! ## Embedding
//!
//! The command layer works without the network:
//!
//! ```
//! use sparkkv::{CommandHandler, Reply, StorageEngine};
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! let commands = CommandHandler::new(Arc::new(StorageEngine::new()));
//!
//! assert_eq!(commands.execute(Bytes::from("SET foo 1")), Reply::ok());
//! assert_eq!(commands.execute(Bytes::from("INCRBYFLOAT foo 0.1")), Reply::bulk("1.1"));
//! assert_eq!(commands.execute(Bytes::from("INCRBYFLOAT foo -0.1")), Reply::bulk("1"));
//! ```
//!
//! ## Supported Commands
//!
//! - `SET key value`, `GET key`, `DEL key [key ...]`, `EXISTS key [key ...]`
//! - `INCRBYFLOAT key increment`
//! - `INCR key`, `DECR key`, `INCRBY key n`, `DECRBY key n`
//! - `PING [message]`, `DBSIZE`, `FLUSHDB`
//!
//! ## Module Overview
//!
//! - [`protocol`]: command line parser and reply types
//! - [`storage`]: sharded storage engine, tagged values and the numeric codec
//! - [`commands`]: command table, dispatch and handlers
//! - [`connection`]: client connection management
//! - [`config`]: command-line configuration
//!
//! ## Design Highlights
//!
//! ### Atomic Updates
//!
//! Every read-modify-write command runs inside
//! [`StorageEngine::atomic_update`], which holds the key's shard write lock
//! while the new value is computed. Concurrent increments on one key never
//! lose an update, and a failed increment never writes anything.
//!
//! ### Zero-Copy Parsing
//!
//! Command lines are split into `bytes::Bytes` slices of the original
//! buffer, so keys and values reach the store without being copied.

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod storage;

pub use commands::CommandHandler;
pub use config::Config;
pub use connection::{handle_connection, ConnectionError, ConnectionStats};
pub use protocol::{parse_line, Command, ParseError, Reply};
pub use storage::{StorageEngine, Value};

/// The default port SparkKV listens on
pub const DEFAULT_PORT: u16 = 6379;

/// The default host SparkKV binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of SparkKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
