//! Command Handler Module
//!
//! This module implements the command processing layer. It receives raw
//! command lines, validates them against the command table, executes them
//! against the storage engine, and returns one reply per command.
//!
//! ## Architecture
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Line Parser    │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Dispatch     │  table.rs
//! │  - Validate     │  arity per verb
//! │  - Execute      │  string.rs, incr.rs, server.rs
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ StorageEngine   │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! ### String Commands
//! - `SET`, `GET`, `DEL`, `EXISTS`
//!
//! ### Numeric Commands
//! - `INCRBYFLOAT`
//! - `INCR`, `INCRBY`, `DECR`, `DECRBY`
//!
//! ### Server Commands
//! - `PING`, `DBSIZE`, `FLUSHDB`

pub mod error;
pub mod handler;
pub mod table;

mod incr;
mod server;
mod string;

// Re-export the main command handler
pub use error::{CommandError, CommandResult};
pub use handler::CommandHandler;
pub use table::{Arity, CommandSpec, CommandTable, HandlerFn};
