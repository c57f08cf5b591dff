//! Command Handler Module
//!
//! Executes raw command lines against the storage engine. This is the single
//! entry point the transport layer talks to: one line in, one reply out.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ parse_line()│───>│ dispatch()  │───>│  handler    │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! │                                               │             │
//! │                                               ▼             │
//! │                                      StorageEngine          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures at any stage become a [`Reply::Error`]; nothing here can end a
//! connection.

use super::error::{CommandError, CommandResult};
use super::table::CommandTable;
use crate::protocol::{parse_line, Command, Reply};
use crate::storage::StorageEngine;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, trace};

/// Executes commands against a shared storage engine.
///
/// Cloning is cheap; each connection gets its own clone.
#[derive(Clone)]
pub struct CommandHandler {
    /// The storage engine
    storage: Arc<StorageEngine>,
    /// Verb registry, shared process-wide
    table: &'static CommandTable,
}

impl CommandHandler {
    /// Creates a new command handler with the given storage engine.
    pub fn new(storage: Arc<StorageEngine>) -> Self {
        Self {
            storage,
            table: CommandTable::builtin(),
        }
    }

    /// The storage engine this handler executes against.
    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    /// Parses and executes one raw command line.
    ///
    /// # Example
    ///
    /// ```
    /// use sparkkv::commands::CommandHandler;
    /// use sparkkv::protocol::Reply;
    /// use sparkkv::storage::StorageEngine;
    /// use bytes::Bytes;
    /// use std::sync::Arc;
    ///
    /// let handler = CommandHandler::new(Arc::new(StorageEngine::new()));
    /// assert_eq!(handler.execute(Bytes::from("INCRBYFLOAT foo 0.1")), Reply::bulk("0.1"));
    /// ```
    pub fn execute(&self, line: Bytes) -> Reply {
        match parse_line(line) {
            Ok(command) => self.execute_command(&command),
            Err(e) => into_reply(Err(CommandError::from(e))),
        }
    }

    /// Executes an already parsed command.
    pub fn execute_command(&self, command: &Command) -> Reply {
        trace!(command = %command.name(), args = command.args().len(), "Executing command");

        let result = self.table.dispatch(&self.storage, command);
        if let Err(e) = &result {
            debug!(command = %command.name(), error = %e, "Command failed");
        }

        into_reply(result)
    }
}

fn into_reply(result: CommandResult) -> Reply {
    result.unwrap_or_else(|e| Reply::error(e.to_string()))
}
