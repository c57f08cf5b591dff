//! Command Table
//!
//! Maps each verb to its handler and argument-count bounds. The table is
//! built once, on first use, and never changes afterwards.
//!
//! ## Dispatch
//!
//! ```text
//! Command { name, args }
//!       │
//!       ├── name not in table ──────────> UnknownCommand
//!       ├── args.len() outside arity ───> WrongArity
//!       ▼
//! handler(storage, args) ──> Reply | CommandError
//! ```
//!
//! Handlers may index their arguments directly: the table only calls them
//! with an argument count their arity allows.

use super::error::{CommandError, CommandResult};
use super::{incr, server, string};
use crate::protocol::Command;
use crate::storage::StorageEngine;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Signature shared by all command handlers.
pub type HandlerFn = fn(&StorageEngine, &[Bytes]) -> CommandResult;

/// Number of arguments a command accepts, not counting the verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many
    Exact(usize),
    /// This many or more
    AtLeast(usize),
    /// Between the two bounds, inclusive
    Range(usize, usize),
}

impl Arity {
    /// Returns true if `count` arguments satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(min) => count >= min,
            Arity::Range(min, max) => (min..=max).contains(&count),
        }
    }
}

/// One table entry.
#[derive(Clone, Copy)]
pub struct CommandSpec {
    /// Upper-case verb
    pub name: &'static str,
    pub arity: Arity,
    pub handler: HandlerFn,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Verb to handler registry.
#[derive(Debug)]
pub struct CommandTable {
    entries: HashMap<&'static str, CommandSpec>,
}

static BUILTIN: OnceLock<CommandTable> = OnceLock::new();

impl CommandTable {
    /// Returns the process-wide table of built-in commands.
    pub fn builtin() -> &'static CommandTable {
        BUILTIN.get_or_init(Self::build)
    }

    fn build() -> Self {
        let specs = [
            // String commands
            spec("SET", Arity::Exact(2), string::cmd_set),
            spec("GET", Arity::Exact(1), string::cmd_get),
            spec("DEL", Arity::AtLeast(1), string::cmd_del),
            spec("EXISTS", Arity::AtLeast(1), string::cmd_exists),
            // Numeric commands
            spec("INCRBYFLOAT", Arity::Exact(2), incr::cmd_incrbyfloat),
            spec("INCR", Arity::Exact(1), incr::cmd_incr),
            spec("DECR", Arity::Exact(1), incr::cmd_decr),
            spec("INCRBY", Arity::Exact(2), incr::cmd_incrby),
            spec("DECRBY", Arity::Exact(2), incr::cmd_decrby),
            // Server commands
            spec("PING", Arity::Range(0, 1), server::cmd_ping),
            spec("DBSIZE", Arity::Exact(0), server::cmd_dbsize),
            spec("FLUSHDB", Arity::Exact(0), server::cmd_flushdb),
        ];

        Self {
            entries: specs.into_iter().map(|s| (s.name, s)).collect(),
        }
    }

    /// Looks up a verb. `name` must already be upper-case.
    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.entries.get(name)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks the verb and argument count, then runs the handler.
    pub fn dispatch(&self, storage: &StorageEngine, command: &Command) -> CommandResult {
        let spec = self
            .lookup(command.name())
            .ok_or_else(|| CommandError::unknown_command(command.name()))?;

        if !spec.arity.accepts(command.args().len()) {
            return Err(CommandError::wrong_arity(spec.name));
        }

        (spec.handler)(storage, command.args())
    }
}

fn spec(name: &'static str, arity: Arity, handler: HandlerFn) -> CommandSpec {
    CommandSpec {
        name,
        arity,
        handler,
    }
}
