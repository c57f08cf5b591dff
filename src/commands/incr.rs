//! Increment Engine
//!
//! `INCRBYFLOAT` and the integer counters. Each command is a single
//! [`StorageEngine::atomic_update`]: the current value is read, the new one
//! computed and rendered, and only then written. Any failure along the way
//! leaves the key as it was, including leaving an absent key absent.
//!
//! ```text
//! INCRBYFLOAT foo 0.1
//!       │
//!       ├── "0.1" not a number ─────────> NotAFloat
//!       ▼
//! ┌── shard write lock ─────────────────────────────────┐
//! │ current = absent ? 0 : parse(foo) ──> NotAFloat      │
//! │ result  = current + 0.1                             │
//! │ text    = format_float(result) ────> OutOfRange     │
//! │ foo     = String(text)                              │
//! └─────────────────────────────────────────────────────┘
//!       │
//!       ▼
//!     "text"
//! ```

use super::error::{CommandError, CommandResult};
use crate::protocol::Reply;
use crate::storage::numeric::{self, NumericError};
use crate::storage::{StorageEngine, Value};
use bytes::Bytes;
use tracing::debug;

/// INCRBYFLOAT key increment
pub(super) fn cmd_incrbyfloat(storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    let key = &args[0];
    let increment = numeric::parse_float(&args[1])
        .map_err(|_| CommandError::NotAFloat)?
        .as_f64();

    let updated = storage
        .atomic_update(key, |current| {
            let base = match current {
                Some(value) => value.as_float().map_err(|_| CommandError::NotAFloat)?,
                None => 0.0,
            };
            let rendered = numeric::format_float(base + increment)?;
            Ok::<_, CommandError>(Value::string(rendered))
        })
        .inspect_err(|e| {
            debug!(key = %String::from_utf8_lossy(key), error = %e, "INCRBYFLOAT rejected");
        })?;

    Ok(Reply::bulk(updated.to_bytes()))
}

/// INCR key
pub(super) fn cmd_incr(storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    increment_by(storage, &args[0], 1)
}

/// DECR key
pub(super) fn cmd_decr(storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    increment_by(storage, &args[0], -1)
}

/// INCRBY key increment
pub(super) fn cmd_incrby(storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    let delta = numeric::parse_integer(&args[1])?;
    increment_by(storage, &args[0], delta)
}

/// DECRBY key decrement
pub(super) fn cmd_decrby(storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    let amount = numeric::parse_integer(&args[1])?;
    let delta = amount.checked_neg().ok_or(NumericError::NotAnInteger)?;
    increment_by(storage, &args[0], delta)
}

/// Adds a signed delta to an integer counter. Absent keys start at zero.
fn increment_by(storage: &StorageEngine, key: &Bytes, delta: i64) -> CommandResult {
    let updated = storage.atomic_update(key, |current| {
        let base = match current {
            Some(value) => value.as_integer()?,
            None => 0,
        };
        Ok::<_, CommandError>(Value::Integer(numeric::checked_increment(base, delta)?))
    })?;

    Ok(Reply::integer(updated.as_integer()?))
}
