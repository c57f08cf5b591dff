//! String commands: thin wrappers over the storage engine.

use super::error::CommandResult;
use crate::protocol::Reply;
use crate::storage::{StorageEngine, Value};
use bytes::Bytes;

/// SET key value
pub(super) fn cmd_set(storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    storage.set(args[0].clone(), Value::from_input(args[1].clone()));
    Ok(Reply::ok())
}

/// GET key
pub(super) fn cmd_get(storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    Ok(match storage.get(&args[0]) {
        Some(value) => Reply::bulk(value.to_bytes()),
        None => Reply::Nil,
    })
}

/// DEL key [key ...]
pub(super) fn cmd_del(storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    let deleted = storage.delete_many(args);
    Ok(Reply::integer(deleted as i64))
}

/// EXISTS key [key ...]
pub(super) fn cmd_exists(storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    let count = storage.exists_many(args);
    Ok(Reply::integer(count as i64))
}
