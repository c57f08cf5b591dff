//! Server commands.

use super::error::CommandResult;
use crate::protocol::Reply;
use crate::storage::StorageEngine;
use bytes::Bytes;

/// PING [message]
pub(super) fn cmd_ping(_storage: &StorageEngine, args: &[Bytes]) -> CommandResult {
    Ok(match args.first() {
        Some(message) => Reply::bulk(message.clone()),
        None => Reply::simple("PONG"),
    })
}

/// DBSIZE
pub(super) fn cmd_dbsize(storage: &StorageEngine, _args: &[Bytes]) -> CommandResult {
    Ok(Reply::integer(storage.len() as i64))
}

/// FLUSHDB
pub(super) fn cmd_flushdb(storage: &StorageEngine, _args: &[Bytes]) -> CommandResult {
    storage.flush();
    Ok(Reply::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Value;

    #[test]
    fn test_ping() {
        let storage = StorageEngine::new();

        assert_eq!(cmd_ping(&storage, &[]), Ok(Reply::simple("PONG")));
        assert_eq!(
            cmd_ping(&storage, &[Bytes::from("hello")]),
            Ok(Reply::bulk("hello"))
        );
    }

    #[test]
    fn test_dbsize_and_flushdb() {
        let storage = StorageEngine::new();

        assert_eq!(cmd_dbsize(&storage, &[]), Ok(Reply::integer(0)));

        storage.set(Bytes::from("a"), Value::Integer(1));
        storage.set(Bytes::from("b"), Value::Integer(2));
        assert_eq!(cmd_dbsize(&storage, &[]), Ok(Reply::integer(2)));

        assert_eq!(cmd_flushdb(&storage, &[]), Ok(Reply::ok()));
        assert_eq!(cmd_dbsize(&storage, &[]), Ok(Reply::integer(0)));
    }
}
