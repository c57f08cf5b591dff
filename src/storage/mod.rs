//! Storage Engine Module
//!
//! This module holds the key space shared by all connections together with
//! the value representation and the numeric codec.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     StorageEngine                           │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │...64    │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ shards  │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                   ▲
//!          ▼                                   │
//!   Value { Integer | Float | String }   numeric::{parse_float, format_float}
//! ```
//!
//! ## Features
//!
//! - **Sharded Storage**: independent shards reduce lock contention
//! - **Atomic Updates**: read-compute-write under one shard lock
//! - **Tagged Values**: integers, floats and raw strings
//!
//! ## Example
//!
//! ```
//! use sparkkv::storage::{StorageEngine, Value};
//! use bytes::Bytes;
//!
//! let engine = StorageEngine::new();
//!
//! engine.set(Bytes::from("name"), Value::from_input(Bytes::from("Ariz")));
//! let value = engine.get(b"name");
//! assert_eq!(value, Some(Value::String(Bytes::from("Ariz"))));
//! ```

pub mod engine;
pub mod numeric;
pub mod value;

// Re-export commonly used types
pub use engine::{StorageEngine, StorageStats, DEFAULT_SHARDS};
pub use numeric::{NumericError, Number};
pub use value::Value;
