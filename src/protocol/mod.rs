//! Line Protocol Implementation
//!
//! Commands arrive as one line of whitespace-separated tokens and every
//! command is answered by one line of text.
//!
//! ## Modules
//!
//! - `parser`: splits a raw line into a [`Command`]
//! - `types`: defines the [`Reply`] enum and its line encoding
//!
//! ## Example
//!
//! ```
//! use sparkkv::protocol::{parse_line, Reply};
//! use bytes::Bytes;
//!
//! // Parsing incoming data
//! let command = parse_line(Bytes::from("INCRBYFLOAT foo 0.1")).unwrap();
//! assert_eq!(command.name(), "INCRBYFLOAT");
//!
//! // Creating responses
//! let response = Reply::bulk("0.1");
//! assert_eq!(&response.to_line()[..], b"0.1\n");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{parse_line, Command, ParseError, ParseResult};
pub use types::Reply;
