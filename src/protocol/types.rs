//! Command Replies
//!
//! Every command produces exactly one [`Reply`]. On the wire a reply is one
//! line of text:
//!
//! | Reply           | Line            |
//! |-----------------|-----------------|
//! | `Simple("OK")`  | `OK`            |
//! | `Bulk("1.1")`   | `1.1`           |
//! | `Integer(2)`    | `2`             |
//! | `Nil`           | `(nil)`         |
//! | `Error(..)`     | `ERR <message>` |
//!
//! Lines are terminated with a single `\n`.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// Line terminator appended to every encoded reply.
pub const LINE_END: &[u8] = b"\n";

/// Text sent for a missing value.
pub const NIL: &str = "(nil)";

/// The result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Status text such as `OK` or `PONG`
    Simple(String),

    /// A stored value, passed through byte-for-byte
    Bulk(Bytes),

    /// A count or an integer counter value
    Integer(i64),

    /// No value (e.g. `GET` on an absent key)
    Nil,

    /// A command failure, already including its `ERR` prefix
    Error(String),
}

impl Reply {
    /// The `OK` status reply.
    pub fn ok() -> Self {
        Reply::Simple("OK".to_string())
    }

    /// Creates a status reply.
    pub fn simple(s: impl Into<String>) -> Self {
        Reply::Simple(s.into())
    }

    /// Creates a value reply.
    ///
    /// # Example
    /// ```
    /// use sparkkv::protocol::Reply;
    /// let reply = Reply::bulk("1.1");
    /// assert_eq!(reply.to_string(), "1.1");
    /// ```
    pub fn bulk(data: impl Into<Bytes>) -> Self {
        Reply::Bulk(data.into())
    }

    /// Creates an integer reply.
    pub fn integer(n: i64) -> Self {
        Reply::Integer(n)
    }

    /// Creates an error reply.
    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    /// Returns true if this reply reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Appends the wire form of this reply, terminator included, to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Reply::Simple(s) | Reply::Error(s) => dst.put_slice(s.as_bytes()),
            Reply::Bulk(b) => dst.put_slice(b),
            Reply::Integer(n) => dst.put_slice(n.to_string().as_bytes()),
            Reply::Nil => dst.put_slice(NIL.as_bytes()),
        }
        dst.put_slice(LINE_END);
    }

    /// Returns the wire form of this reply as a new buffer.
    pub fn to_line(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Simple(s) | Reply::Error(s) => f.write_str(s),
            Reply::Bulk(b) => f.write_str(&String::from_utf8_lossy(b)),
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Nil => f.write_str(NIL),
        }
    }
}
