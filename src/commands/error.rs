use crate::protocol::ParseError;
use crate::storage::NumericError;
use thiserror::Error;

/// Result type returned by command handlers.
pub type CommandResult = Result<crate::protocol::Reply, CommandError>;

/// Ways a command can fail.
///
/// `Display` renders the exact text sent to the client. Every variant is
/// recoverable: the connection answers with the error and keeps going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line could not be split into a command
    #[error("ERR {0}")]
    Malformed(#[from] ParseError),

    /// No handler is registered for the verb (lower-cased)
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    /// The argument count is outside the verb's bounds (verb lower-cased)
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    /// An operand or stored value is not a number
    #[error("ERR value is not a valid float")]
    NotAFloat,

    /// An operand or stored value is not a canonical 64-bit integer
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    /// Integer arithmetic overflowed
    #[error("ERR increment or decrement would overflow")]
    Overflow,

    /// Float arithmetic produced a non-finite result
    #[error("ERR value is out of range")]
    OutOfRange,
}

impl CommandError {
    pub fn unknown_command(name: &str) -> Self {
        CommandError::UnknownCommand(name.to_ascii_lowercase())
    }

    pub fn wrong_arity(name: &str) -> Self {
        CommandError::WrongArity(name.to_ascii_lowercase())
    }
}

impl From<NumericError> for CommandError {
    fn from(e: NumericError) -> Self {
        match e {
            NumericError::NotAFloat => CommandError::NotAFloat,
            NumericError::NotAnInteger => CommandError::NotAnInteger,
            NumericError::Overflow => CommandError::Overflow,
            NumericError::OutOfRange => CommandError::OutOfRange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages() {
        assert_eq!(
            CommandError::wrong_arity("INCRBYFLOAT").to_string(),
            "ERR wrong number of arguments for 'incrbyfloat' command"
        );
        assert_eq!(
            CommandError::unknown_command("FOO").to_string(),
            "ERR unknown command 'foo'"
        );
        assert_eq!(
            CommandError::from(ParseError::EmptyCommand).to_string(),
            "ERR empty command"
        );
        assert_eq!(
            CommandError::from(NumericError::NotAFloat).to_string(),
            "ERR value is not a valid float"
        );
        assert_eq!(
            CommandError::from(NumericError::OutOfRange).to_string(),
            "ERR value is out of range"
        );
    }
}
