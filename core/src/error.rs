use std::fmt;
use std::io;

/// Errors surfaced per evaluated unit. None of these are fatal to the
/// process: the driver reports them and keeps going.
#[derive(Debug, Clone)]
pub enum MinimError {
    /// Malformed token or mismatched delimiter, raised by the reader.
    Parse(String),

    /// Symbol lookup exhausted the environment chain.
    Unbound(String),

    /// A primitive or special form got the wrong count or variant of
    /// arguments. The message always starts with the offending form's name.
    Type(String),

    /// Host-level read/write failure on the I/O channels.
    Io(String),
}

impl fmt::Display for MinimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinimError::Parse(msg) => write!(f, "Parse error: {msg}"),
            MinimError::Unbound(name) => write!(f, "Error: unbound variable '{name}'"),
            MinimError::Type(msg) => write!(f, "Type error: {msg}"),
            MinimError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for MinimError {}

impl From<io::Error> for MinimError {
    fn from(e: io::Error) -> Self {
        MinimError::Io(e.to_string())
    }
}

pub type MinimResult<T> = Result<T, MinimError>;
