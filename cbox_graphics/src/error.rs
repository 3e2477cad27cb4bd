//! Error types for the cbox graphics layer
//!
//! Every fallible operation in the shader pipeline and the resource builders
//! returns [`Result`]. Each variant carries a human-readable message; the
//! variant itself is the error kind callers match on.

use std::fmt;
use std::io;

/// Result type for graphics operations
pub type Result<T> = std::result::Result<T, Error>;

/// Graphics errors
#[derive(Debug, Clone)]
pub enum Error {
    /// A file or named object does not exist
    NotFound(String),

    /// Permission was denied while reading a file
    AccessDenied(String),

    /// Any other I/O failure while reading a file
    ReadError(String),

    /// Malformed input: shader source, bytecode, compile/link/reflection failure
    InvalidFormat(String),

    /// A required builder input was not provided
    NullValue(String),

    /// Operation not valid in the current state (empty builder, zero size, double init...)
    InvalidState(String),

    /// Backend-specific or internal failure
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,
}

/// Discriminant of [`Error`] without its message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    ReadError,
    InvalidFormat,
    NullValue,
    InvalidState,
    BackendError,
    OutOfMemory,
}

impl Error {
    /// Kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::AccessDenied(_) => ErrorKind::AccessDenied,
            Error::ReadError(_) => ErrorKind::ReadError,
            Error::InvalidFormat(_) => ErrorKind::InvalidFormat,
            Error::NullValue(_) => ErrorKind::NullValue,
            Error::InvalidState(_) => ErrorKind::InvalidState,
            Error::BackendError(_) => ErrorKind::BackendError,
            Error::OutOfMemory => ErrorKind::OutOfMemory,
        }
    }

    /// Build an error of the given kind with a message
    ///
    /// `OutOfMemory` carries no message; the text is dropped.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::NotFound => Error::NotFound(message),
            ErrorKind::AccessDenied => Error::AccessDenied(message),
            ErrorKind::ReadError => Error::ReadError(message),
            ErrorKind::InvalidFormat => Error::InvalidFormat(message),
            ErrorKind::NullValue => Error::NullValue(message),
            ErrorKind::InvalidState => Error::InvalidState(message),
            ErrorKind::BackendError => Error::BackendError(message),
            ErrorKind::OutOfMemory => Error::OutOfMemory,
        }
    }

    /// Map an I/O error raised while accessing `path`
    pub fn from_io(err: &io::Error, path: &std::path::Path) -> Self {
        let path = path.display();
        match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(format!("File not found: {}", path)),
            io::ErrorKind::PermissionDenied => {
                Error::AccessDenied(format!("Access denied: {}", path))
            }
            _ => Error::ReadError(format!("Failed to read {}: {}", path, err)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::AccessDenied(msg) => write!(f, "Access denied: {}", msg),
            Error::ReadError(msg) => write!(f, "Read error: {}", msg),
            Error::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            Error::NullValue(msg) => write!(f, "Null value: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => Error::AccessDenied(err.to_string()),
            _ => Error::ReadError(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
