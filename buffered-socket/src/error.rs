//! Error types for buffered-socket.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The peer address could not be read from the transport during `open`.
    #[error("remote address unavailable: {0}")]
    AddressUnavailable(#[source] io::Error),

    #[error("connection closed")]
    Closed,

    #[error("connection already opened")]
    AlreadyOpen,

    /// The transport reported success without accepting a single byte.
    #[error("transport accepted zero bytes of a non-empty write")]
    ZeroWrite,

    #[error("reactor is no longer running")]
    ReactorUnavailable,
}

impl Error {
    /// Returns `true` if the error means the connection can no longer be used.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
