//! The socket capability a connection writes to and reads from.

use std::io;

/// A non-blocking byte stream owned by a [`Connection`].
///
/// Implementations must never block. "No progress possible right now" is
/// reported as an error of kind [`io::ErrorKind::WouldBlock`]; any other
/// error is treated as fatal for the connection.
///
/// The crate ships [`TcpTransport`] on Linux. Tests implement this trait
/// with in-memory fakes to simulate partial I/O, would-block and EOF.
///
/// [`Connection`]: crate::Connection
/// [`TcpTransport`]: crate::net::TcpTransport
pub trait Transport {
    /// Writes as much of `buffer` as the socket accepts right now.
    ///
    /// Returns the number of bytes written.
    fn send(&mut self, buffer: &[u8]) -> io::Result<usize>;

    /// Reads at most `buffer.len()` bytes.
    ///
    /// Returns the number of bytes read; `Ok(0)` means the peer closed its
    /// write side.
    fn recv(&mut self, buffer: &mut [u8]) -> io::Result<usize>;

    /// Renders the address of the remote peer.
    fn remote_address(&self) -> io::Result<String>;

    /// Shuts down the read direction.
    fn close_read(&mut self) -> io::Result<()>;

    /// Shuts down the write direction.
    fn close_write(&mut self) -> io::Result<()>;
}

/// Returns `true` for errors that mean "try again on the next readiness event".
pub(crate) fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}
