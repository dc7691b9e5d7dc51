use super::core::Connection;
use crate::protocol::Protocol;
use crate::reactor::{Reactor, Token};
use crate::transport::Transport;

/// Default size of the receive buffer, in bytes.
pub const DEFAULT_RECEIVE_BUFFER: usize = 4096;

/// Builder for configuring and creating connections.
///
/// # Examples
///
/// ```rust,ignore
/// let connection = ConnectionBuilder::new()
///     .receive_buffer(16 * 1024)
///     .build(token, reactor, protocol);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ConnectionBuilder {
    /// Capacity of the receive buffer.
    receive_buffer: usize,
}

impl ConnectionBuilder {
    /// Creates a builder with a receive buffer of
    /// [`DEFAULT_RECEIVE_BUFFER`] bytes.
    pub fn new() -> Self {
        Self {
            receive_buffer: DEFAULT_RECEIVE_BUFFER,
        }
    }

    /// Sets the capacity of the receive buffer.
    ///
    /// This bounds both the size of a single read and the amount of
    /// undrained input a protocol may leave behind. A protocol that never
    /// consumes a full buffer gets its connection closed.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn receive_buffer(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "receive_buffer must be > 0");

        self.receive_buffer = capacity;
        self
    }

    /// Builds a connection in the [`Accepted`](crate::State::Accepted)
    /// state. Call [`Connection::open`] to attach its transport.
    pub fn build<T, R, P>(&self, token: Token, reactor: R, protocol: P) -> Connection<T, R, P>
    where
        T: Transport,
        R: Reactor,
        P: Protocol<T, R>,
    {
        Connection::with_capacity(token, reactor, protocol, self.receive_buffer)
    }
}

impl Default for ConnectionBuilder {
    /// Creates a default `ConnectionBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
