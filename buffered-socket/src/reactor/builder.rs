use super::core::EventLoop;
use crate::connection::builder::ConnectionBuilder;

use std::io;
use std::time::Duration;

/// Builder for configuring and creating an [`EventLoop`].
///
/// # Examples
///
/// ```rust,ignore
/// let event_loop = EventLoopBuilder::new()
///     .event_capacity(256)
///     .connection(ConnectionBuilder::new().receive_buffer(8192))
///     .build()?;
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EventLoopBuilder {
    /// Maximum number of events handled per poll.
    event_capacity: usize,

    /// Upper bound on a single blocking poll; `None` blocks until an event.
    poll_timeout: Option<Duration>,

    /// Configuration applied to every accepted connection.
    connection: ConnectionBuilder,
}

impl EventLoopBuilder {
    /// Creates a new `EventLoopBuilder` with default configuration.
    ///
    /// By default the loop handles up to 64 events per poll, blocks until
    /// an event arrives, and uses [`ConnectionBuilder::default`].
    pub fn new() -> Self {
        Self {
            event_capacity: 64,
            poll_timeout: None,
            connection: ConnectionBuilder::default(),
        }
    }

    /// Sets the maximum number of events handled per poll.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn event_capacity(mut self, n: usize) -> Self {
        assert!(n > 0, "event_capacity must be > 0");

        self.event_capacity = n;
        self
    }

    /// Bounds how long a single poll may block.
    pub fn poll_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Sets the configuration of accepted connections.
    pub fn connection(mut self, connection: ConnectionBuilder) -> Self {
        self.connection = connection;
        self
    }

    /// Builds the event loop.
    ///
    /// # Errors
    ///
    /// Fails if the epoll instance or its wake-up `eventfd` cannot be
    /// created.
    pub fn build<P>(self) -> io::Result<EventLoop<P>> {
        EventLoop::new(self.event_capacity, self.poll_timeout, self.connection)
    }
}

impl Default for EventLoopBuilder {
    /// Creates a default `EventLoopBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
