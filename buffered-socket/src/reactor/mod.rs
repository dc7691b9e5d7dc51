//! Reactor capability and the epoll event loop.
//!
//! A reactor detects read and write readiness and dispatches the
//! connection handlers. The core only needs it to track interest, which is
//! what the [`Reactor`] trait expresses:
//! - read interest is registered once at `open` and kept for the whole
//!   connection lifetime,
//! - write interest is registered only while output is queued and cancelled
//!   as soon as the queue drains,
//! - `deregister` drops every interest when the connection closes.
//!
//! On Linux this module also provides [`EventLoop`], a single-threaded
//! epoll reactor that accepts TCP connections and drives them, and
//! [`ReactorHandle`], its implementation of [`Reactor`].

#[cfg(target_os = "linux")]
mod builder;
#[cfg(target_os = "linux")]
mod command;
#[cfg(target_os = "linux")]
mod core;
#[cfg(target_os = "linux")]
mod event;
#[cfg(target_os = "linux")]
mod handle;
#[cfg(target_os = "linux")]
pub(crate) mod poller;

#[cfg(target_os = "linux")]
pub use builder::EventLoopBuilder;
#[cfg(target_os = "linux")]
pub use self::core::EventLoop;
#[cfg(target_os = "linux")]
pub use handle::ReactorHandle;

use crate::error::Result;

use std::fmt;

/// Identifies a connection towards its reactor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(pub usize);

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interest registration towards the reactor driving a connection.
///
/// Every method must be idempotent: registering an interest that is already
/// registered, or cancelling one that is not, is a no-op. A connection
/// calls these from inside its handlers, so implementations must not call
/// back into the connection.
pub trait Reactor {
    /// Asks to be notified when the connection becomes readable.
    fn register_read_interest(&mut self, token: Token) -> Result<()>;

    /// Asks to be notified when the connection becomes writable.
    fn register_write_interest(&mut self, token: Token) -> Result<()>;

    /// Stops write-readiness notifications.
    fn cancel_write_interest(&mut self, token: Token) -> Result<()>;

    /// Drops every interest registered for the connection.
    fn deregister(&mut self, token: Token) -> Result<()>;
}
