use crate::connection::channel::Channel;
use crate::reactor::Reactor;
use crate::transport::Transport;

/// Application hooks invoked by a [`Connection`].
///
/// Every hook runs synchronously on the thread dispatching the connection
/// and receives the connection's [`Channel`], through which it can send,
/// drain the receive buffer or close the connection (closing from inside a
/// hook is allowed).
///
/// A protocol usually does not care about the concrete transport or
/// reactor and implements the trait for all of them:
///
/// ```rust,ignore
/// impl<T: Transport, R: Reactor> Protocol<T, R> for Echo { /* ... */ }
/// ```
///
/// [`Connection`]: crate::Connection
pub trait Protocol<T: Transport, R: Reactor> {
    /// Called once during `open`, after the remote address is known and
    /// before read interest is registered.
    fn on_accept(&mut self, channel: &mut Channel<T, R>) {
        let _ = channel;
    }

    /// Called after new bytes landed in the receive buffer.
    ///
    /// The hook may consume any amount of the buffered data, including
    /// none; unread bytes are kept for the next call.
    fn on_read(&mut self, channel: &mut Channel<T, R>);

    /// Called when the reactor tears the connection down after a fatal
    /// condition (EOF, transport error). Not called when the application
    /// closed the connection itself.
    fn on_close(&mut self, channel: &mut Channel<T, R>) {
        let _ = channel;
    }
}
