/// An I/O event reported by the poller.
///
/// An `Event` carries readiness information for a registered socket. It is
/// produced by the poller and consumed by the event loop to run the
/// matching connection handlers.
pub(crate) struct Event {
    /// Token the socket was registered with.
    pub(crate) token: usize,

    /// The socket is readable, hung up, or in error.
    pub(crate) readable: bool,

    /// The socket is writable.
    pub(crate) writable: bool,
}
