use super::state::State;
use super::status::OutputStatus;
use crate::buffer::{ByteCursorBuffer, Fragment, OutboundQueue};
use crate::error::{Error, Result};
use crate::reactor::{Reactor, Token};
use crate::transport::{Transport, is_transient};

use std::io;

use tracing::{debug, trace, warn};

/// Placeholder reported by [`Channel::remote_address`] until `open` resolves
/// the peer.
pub(crate) const UNKNOWN_ADDRESS: &str = "<unknown>";

/// The I/O surface of a connection.
///
/// A `Channel` owns the transport, the receive buffer and the outbound
/// queue of one connection, together with its lifecycle state and its
/// reactor registration. Protocol hooks receive it to send data, drain
/// received data, or close the connection.
///
/// Sending never blocks: bytes the transport does not accept right away
/// are queued and written when the reactor reports write-readiness.
pub struct Channel<T, R> {
    /// Identifies this connection towards the reactor.
    token: Token,

    /// Interest registration.
    reactor: R,

    /// The socket; `None` before `open` and once closed.
    transport: Option<T>,

    /// Peer address, resolved once at `open`.
    remote_address: String,

    /// Received bytes not yet consumed by the protocol.
    receive: ByteCursorBuffer,

    /// Bytes waiting for write-readiness, in submission order.
    outbound: OutboundQueue,

    /// Lifecycle state.
    state: State,

    /// Whether write interest is currently registered.
    write_interest: bool,
}

/// Result of one read from the transport into the receive buffer.
pub(crate) enum Fill {
    /// `read` bytes arrived out of the `requested` free space.
    Read { read: usize, requested: usize },

    /// Nothing to read yet.
    WouldBlock,

    /// The peer closed its write side.
    Eof,

    /// The buffer has no free space left.
    Full,

    /// Fatal transport error.
    Failed(io::Error),
}

impl<T: Transport, R: Reactor> Channel<T, R> {
    pub(crate) fn new(token: Token, reactor: R, receive_capacity: usize) -> Self {
        Self {
            token,
            reactor,
            transport: None,
            remote_address: UNKNOWN_ADDRESS.to_owned(),
            receive: ByteCursorBuffer::with_capacity(receive_capacity),
            outbound: OutboundQueue::new(),
            state: State::Accepted,
            write_interest: false,
        }
    }

    /// Returns the token identifying this connection.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns `true` once the connection is closing or closed.
    pub fn is_closed(&self) -> bool {
        !self.state.is_active()
    }

    /// Returns the peer address resolved at `open`, or `"<unknown>"` before.
    pub fn remote_address(&self) -> &str {
        &self.remote_address
    }

    /// Number of received bytes waiting to be consumed.
    pub fn recv_len(&self) -> usize {
        self.receive.available()
    }

    /// Copies `dst.len()` received bytes into `dst` without consuming them.
    ///
    /// Returns `false`, copying nothing, if fewer bytes are buffered.
    pub fn recv_soft(&self, dst: &mut [u8]) -> bool {
        self.receive.peek(dst)
    }

    /// Copies `dst.len()` received bytes into `dst` and consumes them.
    ///
    /// Returns `false` with no effect if fewer bytes are buffered.
    pub fn recv(&mut self, dst: &mut [u8]) -> bool {
        self.receive.consume(dst)
    }

    /// Consumes `len` received bytes without copying them.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds [`recv_len`](Self::recv_len). Check with
    /// `recv_len` or [`recv_soft`](Self::recv_soft) first.
    pub fn recv_skip(&mut self, len: usize) {
        self.receive.skip(len);
    }

    /// The received bytes waiting to be consumed, without copying them.
    pub fn received(&self) -> &[u8] {
        self.receive.readable()
    }

    /// Number of bytes queued for write-readiness.
    pub fn pending_output(&self) -> usize {
        self.outbound.pending_bytes()
    }

    /// Sends `bytes` without blocking.
    ///
    /// When nothing is queued, the bytes are first written inline; whatever
    /// the transport does not accept is copied into the outbound queue and
    /// write interest is registered. When output is already queued, the
    /// whole payload is queued behind it so payloads never interleave.
    ///
    /// An empty payload succeeds without touching the transport.
    ///
    /// # Errors
    ///
    /// - [`Error::Closed`] if the connection is closing, closed, or was never
    ///   opened,
    /// - any fatal transport error from the inline write,
    /// - reactor errors while registering write interest.
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        if self.is_closed() {
            return Err(Error::Closed);
        }

        let mut sent = 0;

        if self.outbound.is_empty() {
            let transport = self.transport.as_mut().ok_or(Error::Closed)?;
            sent = noblk_send(transport, bytes)?;

            trace!(token = %self.token, sent, len = bytes.len(), "inline send");

            if sent == bytes.len() {
                return Ok(());
            }
        }

        self.outbound.push_back(Fragment::copy_from(&bytes[sent..]));
        self.watch_write()
    }

    /// Closes the connection.
    ///
    /// Shuts down both directions of the transport, drops every reactor
    /// interest, discards queued output and releases the transport. Calling
    /// it again, or after the reactor closed the connection, does nothing.
    /// Safe to call from inside a protocol hook.
    pub fn close_connection(&mut self) {
        if self.is_closed() {
            return;
        }

        self.state = State::Closing;

        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.close_read() {
                debug!(token = %self.token, error = %e, "shutdown of read side failed");
            }
            if let Err(e) = transport.close_write() {
                debug!(token = %self.token, error = %e, "shutdown of write side failed");
            }
        }

        let discarded = self.outbound.clear();
        self.receive.clear();

        if let Err(e) = self.reactor.deregister(self.token) {
            debug!(token = %self.token, error = %e, "deregister failed");
        }
        self.write_interest = false;

        self.state = State::Closed;

        debug!(
            token = %self.token,
            address = %self.remote_address,
            discarded,
            "connection closed"
        );
    }

    /// Attaches the transport and resolves the peer address.
    ///
    /// On failure the transport is released and the channel is closed.
    pub(crate) fn attach(&mut self, transport: T) -> Result<()> {
        if self.state != State::Accepted || self.transport.is_some() {
            return Err(Error::AlreadyOpen);
        }

        match transport.remote_address() {
            Ok(address) => {
                self.remote_address = address;
                self.transport = Some(transport);
                Ok(())
            }
            Err(e) => {
                drop(transport);
                self.state = State::Closed;
                Err(Error::AddressUnavailable(e))
            }
        }
    }

    pub(crate) fn set_state(&mut self, state: State) {
        self.state = state;
    }

    pub(crate) fn watch_read(&mut self) -> Result<()> {
        self.reactor.register_read_interest(self.token)
    }

    /// Registers write interest unless it already is.
    fn watch_write(&mut self) -> Result<()> {
        if !self.write_interest {
            self.reactor.register_write_interest(self.token)?;
            self.write_interest = true;

            debug!(token = %self.token, pending = self.outbound.pending_bytes(), "write interest on");
        }

        Ok(())
    }

    /// Cancels write interest unless it already is.
    fn unwatch_write(&mut self) -> Result<()> {
        if self.write_interest {
            self.reactor.cancel_write_interest(self.token)?;
            self.write_interest = false;

            debug!(token = %self.token, "write interest off");
        }

        Ok(())
    }

    /// Reads once into the free region of the receive buffer.
    pub(crate) fn fill(&mut self) -> Fill {
        let requested = self.receive.free_space();

        if requested == 0 {
            return Fill::Full;
        }

        let Some(transport) = self.transport.as_mut() else {
            return Fill::Failed(io::Error::from(io::ErrorKind::NotConnected));
        };

        match transport.recv(self.receive.writable()) {
            Ok(0) => Fill::Eof,
            Ok(read) => {
                self.receive.fill(read);
                trace!(token = %self.token, read, requested, "received");

                Fill::Read { read, requested }
            }
            Err(e) if is_transient(&e) => Fill::WouldBlock,
            Err(e) => Fill::Failed(e),
        }
    }

    /// Shifts unread input to the front of the receive buffer.
    pub(crate) fn compact(&mut self) {
        self.receive.compact();
    }

    /// Writes the head of the outbound queue once.
    pub(crate) fn flush_head(&mut self) -> OutputStatus {
        let Some(mut fragment) = self.outbound.pop_front() else {
            return match self.unwatch_write() {
                Ok(()) => OutputStatus::Idle,
                Err(e) => {
                    warn!(token = %self.token, error = %e, "cancelling write interest failed");
                    OutputStatus::Close
                }
            };
        };

        let Some(transport) = self.transport.as_mut() else {
            return OutputStatus::Close;
        };

        match noblk_send(transport, fragment.remaining()) {
            Err(e) => {
                warn!(token = %self.token, error = %e, "queued send failed");
                OutputStatus::Close
            }
            Ok(n) if n == fragment.remaining().len() => {
                trace!(token = %self.token, sent = n, "fragment flushed");
                OutputStatus::Flushed
            }
            Ok(n) => {
                fragment.advance(n);
                trace!(token = %self.token, sent = n, left = fragment.remaining().len(), "fragment partially sent");

                self.outbound.push_front(fragment);
                OutputStatus::Partial
            }
        }
    }
}

/// Attempts one non-blocking write of `bytes`.
///
/// Returns the number of bytes written; `0` means the transport would block
/// and the caller retries on the next write-readiness event.
fn noblk_send<T: Transport>(transport: &mut T, bytes: &[u8]) -> Result<usize> {
    match transport.send(bytes) {
        // A non-blocking socket signals "no room" with EWOULDBLOCK, so zero
        // progress without it is not something to wait on.
        Ok(0) if !bytes.is_empty() => Err(Error::ZeroWrite),
        Ok(n) => Ok(n),
        Err(e) if is_transient(&e) => Ok(0),
        Err(e) => Err(Error::Io(e)),
    }
}

impl<T, R> std::fmt::Debug for Channel<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("token", &self.token)
            .field("state", &self.state)
            .field("remote_address", &self.remote_address)
            .field("receive", &self.receive)
            .field("outbound", &self.outbound)
            .field("write_interest", &self.write_interest)
            .finish()
    }
}
