use super::builder::DEFAULT_RECEIVE_BUFFER;
use super::channel::{Channel, Fill};
use super::state::State;
use super::status::{InputStatus, OutputStatus};
use crate::error::{Error, Result};
use crate::protocol::Protocol;
use crate::reactor::{Reactor, Token};
use crate::transport::Transport;

use tracing::{debug, warn};

/// A buffered, non-blocking connection driven by a reactor.
///
/// A `Connection` pairs a [`Channel`] (transport, receive buffer, outbound
/// queue, lifecycle) with the application's [`Protocol`]. The reactor calls:
/// - [`handle_input`](Self::handle_input) on read-readiness,
/// - [`handle_output`](Self::handle_output) on write-readiness,
/// - [`handle_close`](Self::handle_close) when a handler asked to close.
///
/// Handlers of one connection must never run concurrently; they all take
/// `&mut self`, so this holds as long as the connection is not shared.
///
/// The operations a protocol uses (`send`, `recv*`, `close_connection`) live
/// on the [`Channel`] and are also reachable from the connection itself.
pub struct Connection<T, R, P> {
    channel: Channel<T, R>,
    protocol: P,
}

impl<T, R, P> Connection<T, R, P>
where
    T: Transport,
    R: Reactor,
    P: Protocol<T, R>,
{
    /// Creates a connection with a receive buffer of
    /// [`DEFAULT_RECEIVE_BUFFER`](crate::DEFAULT_RECEIVE_BUFFER) bytes.
    ///
    /// Use [`ConnectionBuilder`](crate::ConnectionBuilder) to configure it.
    pub fn new(token: Token, reactor: R, protocol: P) -> Self {
        Self::with_capacity(token, reactor, protocol, DEFAULT_RECEIVE_BUFFER)
    }

    pub(crate) fn with_capacity(
        token: Token,
        reactor: R,
        protocol: P,
        receive_capacity: usize,
    ) -> Self {
        Self {
            channel: Channel::new(token, reactor, receive_capacity),
            protocol,
        }
    }

    /// Opens the connection over `transport`.
    ///
    /// This:
    /// 1. resolves the remote address,
    /// 2. invokes [`Protocol::on_accept`],
    /// 3. registers read interest for the lifetime of the connection,
    /// 4. moves to [`State::Open`].
    ///
    /// # Errors
    ///
    /// - [`Error::AddressUnavailable`] if the peer address cannot be read;
    ///   the transport is released and the connection is closed,
    /// - [`Error::Closed`] if `on_accept` closed the connection,
    /// - [`Error::AlreadyOpen`] if the connection was opened before,
    /// - reactor errors while registering read interest, after which the
    ///   connection is closed.
    pub fn open(&mut self, transport: T) -> Result<()> {
        self.channel.attach(transport)?;

        self.protocol.on_accept(&mut self.channel);

        if self.channel.is_closed() {
            return Err(Error::Closed);
        }

        if let Err(e) = self.channel.watch_read() {
            self.channel.close_connection();
            return Err(e);
        }

        self.channel.set_state(State::Open);

        debug!(
            token = %self.channel.token(),
            address = %self.channel.remote_address(),
            "connection opened"
        );

        Ok(())
    }

    /// Handles read-readiness.
    ///
    /// Reads once into the free space of the receive buffer, lets the
    /// protocol consume from it, then compacts the buffer.
    pub fn handle_input(&mut self) -> InputStatus {
        let (read, requested) = match self.channel.fill() {
            Fill::Read { read, requested } => (read, requested),
            Fill::WouldBlock => return InputStatus::WouldBlock,
            Fill::Eof => {
                debug!(token = %self.channel.token(), "peer closed the connection");
                return InputStatus::Close;
            }
            Fill::Full => {
                warn!(
                    token = %self.channel.token(),
                    buffered = self.channel.recv_len(),
                    "receive buffer full and not drained by the protocol"
                );
                return InputStatus::Close;
            }
            Fill::Failed(e) => {
                warn!(token = %self.channel.token(), error = %e, "receive failed");
                return InputStatus::Close;
            }
        };

        self.protocol.on_read(&mut self.channel);

        if self.channel.is_closed() {
            return InputStatus::Close;
        }

        self.channel.compact();

        if read == requested {
            InputStatus::MorePending
        } else {
            InputStatus::Drained
        }
    }

    /// Handles write-readiness.
    ///
    /// Sends the head of the outbound queue once. With an empty queue,
    /// write interest is cancelled instead.
    pub fn handle_output(&mut self) -> OutputStatus {
        self.channel.flush_head()
    }

    /// Handles a close requested by the reactor.
    ///
    /// Invokes [`Protocol::on_close`], then tears the connection down like
    /// [`close_connection`](Self::close_connection). Does nothing if the
    /// connection is already closed.
    pub fn handle_close(&mut self) {
        if self.channel.is_closed() {
            return;
        }

        self.protocol.on_close(&mut self.channel);
        self.channel.close_connection();
    }

    /// See [`Channel::send`].
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.channel.send(bytes)
    }

    /// See [`Channel::recv_len`].
    pub fn recv_len(&self) -> usize {
        self.channel.recv_len()
    }

    /// See [`Channel::recv_soft`].
    pub fn recv_soft(&self, dst: &mut [u8]) -> bool {
        self.channel.recv_soft(dst)
    }

    /// See [`Channel::recv`].
    pub fn recv(&mut self, dst: &mut [u8]) -> bool {
        self.channel.recv(dst)
    }

    /// See [`Channel::recv_skip`].
    pub fn recv_skip(&mut self, len: usize) {
        self.channel.recv_skip(len)
    }

    /// See [`Channel::remote_address`].
    pub fn remote_address(&self) -> &str {
        self.channel.remote_address()
    }

    /// See [`Channel::close_connection`].
    pub fn close_connection(&mut self) {
        self.channel.close_connection()
    }

    pub fn state(&self) -> State {
        self.channel.state()
    }

    pub fn token(&self) -> Token {
        self.channel.token()
    }

    pub fn channel(&self) -> &Channel<T, R> {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut Channel<T, R> {
        &mut self.channel
    }

    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    pub fn protocol_mut(&mut self) -> &mut P {
        &mut self.protocol
    }
}
