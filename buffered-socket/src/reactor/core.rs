use super::command::Command;
use super::event::Event;
use super::handle::ReactorHandle;
use super::poller::{Interest, Poller};
use super::Token;
use crate::connection::builder::ConnectionBuilder;
use crate::connection::core::Connection;
use crate::connection::status::Dispatch;
use crate::net::{TcpListener, TcpTransport};
use crate::protocol::Protocol;
use crate::utils::Slab;

use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use tracing::{debug, info, warn};

/// Token of the listening socket; never handed out by the slab.
const LISTENER: usize = usize::MAX - 1;

type TcpConnection<P> = Connection<TcpTransport, ReactorHandle, P>;

/// A connection owned by the loop, with its poller registration.
struct Entry<P> {
    /// Socket descriptor, kept to update the registration.
    fd: RawFd,

    /// Interest currently requested by the connection.
    interest: Interest,

    /// Whether `fd` has been added to the poller.
    registered: bool,

    connection: TcpConnection<P>,
}

/// A single-threaded epoll reactor serving TCP connections.
///
/// The loop:
/// 1. Polls the OS for readiness events
/// 2. Accepts pending connections and opens them with a fresh protocol
/// 3. Runs `handle_input` / `handle_output` on ready connections,
///    re-running them while they report [`Dispatch::Again`]
/// 4. Runs `handle_close` on connections that asked to close
/// 5. Applies the interest commands the handlers sent through their
///    [`ReactorHandle`] and drops closed connections
///
/// Handlers of one connection never overlap: everything runs on the thread
/// calling [`serve`](Self::serve).
pub struct EventLoop<P> {
    /// Platform poller.
    poller: Poller,

    /// Buffer used to collect I/O events from the poller.
    events: Vec<Event>,

    /// Channel receiving commands from connections and other threads.
    receiver: Receiver<Command>,

    /// Handle cloned into every connection.
    handle: ReactorHandle,

    /// Live connections indexed by token.
    connections: Slab<Entry<P>>,

    /// Upper bound on a single blocking poll.
    poll_timeout: Option<Duration>,

    /// Configuration of accepted connections.
    builder: ConnectionBuilder,
}

impl<P> EventLoop<P> {
    pub(crate) fn new(
        event_capacity: usize,
        poll_timeout: Option<Duration>,
        builder: ConnectionBuilder,
    ) -> io::Result<Self> {
        let poller = Poller::new(event_capacity)?;
        let (sender, receiver) = channel();
        let handle = ReactorHandle::new(sender, poller.waker());

        Ok(Self {
            poller,
            events: Vec::with_capacity(event_capacity),
            receiver,
            handle,
            connections: Slab::new(64),
            poll_timeout,
            builder,
        })
    }

    /// Returns a handle to this loop, e.g. to shut it down from another
    /// thread.
    pub fn handle(&self) -> ReactorHandle {
        self.handle.clone()
    }

    /// Number of open connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl<P> EventLoop<P>
where
    P: Protocol<TcpTransport, ReactorHandle>,
{
    /// Accepts connections on `listener` and drives them until
    /// [`ReactorHandle::shutdown`] is called.
    ///
    /// Each accepted connection is opened with a protocol built by
    /// `factory`.
    ///
    /// # Errors
    ///
    /// Fails if the listener cannot be registered or polling fails; the
    /// loop stops in both cases.
    pub fn serve<F>(&mut self, listener: &TcpListener, mut factory: F) -> io::Result<()>
    where
        F: FnMut() -> P,
    {
        self.poller
            .register(listener.as_raw_fd(), LISTENER, Interest::READ)?;

        info!(address = ?listener.local_addr().ok(), "serving");

        let result = self.run(listener, &mut factory);

        if let Err(e) = self.poller.deregister(listener.as_raw_fd()) {
            debug!(error = %e, "listener deregistration failed");
        }

        result
    }

    fn run<F>(&mut self, listener: &TcpListener, factory: &mut F) -> io::Result<()>
    where
        F: FnMut() -> P,
    {
        loop {
            if self.apply_commands() {
                info!(connections = self.connections.len(), "shutting down");
                return Ok(());
            }

            let mut events = std::mem::take(&mut self.events);
            self.poller.poll(&mut events, self.poll_timeout)?;

            for event in &events {
                if event.token == LISTENER {
                    self.accept(listener, factory);
                } else {
                    self.dispatch(event);
                }

                // Closed descriptors may be reused by the next accept, so
                // registrations are brought up to date after every event.
                if self.apply_commands() {
                    info!(connections = self.connections.len(), "shutting down");
                    return Ok(());
                }
            }

            self.events = events;
        }
    }

    /// Accepts every pending connection.
    fn accept<F>(&mut self, listener: &TcpListener, factory: &mut F)
    where
        F: FnMut() -> P,
    {
        loop {
            match listener.accept() {
                Ok((transport, address)) => {
                    debug!(%address, "accepted");
                    self.open(transport, factory());
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    break;
                }
            }
        }
    }

    /// Stores a new connection and opens it.
    fn open(&mut self, transport: TcpTransport, protocol: P) {
        let fd = transport.as_raw_fd();
        let handle = self.handle.clone();
        let builder = self.builder;

        let index = self.connections.insert_with(|index| Entry {
            fd,
            interest: Interest::NONE,
            registered: false,
            connection: builder.build(Token(index), handle, protocol),
        });

        let Some(entry) = self.connections.get_mut(index) else {
            return;
        };

        if let Err(e) = entry.connection.open(transport) {
            debug!(token = index, error = %e, "open failed");
            self.connections.remove(index);
        }
    }

    /// Runs the handlers of the connection an event belongs to.
    fn dispatch(&mut self, event: &Event) {
        let Some(entry) = self.connections.get_mut(event.token) else {
            return;
        };
        let connection = &mut entry.connection;

        let mut close = false;

        if event.readable {
            close = drive(|| connection.handle_input().dispatch());
        }

        if !close && event.writable {
            close = drive(|| connection.handle_output().dispatch());
        }

        if close {
            connection.handle_close();
        }

        if connection.channel().is_closed() {
            // The socket was closed with its transport, which also removed
            // it from the epoll set.
            self.connections.remove(event.token);
        }
    }

    /// Applies pending commands. Returns `true` on shutdown.
    fn apply_commands(&mut self) -> bool {
        while let Ok(command) = self.receiver.try_recv() {
            match command {
                Command::WatchRead(token) => self.update(token, |i| i.read = true),
                Command::WatchWrite(token) => self.update(token, |i| i.write = true),
                Command::UnwatchWrite(token) => self.update(token, |i| i.write = false),
                Command::Deregister(token) => {
                    if let Some(entry) = self.connections.get_mut(token.0) {
                        entry.registered = false;
                        entry.interest = Interest::NONE;
                    }
                }
                Command::Shutdown => return true,
            }
        }

        false
    }

    /// Changes the interest of a live connection and updates the poller.
    fn update(&mut self, token: Token, change: impl FnOnce(&mut Interest)) {
        let Some(entry) = self.connections.get_mut(token.0) else {
            return;
        };

        let previous = entry.interest;
        change(&mut entry.interest);

        let unchanged = previous == entry.interest;
        if unchanged && (entry.registered || entry.interest == Interest::NONE) {
            return;
        }

        let result = if entry.registered {
            self.poller.reregister(entry.fd, token.0, entry.interest)
        } else {
            self.poller.register(entry.fd, token.0, entry.interest)
        };

        match result {
            Ok(()) => entry.registered = true,
            Err(e) => {
                warn!(%token, error = %e, "interest update failed");
                entry.connection.handle_close();
                self.connections.remove(token.0);
            }
        }
    }
}

/// Runs a handler until it stops asking to be re-run.
///
/// Returns `true` if the handler asked to close.
fn drive(mut handler: impl FnMut() -> Dispatch) -> bool {
    loop {
        match handler() {
            Dispatch::Again => continue,
            Dispatch::Wait => return false,
            Dispatch::Close => return true,
        }
    }
}
