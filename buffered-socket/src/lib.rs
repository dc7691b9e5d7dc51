//! # buffered-socket
//!
//! **buffered-socket** is a non-blocking, buffered socket for event-driven
//! servers in the **Nebula** ecosystem.
//!
//! A [`Connection`] lets an application send arbitrary payloads without ever
//! blocking the calling thread, delivers every submitted byte in order (or
//! reports a failure), and keeps a compactable receive buffer that the
//! application drains at its own pace.
//!
//! The connection is driven by a reactor: readiness events call
//! [`Connection::handle_input`], [`Connection::handle_output`] and
//! [`Connection::handle_close`], which in turn invoke the application's
//! [`Protocol`] hooks. Both the reactor and the socket are consumed through
//! traits ([`Reactor`] and [`Transport`]) so the core logic can run against
//! any event loop, or against fakes in tests.
//!
//! It provides:
//!
//! - An **inline fast path** for sends, falling back to an ordered
//!   [`OutboundQueue`] drained on write-readiness
//! - A [`ByteCursorBuffer`] for the receive path with peek, consume, skip and
//!   compaction
//! - A Linux **epoll event loop** ([`reactor::EventLoop`]) and TCP
//!   primitives ([`net`]) to run real servers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use buffered_socket::net::TcpListener;
//! use buffered_socket::reactor::{EventLoopBuilder, ReactorHandle};
//! use buffered_socket::{Channel, Protocol, Reactor, Transport};
//!
//! struct Echo;
//!
//! impl<T: Transport, R: Reactor> Protocol<T, R> for Echo {
//!     fn on_read(&mut self, channel: &mut Channel<T, R>) {
//!         let mut buffer = vec![0u8; channel.recv_len()];
//!         if channel.recv(&mut buffer) && channel.send(&buffer).is_err() {
//!             channel.close_connection();
//!         }
//!     }
//! }
//!
//! let listener = TcpListener::bind("127.0.0.1:9000")?;
//! let mut event_loop = EventLoopBuilder::new().build()?;
//! event_loop.serve(&listener, || Echo)?;
//! ```
//!
//! ## Modules
//!
//! - [`buffer`]: Receive buffer and outbound fragment queue
//! - [`net`]: Non-blocking TCP listener and transport (Linux)
//! - [`reactor`]: Reactor capability and the epoll event loop (Linux)

mod connection;
mod error;
mod protocol;
mod transport;

#[cfg(target_os = "linux")]
mod utils;

pub mod buffer;
#[cfg(target_os = "linux")]
pub mod net;
pub mod reactor;

pub use buffer::{ByteCursorBuffer, Fragment, OutboundQueue};
pub use connection::builder::{ConnectionBuilder, DEFAULT_RECEIVE_BUFFER};
pub use connection::channel::Channel;
pub use connection::core::Connection;
pub use connection::state::State;
pub use connection::status::{Dispatch, InputStatus, OutputStatus};
pub use error::{Error, Result};
pub use protocol::Protocol;
pub use reactor::{Reactor, Token};
pub use transport::Transport;
