//! Connection lifecycle, send path and receive path.
//!
//! A connection is split in two:
//! - [`Channel`](self::channel::Channel) owns the transport, the receive buffer, the
//!   outbound queue and the lifecycle state. It is the surface handed to
//!   protocol hooks.
//! - [`Connection`](self::core::Connection) pairs a channel with the application's protocol
//!   and implements the reactor-facing handlers.
//!
//! Handlers of one connection are never run concurrently, so none of this
//! state is locked.

pub(crate) mod builder;
pub(crate) mod channel;
pub(crate) mod core;
pub(crate) mod state;
pub(crate) mod status;
