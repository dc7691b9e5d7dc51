//! Byte buffers backing a connection.
//!
//! This module provides the two storage primitives a [`Connection`]
//! owns:
//! - [`ByteCursorBuffer`]: the receive buffer, filled by the transport and
//!   drained by the protocol,
//! - [`OutboundQueue`]: the ordered queue of [`Fragment`]s that could not be
//!   written inline and wait for write-readiness.
//!
//! Both are plain values with no knowledge of sockets or reactors.
//!
//! [`Connection`]: crate::Connection

mod cursor;
mod queue;

pub use cursor::ByteCursorBuffer;
pub use queue::{Fragment, OutboundQueue};
