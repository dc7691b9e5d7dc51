//! TCP networking implementation.
//!
//! It is split into:
//! - [`listener`]: accepting incoming TCP connections,
//! - [`stream`]: connected sockets used as connection transports.

pub mod listener;
pub mod stream;
