//! TCP networking primitives.
//!
//! This module provides the non-blocking TCP types the [`EventLoop`]
//! drives:
//! - [`TcpListener`]: binds a port and accepts connections,
//! - [`TcpTransport`]: a connected socket implementing [`Transport`].
//!
//! They are thin wrappers over raw file descriptors and never block.
//!
//! [`EventLoop`]: crate::reactor::EventLoop
//! [`Transport`]: crate::Transport

mod tcp;

pub use tcp::listener::TcpListener;
pub use tcp::stream::TcpTransport;
