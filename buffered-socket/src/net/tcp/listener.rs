use super::stream::TcpTransport;
use crate::reactor::poller::platform::{
    sys_accept, sys_bind, sys_close, sys_ipv6_is_necessary, sys_listen, sys_parse_sockaddr,
    sys_set_reuseaddr, sys_socket, sys_sockname,
};

use std::io;
use std::net::SocketAddr;
use std::os::fd::{AsRawFd, RawFd};

/// Length of the kernel queue of pending connections.
const BACKLOG: i32 = 128;

/// A non-blocking TCP listener.
///
/// Hand it to [`EventLoop::serve`](crate::reactor::EventLoop::serve), which
/// accepts connections as they arrive.
pub struct TcpListener {
    /// File descriptor of the listening socket.
    fd: RawFd,
}

impl TcpListener {
    /// Binds a TCP listener to the given address.
    ///
    /// The address must be a valid socket address string, such as
    /// `"127.0.0.1:8080"` or `"[::1]:8080"`; port `0` picks a free port.
    ///
    /// This function:
    /// - creates a non-blocking socket,
    /// - enables `SO_REUSEADDR`,
    /// - configures IPv6 dual-stack if applicable,
    /// - binds and starts listening.
    pub fn bind(address: &str) -> io::Result<Self> {
        let (storage, len) = sys_parse_sockaddr(address)?;
        let domain = storage.ss_family as i32;

        let fd = sys_socket(domain)?;
        // Owned from here on so every early return closes the socket.
        let listener = Self { fd };

        sys_set_reuseaddr(fd)?;
        sys_ipv6_is_necessary(fd, domain)?;
        sys_bind(fd, &storage, len)?;
        sys_listen(fd, BACKLOG)?;

        Ok(listener)
    }

    /// Accepts one pending connection.
    ///
    /// Fails with [`io::ErrorKind::WouldBlock`] when none is pending.
    pub fn accept(&self) -> io::Result<(TcpTransport, SocketAddr)> {
        let (fd, address) = sys_accept(self.fd)?;

        Ok((TcpTransport::from_raw_fd(fd), address))
    }

    /// Returns the local socket address of this listener.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        sys_sockname(self.fd)
    }
}

impl AsRawFd for TcpListener {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for TcpListener {
    /// Closes the listening socket.
    fn drop(&mut self) {
        sys_close(self.fd);
    }
}
