use crate::reactor::poller::platform::{
    sys_close, sys_peername, sys_recv, sys_send, sys_shutdown, sys_sockname,
};
use crate::transport::Transport;

use std::io;
use std::net::{Shutdown, SocketAddr};
use std::os::fd::{AsRawFd, RawFd};

/// A connected, non-blocking TCP socket.
///
/// `TcpTransport` is the [`Transport`] of connections accepted by the
/// event loop. The socket is closed when the transport is dropped, which a
/// connection does when it closes.
#[derive(Debug)]
pub struct TcpTransport {
    fd: RawFd,
}

impl TcpTransport {
    /// Wraps a connected socket; the socket must already be non-blocking.
    pub(crate) fn from_raw_fd(fd: RawFd) -> Self {
        Self { fd }
    }

    /// Returns the address of the remote peer.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        sys_peername(self.fd)
    }

    /// Returns the local address of the socket.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        sys_sockname(self.fd)
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, buffer: &[u8]) -> io::Result<usize> {
        sys_send(self.fd, buffer)
    }

    fn recv(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        sys_recv(self.fd, buffer)
    }

    /// Renders the peer host, without the port.
    fn remote_address(&self) -> io::Result<String> {
        Ok(self.peer_addr()?.ip().to_string())
    }

    fn close_read(&mut self) -> io::Result<()> {
        sys_shutdown(self.fd, Shutdown::Read)
    }

    fn close_write(&mut self) -> io::Result<()> {
        sys_shutdown(self.fd, Shutdown::Write)
    }
}

impl AsRawFd for TcpTransport {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for TcpTransport {
    /// Closes the socket.
    fn drop(&mut self) {
        sys_close(self.fd);
    }
}
