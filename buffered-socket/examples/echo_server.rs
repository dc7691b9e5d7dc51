//! Example: line-based TCP echo server on the epoll event loop
//!
//! Run with `RUST_LOG=buffered_socket=debug` to follow connections, then
//! talk to it with `nc 127.0.0.1 9000`.

use buffered_socket::net::TcpListener;
use buffered_socket::reactor::EventLoopBuilder;
use buffered_socket::{Channel, ConnectionBuilder, Protocol, Reactor, Transport};

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Echoes complete lines; partial lines wait in the receive buffer.
struct LineEcho {
    lines: usize,
}

impl<T: Transport, R: Reactor> Protocol<T, R> for LineEcho {
    fn on_accept(&mut self, channel: &mut Channel<T, R>) {
        info!(peer = channel.remote_address(), "client connected");
    }

    fn on_read(&mut self, channel: &mut Channel<T, R>) {
        while let Some(end) = channel.received().iter().position(|&b| b == b'\n') {
            let mut line = vec![0u8; end + 1];
            channel.recv(&mut line);
            self.lines += 1;

            if channel.send(&line).is_err() {
                channel.close_connection();
                return;
            }
        }
    }

    fn on_close(&mut self, channel: &mut Channel<T, R>) {
        info!(peer = channel.remote_address(), lines = self.lines, "client left");
    }
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let listener = TcpListener::bind("127.0.0.1:9000")?;

    let mut event_loop = EventLoopBuilder::new()
        .connection(ConnectionBuilder::new().receive_buffer(16 * 1024))
        .build()?;

    event_loop.serve(&listener, || LineEcho { lines: 0 })
}
