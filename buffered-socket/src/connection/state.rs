/// Lifecycle state of a connection.
///
/// States only move forward: `Accepted → Open → Closing → Closed`.
/// The transport is attached by `open` and released on close.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Created by the acceptor; `open` has not completed yet.
    Accepted,

    /// Registered with the reactor and exchanging data.
    Open,

    /// Teardown in progress.
    Closing,

    /// Torn down; the transport has been released.
    Closed,
}

impl State {
    /// Returns `true` while the connection may still perform I/O.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Accepted | Self::Open)
    }
}
