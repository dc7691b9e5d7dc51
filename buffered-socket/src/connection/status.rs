/// What the reactor should do after running a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Keep the registration and wait for the next readiness event.
    Wait,

    /// Invoke the same handler again right away.
    Again,

    /// Tear the connection down through `handle_close`.
    Close,
}

/// Outcome of [`Connection::handle_input`](crate::Connection::handle_input).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputStatus {
    /// The transport had nothing to read; no state changed.
    WouldBlock,

    /// Bytes were read and handed to the protocol; nothing more is expected
    /// right now.
    Drained,

    /// The read filled the whole free space; more data may be pending.
    MorePending,

    /// EOF, a transport error, a full buffer nobody drains, or the protocol
    /// closed the connection.
    Close,
}

impl InputStatus {
    pub fn dispatch(self) -> Dispatch {
        match self {
            Self::WouldBlock | Self::Drained => Dispatch::Wait,
            Self::MorePending => Dispatch::Again,
            Self::Close => Dispatch::Close,
        }
    }
}

/// Outcome of [`Connection::handle_output`](crate::Connection::handle_output).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputStatus {
    /// Nothing was queued; write interest has been cancelled.
    Idle,

    /// The head fragment was sent completely; the next one may go too.
    Flushed,

    /// The head fragment was sent partially and waits for the next event.
    Partial,

    /// The transport failed.
    Close,
}

impl OutputStatus {
    pub fn dispatch(self) -> Dispatch {
        match self {
            Self::Idle | Self::Partial => Dispatch::Wait,
            Self::Flushed => Dispatch::Again,
            Self::Close => Dispatch::Close,
        }
    }
}
