//! Platform-specific I/O poller.
//!
//! The poller is used by the event loop to:
//! - register sockets with read/write interest,
//! - wait for I/O readiness events,
//! - be woken up from other threads (shutdown requests).
//!
//! Only the Linux `epoll` backend exists; `unix` holds the raw socket
//! syscalls shared by the poller and the TCP types.

pub(crate) mod common;
pub(crate) mod epoll;
pub(crate) mod unix;

pub(crate) use common::{Interest, Waker};

pub(crate) type Poller = epoll::EpollPoller;

pub(crate) use unix as platform;
