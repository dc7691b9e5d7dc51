use super::unix::sys_close;

use std::os::fd::RawFd;

/// Readiness a registration is waiting for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Interest {
    pub(crate) read: bool,
    pub(crate) write: bool,
}

impl Interest {
    pub(crate) const NONE: Self = Self {
        read: false,
        write: false,
    };

    pub(crate) const READ: Self = Self {
        read: true,
        write: false,
    };
}

/// Wake-up handle of a poller, wrapping an `eventfd`.
///
/// Shared between the poller and every [`ReactorHandle`]; the descriptor is
/// closed when the last owner goes away.
///
/// [`ReactorHandle`]: crate::reactor::ReactorHandle
pub(crate) struct Waker(pub(crate) RawFd);

impl Drop for Waker {
    fn drop(&mut self) {
        sys_close(self.0);
    }
}
