use super::command::Command;
use super::poller::Waker;
use super::{Reactor, Token};
use crate::error::{Error, Result};

use std::sync::Arc;
use std::sync::mpsc::Sender;

/// A handle used to communicate with an [`EventLoop`].
///
/// Every connection driven by the loop holds a clone and uses it, through
/// the [`Reactor`] trait, to change its readiness interest. The handle is
/// `Send`: other threads use it to [`shutdown`](Self::shutdown) the loop.
///
/// [`EventLoop`]: super::EventLoop
#[derive(Clone)]
pub struct ReactorHandle {
    /// Sender side of the command channel.
    sender: Sender<Command>,

    /// Waker used to interrupt the poller.
    waker: Arc<Waker>,
}

impl ReactorHandle {
    pub(crate) fn new(sender: Sender<Command>, waker: Arc<Waker>) -> Self {
        Self { sender, waker }
    }

    /// Asks the event loop to stop.
    ///
    /// [`EventLoop::serve`](super::EventLoop::serve) returns once the loop
    /// picks the request up; open connections are dropped with the loop.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)?;
        self.waker.wake();
        Ok(())
    }

    /// Queues a command for the loop.
    ///
    /// Interest commands are only sent from handlers running on the loop
    /// thread, which drains the queue before polling again, so they do not
    /// wake the poller.
    fn send(&self, command: Command) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| Error::ReactorUnavailable)
    }
}

impl Reactor for ReactorHandle {
    fn register_read_interest(&mut self, token: Token) -> Result<()> {
        self.send(Command::WatchRead(token))
    }

    fn register_write_interest(&mut self, token: Token) -> Result<()> {
        self.send(Command::WatchWrite(token))
    }

    fn cancel_write_interest(&mut self, token: Token) -> Result<()> {
        self.send(Command::UnwatchWrite(token))
    }

    fn deregister(&mut self, token: Token) -> Result<()> {
        self.send(Command::Deregister(token))
    }
}
