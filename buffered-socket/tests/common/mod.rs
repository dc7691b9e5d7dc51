//! In-memory transport, reactor and protocol used by the integration tests.

#![allow(dead_code)]

use buffered_socket::{Channel, Protocol, Reactor, Result, Token, Transport};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

/// One scripted outcome of [`Transport::recv`].
#[derive(Clone, Debug)]
pub enum RecvStep {
    Data(Vec<u8>),
    WouldBlock,
    Eof,
    Fail(io::ErrorKind),
}

/// One scripted outcome of [`Transport::send`].
#[derive(Clone, Debug)]
pub enum SendStep {
    /// Accept at most this many bytes.
    Accept(usize),
    WouldBlock,
    Zero,
    Fail(io::ErrorKind),
}

#[derive(Default)]
pub struct Wire {
    /// Scripted reads; an empty script would block.
    pub inbound: VecDeque<RecvStep>,

    /// Scripted writes; an empty script accepts everything.
    pub plan: VecDeque<SendStep>,

    /// Every byte the transport accepted, in order.
    pub written: Vec<u8>,

    pub send_calls: usize,
    pub recv_calls: usize,

    /// Size of the buffer handed to the last `recv`.
    pub last_recv_len: usize,

    pub close_read_calls: usize,
    pub close_write_calls: usize,

    /// `None` makes `remote_address` fail.
    pub address: Option<String>,

    pub dropped: bool,
}

#[derive(Clone)]
pub struct FakeTransport(pub Rc<RefCell<Wire>>);

impl FakeTransport {
    pub fn new() -> Self {
        let wire = Wire {
            address: Some("10.0.0.7".to_owned()),
            ..Wire::default()
        };

        Self(Rc::new(RefCell::new(wire)))
    }

    pub fn wire(&self) -> std::cell::RefMut<'_, Wire> {
        self.0.borrow_mut()
    }
}

impl Transport for FakeTransport {
    fn send(&mut self, buffer: &[u8]) -> io::Result<usize> {
        let mut wire = self.0.borrow_mut();
        wire.send_calls += 1;

        let accepted = match wire.plan.pop_front() {
            None => buffer.len(),
            Some(SendStep::Accept(n)) => n.min(buffer.len()),
            Some(SendStep::WouldBlock) => return Err(io::ErrorKind::WouldBlock.into()),
            Some(SendStep::Zero) => 0,
            Some(SendStep::Fail(kind)) => return Err(kind.into()),
        };

        wire.written.extend_from_slice(&buffer[..accepted]);
        Ok(accepted)
    }

    fn recv(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        let mut wire = self.0.borrow_mut();
        wire.recv_calls += 1;
        wire.last_recv_len = buffer.len();

        match wire.inbound.pop_front() {
            None | Some(RecvStep::WouldBlock) => Err(io::ErrorKind::WouldBlock.into()),
            Some(RecvStep::Eof) => Ok(0),
            Some(RecvStep::Fail(kind)) => Err(kind.into()),
            Some(RecvStep::Data(mut data)) => {
                let n = data.len().min(buffer.len());
                buffer[..n].copy_from_slice(&data[..n]);

                if n < data.len() {
                    let rest = data.split_off(n);
                    wire.inbound.push_front(RecvStep::Data(rest));
                }

                Ok(n)
            }
        }
    }

    fn remote_address(&self) -> io::Result<String> {
        self.0
            .borrow()
            .address
            .clone()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))
    }

    fn close_read(&mut self) -> io::Result<()> {
        self.0.borrow_mut().close_read_calls += 1;
        Ok(())
    }

    fn close_write(&mut self) -> io::Result<()> {
        self.0.borrow_mut().close_write_calls += 1;
        Ok(())
    }
}

impl Drop for FakeTransport {
    fn drop(&mut self) {
        // Only the clone owned by the connection counts.
        if Rc::strong_count(&self.0) == 2 {
            self.0.borrow_mut().dropped = true;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interest {
    Read(Token),
    Write(Token),
    CancelWrite(Token),
    Deregister(Token),
}

/// Records every interest change.
#[derive(Clone, Default)]
pub struct FakeReactor {
    pub calls: Rc<RefCell<Vec<Interest>>>,
}

impl FakeReactor {
    pub fn calls(&self) -> Vec<Interest> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, interest: Interest) -> usize {
        self.calls.borrow().iter().filter(|&&c| c == interest).count()
    }
}

impl Reactor for FakeReactor {
    fn register_read_interest(&mut self, token: Token) -> Result<()> {
        self.calls.borrow_mut().push(Interest::Read(token));
        Ok(())
    }

    fn register_write_interest(&mut self, token: Token) -> Result<()> {
        self.calls.borrow_mut().push(Interest::Write(token));
        Ok(())
    }

    fn cancel_write_interest(&mut self, token: Token) -> Result<()> {
        self.calls.borrow_mut().push(Interest::CancelWrite(token));
        Ok(())
    }

    fn deregister(&mut self, token: Token) -> Result<()> {
        self.calls.borrow_mut().push(Interest::Deregister(token));
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    Accept,
    Read,
    Close,
}

/// A protocol that records its hooks and drains a configurable amount of
/// input on every read.
#[derive(Default)]
pub struct Recorder {
    pub hooks: Rc<RefCell<Vec<Hook>>>,

    /// Bytes consumed by the protocol, in order.
    pub received: Rc<RefCell<Vec<u8>>>,

    /// Bytes to consume per read; `None` drains everything.
    pub consume: Option<usize>,

    pub close_on_accept: bool,
    pub close_on_read: bool,
}

impl Recorder {
    pub fn hooks(&self) -> Vec<Hook> {
        self.hooks.borrow().clone()
    }
}

impl<T: Transport, R: Reactor> Protocol<T, R> for Recorder {
    fn on_accept(&mut self, channel: &mut Channel<T, R>) {
        self.hooks.borrow_mut().push(Hook::Accept);

        if self.close_on_accept {
            channel.close_connection();
        }
    }

    fn on_read(&mut self, channel: &mut Channel<T, R>) {
        self.hooks.borrow_mut().push(Hook::Read);

        let len = self
            .consume
            .unwrap_or(usize::MAX)
            .min(channel.recv_len());

        let mut buffer = vec![0u8; len];
        assert!(channel.recv(&mut buffer));
        self.received.borrow_mut().extend_from_slice(&buffer);

        if self.close_on_read {
            channel.close_connection();
        }
    }

    fn on_close(&mut self, _channel: &mut Channel<T, R>) {
        self.hooks.borrow_mut().push(Hook::Close);
    }
}

/// Deterministic payload of `len` bytes.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
