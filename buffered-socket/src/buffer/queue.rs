use std::collections::VecDeque;

/// An owned, partially sent byte span waiting in an [`OutboundQueue`].
///
/// A fragment owns a copy of the caller's bytes, so it can outlive the
/// `send` call that produced it. `sent` tracks how much of it already
/// reached the transport.
#[derive(Debug)]
pub struct Fragment {
    bytes: Box<[u8]>,
    sent: usize,
}

impl Fragment {
    /// Creates a fragment holding a copy of `bytes`, nothing sent yet.
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.into(),
            sent: 0,
        }
    }

    /// Total length of the fragment.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the fragment holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of bytes already handed to the transport.
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// The bytes that still have to be sent.
    pub fn remaining(&self) -> &[u8] {
        &self.bytes[self.sent..]
    }

    /// Records that `n` more bytes were sent.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the unsent remainder.
    pub fn advance(&mut self, n: usize) {
        assert!(
            n <= self.remaining().len(),
            "advance of {n} bytes exceeds the {} unsent",
            self.remaining().len()
        );

        self.sent += n;
    }

    /// Returns `true` once every byte has been sent.
    pub fn is_complete(&self) -> bool {
        self.sent == self.bytes.len()
    }
}

impl From<Vec<u8>> for Fragment {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
            sent: 0,
        }
    }
}

/// FIFO queue of [`Fragment`]s awaiting write-readiness.
///
/// The queue order is the submission order: the head is always the oldest
/// unsent payload, and a partially sent head goes back to the head, never
/// the tail. The queue also keeps a running count of unsent bytes.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    fragments: VecDeque<Fragment>,
    pending: usize,
}

impl OutboundQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no fragment is waiting.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of queued fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Total number of unsent bytes across all fragments.
    pub fn pending_bytes(&self) -> usize {
        self.pending
    }

    /// Appends a fragment at the tail.
    pub fn push_back(&mut self, fragment: Fragment) {
        self.pending += fragment.remaining().len();
        self.fragments.push_back(fragment);
    }

    /// Puts a partially sent fragment back at the head.
    pub fn push_front(&mut self, fragment: Fragment) {
        self.pending += fragment.remaining().len();
        self.fragments.push_front(fragment);
    }

    /// Removes the head fragment.
    pub fn pop_front(&mut self) -> Option<Fragment> {
        let fragment = self.fragments.pop_front()?;
        self.pending -= fragment.remaining().len();
        Some(fragment)
    }

    /// Drops every fragment and returns the number of unsent bytes discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.pending;

        self.fragments.clear();
        self.pending = 0;

        discarded
    }
}
