/// A fixed-capacity byte store with independent read and write cursors.
///
/// Bytes are written at the write cursor (see [`writable`](Self::writable)
/// and [`fill`](Self::fill)) and read from the read cursor. Reading never
/// moves data; [`compact`](Self::compact) shifts the unread region back to
/// offset `0` to reclaim the space in front of it.
///
/// The buffer always upholds `read <= write <= capacity`.
///
/// ```text
/// 0          read           write          capacity
/// |  consumed  |   available   |  free space   |
/// ```
pub struct ByteCursorBuffer {
    /// Backing storage, allocated once.
    storage: Box<[u8]>,

    /// Offset of the first unread byte.
    read: usize,

    /// Offset one past the last written byte.
    write: usize,
}

impl ByteCursorBuffer {
    /// Creates an empty buffer holding at most `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            read: 0,
            write: 0,
        }
    }

    /// Total number of bytes the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of bytes written but not yet consumed.
    pub fn available(&self) -> usize {
        self.write - self.read
    }

    /// Number of bytes that can still be written without compacting.
    pub fn free_space(&self) -> usize {
        self.capacity() - self.write
    }

    /// Returns `true` if there are no unread bytes.
    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    /// The unread bytes, starting at the read cursor.
    pub fn readable(&self) -> &[u8] {
        &self.storage[self.read..self.write]
    }

    /// The free region, starting at the write cursor.
    ///
    /// Write into this slice, then commit the bytes with [`fill`](Self::fill).
    pub fn writable(&mut self) -> &mut [u8] {
        &mut self.storage[self.write..]
    }

    /// Commits `n` bytes previously written into [`writable`](Self::writable).
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the free space.
    pub fn fill(&mut self, n: usize) {
        assert!(
            n <= self.free_space(),
            "fill of {n} bytes exceeds free space of {}",
            self.free_space()
        );

        self.write += n;
    }

    /// Copies `dst.len()` unread bytes into `dst` without consuming them.
    ///
    /// Returns `false`, leaving `dst` untouched, if fewer bytes are available.
    pub fn peek(&self, dst: &mut [u8]) -> bool {
        let len = dst.len();

        if self.available() < len {
            return false;
        }

        dst.copy_from_slice(&self.storage[self.read..self.read + len]);
        true
    }

    /// Copies `dst.len()` unread bytes into `dst` and consumes them.
    ///
    /// Returns `false` with no effect if fewer bytes are available.
    pub fn consume(&mut self, dst: &mut [u8]) -> bool {
        if !self.peek(dst) {
            return false;
        }

        self.skip(dst.len());
        true
    }

    /// Consumes `n` unread bytes without copying them.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds [`available`](Self::available). Callers check
    /// availability first; skipping past the write cursor would expose bytes
    /// that were never received.
    pub fn skip(&mut self, n: usize) {
        assert!(
            n <= self.available(),
            "skip of {n} bytes exceeds the {} available",
            self.available()
        );

        self.read += n;
    }

    /// Moves the unread bytes to the start of the storage.
    ///
    /// After compaction the read cursor is `0` and the free space is
    /// `capacity - available`.
    pub fn compact(&mut self) {
        if self.read == 0 {
            return;
        }

        let available = self.available();
        self.storage.copy_within(self.read..self.write, 0);

        self.read = 0;
        self.write = available;
    }

    /// Discards every unread byte.
    pub fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
    }
}

impl std::fmt::Debug for ByteCursorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteCursorBuffer")
            .field("capacity", &self.capacity())
            .field("read", &self.read)
            .field("write", &self.write)
            .finish()
    }
}
