use std::mem::MaybeUninit;

/// A slab of values addressed by reusable indices.
///
/// The event loop stores its connections here: a connection's index is its
/// [`Token`](crate::Token), handed to the poller with every registration.
/// Freed indices are reused by later insertions.
///
/// Internally, it keeps track of:
/// - initialized slots,
/// - free indices,
/// - and uninitialized memory using [`MaybeUninit`].
pub(crate) struct Slab<T> {
    /// Storage for items (may contain uninitialized slots).
    items: Vec<MaybeUninit<T>>,
    /// Stack of free indices that can be reused.
    free: Vec<usize>,
    /// Marks whether a slot is currently initialized.
    used: Vec<bool>,
    /// Number of initialized slots.
    len: usize,
}

impl<T> Slab<T> {
    /// Creates a slab with `size` free slots.
    pub(crate) fn new(size: usize) -> Self {
        let items = (0..size).map(|_| MaybeUninit::<T>::uninit()).collect();
        // Reversed so that the lowest index is handed out first.
        let free = (0..size).rev().collect();
        let used = vec![false; size];

        Self {
            items,
            free,
            used,
            len: 0,
        }
    }

    /// Number of values currently stored.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Inserts the value built by `make` from its future index.
    ///
    /// Lets a value know its own index, which connections need for their
    /// token. The slab doubles its size when no slot is free.
    pub(crate) fn insert_with(&mut self, make: impl FnOnce(usize) -> T) -> usize {
        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                let len = self.items.len();
                let new_len = if len == 0 { 1 } else { 2 * len };

                self.items
                    .extend((len..new_len).map(|_| MaybeUninit::<T>::uninit()));
                self.free.extend(((len + 1)..new_len).rev());
                self.used.resize(new_len, false);

                len
            }
        };

        self.items[index] = MaybeUninit::new(make(index));
        self.used[index] = true;
        self.len += 1;

        index
    }

    /// Returns `true` if `index` holds a value.
    pub(crate) fn contains(&self, index: usize) -> bool {
        self.used.get(index).copied().unwrap_or(false)
    }

    /// Returns a mutable reference to the value at `index`, if any.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if !self.contains(index) {
            return None;
        }

        // SAFETY: `used[index]` guarantees the slot is initialized.
        Some(unsafe { self.items[index].assume_init_mut() })
    }

    /// Removes and returns the value at `index`, if any.
    ///
    /// The slot becomes free and may be reused by future insertions.
    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        if !self.contains(index) {
            return None;
        }

        self.free.push(index);
        self.used[index] = false;
        self.len -= 1;

        // SAFETY: the slot was initialized and is now marked unused, so it
        // is read exactly once.
        let item = unsafe { self.items[index].assume_init_read() };
        self.items[index] = MaybeUninit::uninit();

        Some(item)
    }
}

impl<T> Drop for Slab<T> {
    /// Drops all initialized elements stored in the slab.
    fn drop(&mut self) {
        for (slot, &used) in self.items.iter_mut().zip(self.used.iter()) {
            if used {
                // SAFETY: `used` marks initialized slots.
                unsafe {
                    slot.assume_init_drop();
                }
            }
        }
    }
}
