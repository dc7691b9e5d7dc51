//! Internal data structures.
//!
//! This module exposes a [`Slab`] used by the event loop to store
//! connections under small, reusable tokens.

mod slab;

pub(crate) use slab::Slab;
