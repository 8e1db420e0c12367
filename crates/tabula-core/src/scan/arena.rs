//! Insert-only storage owned by one scan configuration.
//!
//! Entries are never moved or freed before the owner is dropped, so handles
//! stay valid for the owner's whole lifetime. Handles are plain indexes and
//! resolve only against the store that issued them.

use std::{fmt, marker::PhantomData};

///
/// ArenaSlice
///
/// Handle to one byte string inside a `ByteArena`.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ArenaSlice {
    offset: usize,
    len: usize,
}

impl ArenaSlice {
    #[must_use]
    pub const fn len(self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

///
/// ByteArena
///
/// Bump-allocated byte storage; every allocation is appended.
///

#[derive(Clone, Debug, Default)]
pub struct ByteArena {
    bytes: Vec<u8>,
}

impl ByteArena {
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Copy `bytes` into the arena.
    pub fn alloc(&mut self, bytes: &[u8]) -> ArenaSlice {
        let offset = self.bytes.len();
        self.bytes.extend_from_slice(bytes);

        ArenaSlice {
            offset,
            len: bytes.len(),
        }
    }

    #[must_use]
    pub fn get(&self, slice: ArenaSlice) -> &[u8] {
        &self.bytes[slice.offset..slice.offset + slice.len]
    }

    /// Total bytes allocated so far.
    #[must_use]
    pub const fn allocated(&self) -> usize {
        self.bytes.len()
    }
}

///
/// SlabId
///
/// Typed handle to one entry of a `Slab<T>`.
///

pub struct SlabId<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SlabId<T> {
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl<T> Clone for SlabId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlabId<T> {}

impl<T> PartialEq for SlabId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for SlabId<T> {}

impl<T> fmt::Debug for SlabId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlabId({})", self.index)
    }
}

///
/// Slab
///
/// Insert-only object pool handing out stable typed handles.
///

#[derive(Clone, Debug)]
pub struct Slab<T> {
    entries: Vec<T>,
}

impl<T> Slab<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> SlabId<T> {
        self.entries.push(value);

        SlabId {
            index: self.entries.len() - 1,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn get(&self, id: SlabId<T>) -> &T {
        &self.entries[id.index]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}

///
/// TESTS
///
