//! crates/logging/src/buffer.rs
//! Reusable byte buffers and the shared pool that recycles them.
//!
//! Formatting an entry needs a growable byte vector plus a small scratch
//! area for digits. Allocating both per record would dominate the cost of a
//! log call, so buffers are taken from a free list and handed back when the
//! record has been written. The pool has its own lock, held only to push or
//! pop, never across I/O.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Size of the digit scratch region carried by each [`Buffer`].
pub const SCRATCH_LEN: usize = 64;

/// Buffers whose contents reached this length are dropped instead of pooled.
pub const POOL_CEILING: usize = 256;

const DIGITS: &[u8; 10] = b"0123456789";

/// Growable byte sequence with a fixed scratch region for number formatting.
#[derive(Clone)]
pub struct Buffer {
    bytes: Vec<u8>,
    scratch: [u8; SCRATCH_LEN],
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Creates an empty buffer; no allocation happens until bytes are added.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            scratch: [0; SCRATCH_LEN],
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Reports whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Discards the contents, keeping the allocation.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Appends raw bytes.
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Appends one byte.
    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Last byte written, if any.
    #[must_use]
    pub fn last(&self) -> Option<u8> {
        self.bytes.last().copied()
    }

    /// Stores a literal byte at scratch position `i`. Returns one.
    pub(crate) fn put_scratch(&mut self, i: usize, byte: u8) -> usize {
        self.scratch[i] = byte;
        1
    }

    /// Formats `d` as exactly two zero-padded digits at scratch position `i`.
    /// Returns two.
    pub(crate) fn two_digits(&mut self, i: usize, mut d: u32) -> usize {
        self.scratch[i + 1] = DIGITS[(d % 10) as usize];
        d /= 10;
        self.scratch[i] = DIGITS[(d % 10) as usize];
        2
    }

    /// Formats `d` right-aligned in `n` positions at scratch position `i`,
    /// filling unused positions with `pad`. Returns `n`.
    pub(crate) fn n_digits(&mut self, n: usize, i: usize, mut d: u32, pad: u8) -> usize {
        let mut j = n;
        while j > 0 && d > 0 {
            j -= 1;
            self.scratch[i + j] = DIGITS[(d % 10) as usize];
            d /= 10;
        }
        while j > 0 {
            j -= 1;
            self.scratch[i + j] = pad;
        }
        n
    }

    /// Formats `d` with as many digits as it needs at scratch position `i`.
    /// Returns the number of digits written.
    pub(crate) fn some_digits(&mut self, i: usize, mut d: u64) -> usize {
        // Render from the top of the scratch area, then move down.
        let mut j = SCRATCH_LEN;
        loop {
            j -= 1;
            self.scratch[j] = DIGITS[(d % 10) as usize];
            d /= 10;
            if d == 0 {
                break;
            }
        }
        let width = SCRATCH_LEN - j;
        self.scratch.copy_within(j.., i);
        width
    }

    /// Appends the first `n` scratch bytes to the contents.
    pub(crate) fn commit_scratch(&mut self, n: usize) {
        self.bytes.extend_from_slice(&self.scratch[..n]);
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.bytes.len())
            .field("capacity", &self.bytes.capacity())
            .finish_non_exhaustive()
    }
}

/// Free list of [`Buffer`]s shared by all logging threads.
#[derive(Debug, Default)]
pub struct BufferPool {
    free: Mutex<Vec<Buffer>>,
}

impl BufferPool {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Returns a cleared buffer, recycled when one is available.
    pub fn get(&self) -> Buffer {
        let recycled = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        match recycled {
            Some(mut buffer) => {
                buffer.clear();
                buffer
            }
            None => Buffer::new(),
        }
    }

    /// Hands `buffer` back for reuse unless it has grown to [`POOL_CEILING`].
    pub fn put(&self, buffer: Buffer) {
        if buffer.len() >= POOL_CEILING {
            return;
        }
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(buffer);
    }

    /// Takes a buffer that returns itself to the pool when dropped.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        PooledBuffer {
            pool: self,
            buffer: self.get(),
        }
    }

    /// Number of buffers waiting on the free list.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Scoped [`Buffer`] that goes back to its [`BufferPool`] on drop.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: Buffer,
}

impl Deref for PooledBuffer<'_> {
    type Target = Buffer;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.buffer));
    }
}
