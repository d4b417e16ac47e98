//! Reusable scratch buffers for loading segments.
//!
//! A [`Buffer`] holds one segment's worth of networks and output sets.
//! Buffers are checked out of a [`BufferPool`] for one load/prune/store cycle
//! and go back automatically when the [`Checkout`] guard is dropped, so early
//! returns through `?` never leak them. An empty pool allocates a fresh buffer.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

use crate::network::Network;
use crate::set::OutputSet;

#[derive(Debug, Clone)]
pub struct Buffer {
    pub nets: Vec<Network>,
    pub sets: Vec<OutputSet>,
}

impl Buffer {
    pub fn new(n: u8, k: u8, capacity: usize) -> Self {
        Self {
            nets: vec![Network::new(n, k); capacity],
            sets: vec![OutputSet::new(n); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.sets.len()
    }
}

pub struct BufferPool {
    n: u8,
    k: u8,
    capacity: usize,
    free: Mutex<Vec<Buffer>>,
}

impl BufferPool {
    /// Creates a pool pre-filled with `prealloc` buffers of `capacity` records.
    pub fn new(n: u8, k: u8, capacity: usize, prealloc: usize) -> Self {
        Self {
            n,
            k,
            capacity,
            free: Mutex::new((0..prealloc).map(|_| Buffer::new(n, k, capacity)).collect()),
        }
    }

    /// Checks out a buffer, allocating one if none is free.
    pub fn get(&self) -> Checkout<'_> {
        let buffer = self
            .free
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or_else(|| Buffer::new(self.n, self.k, self.capacity));
        Checkout {
            pool: self,
            buffer: Some(buffer),
        }
    }

    fn put(&self, buffer: Buffer) {
        self.free
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(buffer);
    }

    /// Number of buffers currently free.
    pub fn available(&self) -> usize {
        self.free.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Exclusive use of a pooled buffer.
pub struct Checkout<'a> {
    pool: &'a BufferPool,
    buffer: Option<Buffer>,
}

impl Deref for Checkout<'_> {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        self.buffer.as_ref().expect("buffer is present until drop")
    }
}

impl DerefMut for Checkout<'_> {
    fn deref_mut(&mut self) -> &mut Buffer {
        self.buffer.as_mut().expect("buffer is present until drop")
    }
}

impl Drop for Checkout<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.put(buffer);
        }
    }
}
