use crate::constants::{
    DEFAULT_BUFFER_CAPACITY, MAX_POOLED_BUFFER_CAPACITY, NONCE_BUFFER_POOL_SIZE,
    RECORDING_BUFFER_POOL_SIZE,
};
use bytes::BytesMut;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicUsize, Ordering},
};

/// Free list of fixed-size byte slices.
///
/// Every slice handed out has exactly `item_size` bytes. A slice is owned by
/// its [`PooledBytes`] guard until the guard is dropped, at which point it goes
/// back to the free list (or is discarded when the list is full).
pub struct BytePool {
    item_size: usize,
    slots: Mutex<SmallVec<[Box<[u8]>; NONCE_BUFFER_POOL_SIZE]>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl BytePool {
    #[inline]
    pub fn new(item_size: usize) -> Self {
        Self {
            item_size,
            slots: Mutex::new(SmallVec::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn with_capacity(capacity: usize, item_size: usize) -> Self {
        let pool = Self::new(item_size);
        {
            let mut slots = pool.slots.lock();
            for _ in 0..capacity.min(NONCE_BUFFER_POOL_SIZE) {
                slots.push(vec![0u8; item_size].into_boxed_slice());
            }
        }
        pool
    }

    #[inline]
    pub fn get(&self) -> PooledBytes<'_> {
        let recycled = self.slots.lock().pop();
        let buf = match recycled {
            Some(buf) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                vec![0u8; self.item_size].into_boxed_slice()
            }
        };

        PooledBytes { pool: self, buf }
    }

    #[inline]
    fn put(&self, buf: Box<[u8]>) {
        if buf.len() != self.item_size || buf.is_empty() {
            return;
        }

        let mut slots = self.slots.lock();
        if slots.len() < NONCE_BUFFER_POOL_SIZE {
            slots.push(buf);
        }
    }

    #[inline]
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.slots.lock().len()
    }

    #[inline]
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn miss_count(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for BytePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BytePool")
            .field("item_size", &self.item_size)
            .field("available", &self.available())
            .field("hits", &self.hit_count())
            .field("misses", &self.miss_count())
            .finish()
    }
}

/// Scoped checkout from a [`BytePool`].
pub struct PooledBytes<'a> {
    pool: &'a BytePool,
    buf: Box<[u8]>,
}

impl Deref for PooledBytes<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBytes<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledBytes<'_> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.buf));
    }
}

impl fmt::Debug for PooledBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledBytes")
            .field("len", &self.len())
            .finish()
    }
}

/// Bounded cache of growable buffers used to record response bodies.
#[derive(Debug)]
pub struct BufferPool {
    buffers: Mutex<SmallVec<[BytesMut; RECORDING_BUFFER_POOL_SIZE]>>,
    initial_capacity: usize,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl BufferPool {
    #[inline]
    pub fn new() -> Self {
        Self::with_initial_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    #[inline]
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self {
            buffers: Mutex::new(SmallVec::new()),
            initial_capacity,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn get(&self) -> PooledBuffer<'_> {
        let recycled = self.buffers.lock().pop();
        let buf = match recycled {
            Some(mut buf) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                buf.clear();
                buf
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                BytesMut::with_capacity(self.initial_capacity)
            }
        };

        PooledBuffer { pool: self, buf }
    }

    #[inline]
    fn recycle(&self, mut buffer: BytesMut) {
        // keep one-off large bodies out of the pool
        if buffer.capacity() > MAX_POOLED_BUFFER_CAPACITY {
            return;
        }

        let mut buffers = self.buffers.lock();
        if buffers.len() < RECORDING_BUFFER_POOL_SIZE {
            buffer.clear();
            buffers.push(buffer);
        }
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.buffers.lock().len()
    }

    #[inline]
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn miss_count(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Default for BufferPool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped checkout from a [`BufferPool`].
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: BytesMut,
}

impl Deref for PooledBuffer<'_> {
    type Target = BytesMut;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.recycle(std::mem::take(&mut self.buf));
    }
}

/// Appends `haystack` to `out` with every occurrence of `needle` replaced by
/// `replacement`. Returns the number of replacements made.
pub fn replace_all_into(
    out: &mut BytesMut,
    haystack: &[u8],
    needle: &[u8],
    replacement: &[u8],
) -> usize {
    let mut count = 0;
    let mut rest = haystack;

    while let Some(pos) = find(rest, needle) {
        let (head, tail) = rest.split_at(pos);
        out.extend_from_slice(head);
        out.extend_from_slice(replacement);
        rest = tail.get(needle.len()..).unwrap_or_default();
        count += 1;
    }

    out.extend_from_slice(rest);
    count
}

#[inline]
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }

    let first = needle[0];
    let last_start = haystack.len() - needle.len();
    let mut offset = 0;

    while offset <= last_start {
        let candidate = haystack[offset..=last_start]
            .iter()
            .position(|&b| b == first)?;
        let start = offset + candidate;
        if &haystack[start..start + needle.len()] == needle {
            return Some(start);
        }
        offset = start + 1;
    }

    None
}
