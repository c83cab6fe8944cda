use crate::constants::{ENCODED_NONCE_LENGTH, NONCE_LENGTH};
use crate::error::CspError;
use crate::security::entropy::{EntropySource, OsEntropy};
use crate::utils::{BytePool, PooledBytes};
use base64::{engine::general_purpose::STANDARD_NO_PAD as BASE64, Engine};
use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

/// Produces per-response nonces from pooled buffers.
///
/// Both the raw entropy buffer and the encoded text buffer are checked out of
/// fixed-size pools and released when their guards drop, including on the
/// error path.
pub struct NonceGenerator {
    entropy: Arc<dyn EntropySource>,
    raw_pool: BytePool,
    encoded_pool: BytePool,
    generated: AtomicUsize,
    failures: AtomicUsize,
}

impl NonceGenerator {
    #[inline]
    pub fn new() -> Self {
        Self::with_entropy(Arc::new(OsEntropy))
    }

    #[inline]
    pub fn with_entropy(entropy: Arc<dyn EntropySource>) -> Self {
        Self {
            entropy,
            raw_pool: BytePool::new(NONCE_LENGTH),
            encoded_pool: BytePool::new(ENCODED_NONCE_LENGTH),
            generated: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn with_capacity(capacity: usize, entropy: Arc<dyn EntropySource>) -> Self {
        Self {
            entropy,
            raw_pool: BytePool::with_capacity(capacity, NONCE_LENGTH),
            encoded_pool: BytePool::with_capacity(capacity, ENCODED_NONCE_LENGTH),
            generated: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn generate(&self) -> Result<Nonce<'_>, CspError> {
        let mut raw = self.raw_pool.get();
        if let Err(err) = self.entropy.fill(&mut raw) {
            self.failures.fetch_add(1, Ordering::Relaxed);
            return Err(err);
        }

        let mut encoded = self.encoded_pool.get();
        let written = BASE64.encode_slice(&*raw, &mut *encoded)?;
        debug_assert_eq!(written, ENCODED_NONCE_LENGTH);

        self.generated.fetch_add(1, Ordering::Relaxed);
        Ok(Nonce { encoded })
    }

    #[inline]
    pub fn raw_pool(&self) -> &BytePool {
        &self.raw_pool
    }

    #[inline]
    pub fn encoded_pool(&self) -> &BytePool {
        &self.encoded_pool
    }

    #[inline]
    pub fn generated_count(&self) -> usize {
        self.generated.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NonceGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceGenerator")
            .field("raw_pool", &self.raw_pool)
            .field("encoded_pool", &self.encoded_pool)
            .field("generated", &self.generated_count())
            .field("failures", &self.failure_count())
            .finish_non_exhaustive()
    }
}

/// A freshly generated nonce, borrowed from the generator's text pool.
pub struct Nonce<'a> {
    encoded: PooledBytes<'a>,
}

impl Nonce<'_> {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // base64 output is ASCII
        std::str::from_utf8(&self.encoded).unwrap_or_default()
    }
}

impl fmt::Display for Nonce<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Nonce<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Nonce").field(&self.as_str()).finish()
    }
}
