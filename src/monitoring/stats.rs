use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct CspStats {
    request_count: AtomicUsize,
    passthrough_count: AtomicUsize,
    header_injection_count: AtomicUsize,
    buffered_rewrite_count: AtomicUsize,
    skipped_count: AtomicUsize,
    nonce_generation_count: AtomicUsize,
    entropy_failure_count: AtomicUsize,
    placeholder_replacement_count: AtomicUsize,
    buffered_bytes: AtomicUsize,
}

impl CspStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Requests forwarded without any decoration because the template is empty.
    #[inline]
    pub fn passthrough_count(&self) -> usize {
        self.passthrough_count.load(Ordering::Relaxed)
    }

    /// Responses that received the literal template on the streaming path.
    #[inline]
    pub fn header_injection_count(&self) -> usize {
        self.header_injection_count.load(Ordering::Relaxed)
    }

    /// Responses recorded and rewritten with a fresh nonce.
    #[inline]
    pub fn buffered_rewrite_count(&self) -> usize {
        self.buffered_rewrite_count.load(Ordering::Relaxed)
    }

    /// Responses left untouched because they were not HTML.
    #[inline]
    pub fn skipped_count(&self) -> usize {
        self.skipped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn nonce_generation_count(&self) -> usize {
        self.nonce_generation_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn entropy_failure_count(&self) -> usize {
        self.entropy_failure_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn placeholder_replacement_count(&self) -> usize {
        self.placeholder_replacement_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn buffered_bytes(&self) -> usize {
        self.buffered_bytes.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_passthrough_count(&self) {
        self.passthrough_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_header_injection_count(&self) {
        self.header_injection_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_buffered_rewrite_count(&self) {
        self.buffered_rewrite_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_skipped_count(&self) {
        self.skipped_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_nonce_generation_count(&self) {
        self.nonce_generation_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_entropy_failure_count(&self) {
        self.entropy_failure_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_placeholder_replacements(&self, count: usize) {
        self.placeholder_replacement_count
            .fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_buffered_bytes(&self, len: usize) {
        self.buffered_bytes.fetch_add(len, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.request_count.store(0, Ordering::Relaxed);
        self.passthrough_count.store(0, Ordering::Relaxed);
        self.header_injection_count.store(0, Ordering::Relaxed);
        self.buffered_rewrite_count.store(0, Ordering::Relaxed);
        self.skipped_count.store(0, Ordering::Relaxed);
        self.nonce_generation_count.store(0, Ordering::Relaxed);
        self.entropy_failure_count.store(0, Ordering::Relaxed);
        self.placeholder_replacement_count.store(0, Ordering::Relaxed);
        self.buffered_bytes.store(0, Ordering::Relaxed);
    }
}

impl fmt::Display for CspStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSP Middleware Statistics:")?;
        writeln!(f, "  Requests processed: {}", self.request_count())?;
        writeln!(f, "  Passed through: {}", self.passthrough_count())?;
        writeln!(f, "  Headers injected: {}", self.header_injection_count())?;
        writeln!(f, "  Bodies rewritten: {}", self.buffered_rewrite_count())?;
        writeln!(f, "  Non-HTML skipped: {}", self.skipped_count())?;
        writeln!(f, "  Nonces generated: {}", self.nonce_generation_count())?;
        writeln!(f, "  Entropy failures: {}", self.entropy_failure_count())?;
        writeln!(
            f,
            "  Placeholders replaced: {}",
            self.placeholder_replacement_count()
        )?;
        writeln!(f, "  Bytes buffered: {}", self.buffered_bytes())?;
        Ok(())
    }
}
