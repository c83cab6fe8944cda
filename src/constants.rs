pub(crate) const HEADER_CSP: &str = "content-security-policy";
pub(crate) const HEADER_CSP_REPORT_ONLY: &str = "content-security-policy-report-only";

pub const NONCE_PLACEHOLDER: &str = "{nonce}";
pub(crate) const NONCE_PREFIX: &str = "'nonce-";
pub(crate) const SUFFIX_QUOTE: &str = "'";

pub(crate) const HTML_CONTENT_TYPE: &[u8] = b"text/html";

pub const NONCE_LENGTH: usize = 16;
// base64 without padding: ceil(16 * 4 / 3)
pub const ENCODED_NONCE_LENGTH: usize = 22;

pub(crate) const NONCE_BUFFER_POOL_SIZE: usize = 32;
pub(crate) const RECORDING_BUFFER_POOL_SIZE: usize = 16;
pub(crate) const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;
pub(crate) const MAX_POOLED_BUFFER_CAPACITY: usize = 1024 * 1024;
