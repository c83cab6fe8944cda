pub mod constants;
pub mod core;
pub mod error;
pub mod middleware;
pub mod monitoring;
pub mod prelude;
pub mod security;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::constants::{ENCODED_NONCE_LENGTH, NONCE_LENGTH, NONCE_PLACEHOLDER};
pub use crate::core::{CspConfig, CspConfigBuilder, CspSettings, CspTemplate};
pub use crate::error::CspError;
pub use crate::middleware::{
    configure_csp, csp_middleware, csp_report_only_middleware, CspMiddleware, Interception,
    ResponseInterceptor,
};
pub use crate::monitoring::CspStats;
pub use crate::security::{EntropySource, Nonce, NonceGenerator, OsEntropy};
pub use crate::utils::{BufferPool, BytePool};
