pub use crate::core::{CspConfig, CspConfigBuilder, CspSettings, CspTemplate};
pub use crate::middleware::{
    configure_csp, csp_middleware, csp_report_only_middleware, CspMiddleware,
};
pub use crate::monitoring::CspStats;
pub use crate::security::{EntropySource, NonceGenerator, OsEntropy};
