pub mod config;
pub mod template;

pub use config::{parse_bool, CspConfig, CspConfigBuilder, CspSettings};
pub use template::CspTemplate;
