pub mod csp;
pub mod interceptor;
pub mod recorder;

pub use csp::{CspMiddleware, CspMiddlewareService};
pub use interceptor::{
    BufferingRewriter, HeaderInjector, Interception, PassThrough, ResponseInterceptor,
};
pub use recorder::{is_html, record_body};

pub use csp::{configure_csp, csp_middleware, csp_report_only_middleware};
