use crate::core::config::{CspConfig, CspConfigBuilder};
use crate::core::template::CspTemplate;
use crate::error::CspError;
use crate::middleware::interceptor::{Interception, ResponseInterceptor};
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web::Data,
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::sync::Arc;

/// Injects the configured Content-Security-Policy into responses.
///
/// Whether responses are buffered is decided here, once, from the template.
#[derive(Clone)]
pub struct CspMiddleware {
    config: Arc<CspConfig>,
    interception: Arc<Interception>,
}

impl CspMiddleware {
    #[inline]
    pub fn new(config: CspConfig) -> Self {
        Self::from_shared(Arc::new(config))
    }

    pub fn from_shared(config: Arc<CspConfig>) -> Self {
        let interception = Arc::new(Interception::for_config(config.clone()));
        log::debug!(
            "CSP middleware ready (enabled: {}, buffering: {})",
            config.is_enabled(),
            interception.is_buffering()
        );

        Self {
            config,
            interception,
        }
    }

    #[inline]
    pub fn config(&self) -> Arc<CspConfig> {
        self.config.clone()
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CspMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspMiddlewareService {
            service,
            config: self.config.clone(),
            interception: self.interception.clone(),
        }))
    }
}

pub struct CspMiddlewareService<S> {
    service: S,
    config: Arc<CspConfig>,
    interception: Arc<Interception>,
}

impl<S, B> Service<ServiceRequest> for CspMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        self.config.stats().increment_request_count();

        let fut = self.service.call(req);
        let interception = self.interception.clone();

        Box::pin(async move {
            // downstream errors propagate untouched
            let res = fut.await?;
            interception.intercept(res).await
        })
    }
}

#[inline]
pub fn csp_middleware(template: impl Into<CspTemplate>) -> Result<CspMiddleware, CspError> {
    CspConfig::new(template).map(CspMiddleware::new)
}

#[inline]
pub fn csp_report_only_middleware(
    template: impl Into<CspTemplate>,
) -> Result<CspMiddleware, CspError> {
    CspConfigBuilder::new()
        .template(template)
        .report_only(true)
        .build()
        .map(CspMiddleware::new)
}

/// Shares the middleware's configuration (and its statistics) with handlers.
pub fn configure_csp(middleware: &CspMiddleware) -> impl FnOnce(&mut actix_web::web::ServiceConfig) {
    let config = middleware.config();
    move |cfg| {
        cfg.app_data(Data::from(config));
    }
}
