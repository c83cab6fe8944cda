use crate::constants::{ENCODED_NONCE_LENGTH, NONCE_PLACEHOLDER};
use crate::core::config::CspConfig;
use crate::error::CspError;
use crate::middleware::recorder::{is_html, record_body};
use crate::monitoring::stats::CspStats;
use crate::utils::replace_all_into;
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::ServiceResponse,
    http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH},
    Error,
};
use bytes::{Bytes, BytesMut};
use std::{future::Future, sync::Arc};

/// Decorates the response produced by the next stage.
///
/// The left body variant is the untouched inner body; the right variant is a
/// rewritten, fully buffered body.
pub trait ResponseInterceptor {
    fn intercept<B>(
        &self,
        res: ServiceResponse<B>,
    ) -> impl Future<Output = Result<ServiceResponse<EitherBody<B>>, Error>>
    where
        B: MessageBody + 'static;
}

/// Forwards responses unchanged. Used when the template is empty.
#[derive(Debug, Clone)]
pub struct PassThrough {
    stats: Arc<CspStats>,
}

impl PassThrough {
    #[inline]
    pub fn new(stats: Arc<CspStats>) -> Self {
        Self { stats }
    }
}

impl ResponseInterceptor for PassThrough {
    async fn intercept<B>(
        &self,
        res: ServiceResponse<B>,
    ) -> Result<ServiceResponse<EitherBody<B>>, Error>
    where
        B: MessageBody + 'static,
    {
        self.stats.increment_passthrough_count();
        Ok(res.map_into_left_body())
    }
}

/// Sets the literal template on HTML responses; the body streams through.
#[derive(Debug, Clone)]
pub struct HeaderInjector {
    name: HeaderName,
    value: HeaderValue,
    stats: Arc<CspStats>,
}

impl HeaderInjector {
    #[inline]
    pub fn new(name: HeaderName, value: HeaderValue, stats: Arc<CspStats>) -> Self {
        Self { name, value, stats }
    }

    /// Applies the header if the head describes an HTML response.
    pub fn decorate(&self, headers: &mut HeaderMap) -> bool {
        if !is_html(headers) {
            return false;
        }

        headers.insert(self.name.clone(), self.value.clone());
        true
    }
}

impl ResponseInterceptor for HeaderInjector {
    async fn intercept<B>(
        &self,
        mut res: ServiceResponse<B>,
    ) -> Result<ServiceResponse<EitherBody<B>>, Error>
    where
        B: MessageBody + 'static,
    {
        if self.decorate(res.headers_mut()) {
            self.stats.increment_header_injection_count();
        } else {
            self.stats.increment_skipped_count();
        }

        Ok(res.map_into_left_body())
    }
}

/// Records HTML bodies and substitutes one fresh nonce into header and body.
#[derive(Debug, Clone)]
pub struct BufferingRewriter {
    config: Arc<CspConfig>,
    name: HeaderName,
}

impl BufferingRewriter {
    #[inline]
    pub fn new(config: Arc<CspConfig>) -> Self {
        let name = config.header_name();
        Self { config, name }
    }

    /// Generates a nonce, sets the rendered header and returns the rewritten
    /// body. Nothing is written to `headers` if nonce generation fails.
    pub fn rewrite(&self, headers: &mut HeaderMap, body: &[u8]) -> Result<Bytes, CspError> {
        let stats = self.config.stats();

        let nonce = self.config.nonce_generator().generate().map_err(|err| {
            stats.increment_entropy_failure_count();
            log::error!("unable to generate CSP nonce: {}", err);
            err
        })?;
        stats.increment_nonce_generation_count();

        let value = self.config.template().render_header_value(nonce.as_str())?;
        headers.insert(self.name.clone(), value);

        let mut out = BytesMut::with_capacity(body.len() + ENCODED_NONCE_LENGTH);
        let replaced = replace_all_into(
            &mut out,
            body,
            NONCE_PLACEHOLDER.as_bytes(),
            nonce.as_bytes(),
        );
        stats.add_placeholder_replacements(replaced);

        Ok(out.freeze())
    }
}

impl ResponseInterceptor for BufferingRewriter {
    async fn intercept<B>(
        &self,
        res: ServiceResponse<B>,
    ) -> Result<ServiceResponse<EitherBody<B>>, Error>
    where
        B: MessageBody + 'static,
    {
        let stats = self.config.stats();

        if !is_html(res.headers()) {
            stats.increment_skipped_count();
            return Ok(res.map_into_left_body());
        }

        let (req, res) = res.into_parts();
        let (mut head, body) = res.into_parts();

        let mut recording = self.config.buffer_pool().get();
        let recorded = record_body(body, &mut recording).await.map_err(|err| {
            log::error!("failed to record response body for {}: {}", req.path(), err);
            err
        })?;
        stats.add_buffered_bytes(recorded);

        let rewritten = self.rewrite(head.headers_mut(), &recording)?;
        drop(recording);

        head.headers_mut().remove(CONTENT_LENGTH);
        stats.increment_buffered_rewrite_count();
        log::debug!(
            "rewrote {} byte HTML body for {} with fresh nonce",
            recorded,
            req.path()
        );

        let res = head
            .set_body(rewritten)
            .map_into_boxed_body()
            .map_into_right_body();

        Ok(ServiceResponse::new(req, res))
    }
}

/// The interception strategy chosen once per configured instance.
#[derive(Debug, Clone)]
pub enum Interception {
    PassThrough(PassThrough),
    Stream(HeaderInjector),
    Buffer(BufferingRewriter),
}

impl Interception {
    pub fn for_config(config: Arc<CspConfig>) -> Self {
        let stats = config.stats().clone();

        if !config.is_enabled() {
            return Self::PassThrough(PassThrough::new(stats));
        }

        match config.static_header_value() {
            Some(value) => Self::Stream(HeaderInjector::new(
                config.header_name(),
                value.clone(),
                stats,
            )),
            None => Self::Buffer(BufferingRewriter::new(config)),
        }
    }

    #[inline]
    pub fn is_buffering(&self) -> bool {
        matches!(self, Self::Buffer(_))
    }
}

impl ResponseInterceptor for Interception {
    async fn intercept<B>(
        &self,
        res: ServiceResponse<B>,
    ) -> Result<ServiceResponse<EitherBody<B>>, Error>
    where
        B: MessageBody + 'static,
    {
        match self {
            Self::PassThrough(inner) => inner.intercept(res).await,
            Self::Stream(inner) => inner.intercept(res).await,
            Self::Buffer(inner) => inner.intercept(res).await,
        }
    }
}
