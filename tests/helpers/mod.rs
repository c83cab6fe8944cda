#![allow(dead_code)]

use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{ServiceRequest, ServiceResponse},
    web, App, HttpResponse, Result,
};
use actix_web_csp_nonce::{CspError, CspMiddleware, EntropySource};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const NONCE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <style nonce="{nonce}">body { color: blue; }</style>
</head>
<body>
    <script nonce="{nonce}">console.log('protected');</script>
</body>
</html>"#;

pub async fn html_page() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body("<html></html>"))
}

pub async fn nonce_page() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().content_type("text/html").body(NONCE_PAGE))
}

pub async fn script_page() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/html")
        .body(r#"<script nonce="{nonce}"></script>"#))
}

pub async fn json_endpoint() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(r#"{"a":1}"#))
}

pub async fn uppercase_html() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("TEXT/HTML")
        .body(r#"<p>{nonce}</p>"#))
}

/// Test app wrapping the common routes with the given middleware.
pub fn create_test_app(
    middleware: CspMiddleware,
) -> App<
    impl actix_service::ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(middleware)
        .route("/", web::get().to(script_page))
        .route("/html", web::get().to(html_page))
        .route("/page", web::get().to(nonce_page))
        .route("/api", web::get().to(json_endpoint))
}

/// Pulls the value out of the first `'nonce-<value>'` source in a header.
pub fn extract_nonce(header: &str) -> &str {
    let start = header.find("'nonce-").expect("header carries no nonce source") + 7;
    let len = header[start..].find('\'').expect("unterminated nonce source");
    &header[start..start + len]
}

/// Always yields the same bytes.
pub struct FixedEntropy(pub [u8; 16]);

impl EntropySource for FixedEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CspError> {
        dest.copy_from_slice(&self.0[..dest.len()]);
        Ok(())
    }
}

/// Fails every read, counting attempts.
#[derive(Default)]
pub struct FailingEntropy {
    pub attempts: AtomicUsize,
}

impl EntropySource for FailingEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), CspError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(CspError::EntropyError(getrandom::Error::UNSUPPORTED))
    }
}
