use crate::constants::HTML_CONTENT_TYPE;
use crate::error::CspError;
use actix_web::{
    body::{BodySize, MessageBody},
    http::header::{HeaderMap, CONTENT_TYPE},
};
use bytes::BytesMut;
use futures::future::poll_fn;
use std::pin::pin;

/// Buffering predicate, evaluated once the response head is final.
#[inline]
pub fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .map_or(false, |value| value.as_bytes().starts_with(HTML_CONTENT_TYPE))
}

/// Drains `body` into `buf`, returning the number of bytes recorded.
pub async fn record_body<B>(body: B, buf: &mut BytesMut) -> Result<usize, CspError>
where
    B: MessageBody,
{
    let body = match body.try_into_bytes() {
        Ok(bytes) => {
            buf.extend_from_slice(&bytes);
            return Ok(bytes.len());
        }
        Err(body) => body,
    };

    if let BodySize::Sized(len) = body.size() {
        buf.reserve(usize::try_from(len).unwrap_or_default());
    }

    let mut body = pin!(body);
    let mut recorded = 0;

    while let Some(chunk) = poll_fn(|cx| body.as_mut().poll_next(cx)).await {
        let chunk = chunk.map_err(|err| {
            let err: Box<dyn std::error::Error> = err.into();
            CspError::BodyError(err.to_string())
        })?;
        recorded += chunk.len();
        buf.extend_from_slice(&chunk);
    }

    Ok(recorded)
}
