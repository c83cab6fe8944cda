use crate::constants::{ENCODED_NONCE_LENGTH, NONCE_PLACEHOLDER, NONCE_PREFIX, SUFFIX_QUOTE};
use crate::error::CspError;
use actix_web::http::header::HeaderValue;
use std::fmt;

/// A policy string that may carry `{nonce}` placeholders.
///
/// Whether the template needs a nonce is decided once, here, and never
/// recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CspTemplate {
    value: String,
    requires_nonce: bool,
}

impl CspTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        let raw = template.into();
        let requires_nonce = raw.contains(NONCE_PLACEHOLDER);
        let trimmed = raw.trim();

        let value = if trimmed.len() == raw.len() {
            raw
        } else {
            trimmed.to_owned()
        };

        Self {
            value,
            requires_nonce,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    #[inline]
    pub fn requires_nonce(&self) -> bool {
        self.requires_nonce
    }

    /// Substitutes every placeholder with `'nonce-<nonce>'`.
    pub fn render(&self, nonce: &str) -> String {
        if !self.requires_nonce {
            return self.value.clone();
        }

        let source = [NONCE_PREFIX, nonce, SUFFIX_QUOTE].concat();
        self.value.replace(NONCE_PLACEHOLDER, &source)
    }

    #[inline]
    pub fn header_value(&self) -> Result<HeaderValue, CspError> {
        Ok(HeaderValue::from_str(&self.value)?)
    }

    #[inline]
    pub fn render_header_value(&self, nonce: &str) -> Result<HeaderValue, CspError> {
        Ok(HeaderValue::from_str(&self.render(nonce))?)
    }

    /// Checks that every rendering of this template is a legal header value.
    pub fn validate(&self) -> Result<(), CspError> {
        if self.is_empty() {
            return Ok(());
        }

        let sample = "A".repeat(ENCODED_NONCE_LENGTH);
        self.render_header_value(&sample).map(drop).map_err(|err| {
            CspError::ConfigError(format!(
                "template is not a valid header value: {}",
                err
            ))
        })
    }
}

impl fmt::Display for CspTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for CspTemplate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CspTemplate {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
