use crate::constants::{HEADER_CSP, HEADER_CSP_REPORT_ONLY};
use crate::core::template::CspTemplate;
use crate::error::CspError;
use crate::monitoring::stats::CspStats;
use crate::security::entropy::EntropySource;
use crate::security::nonce::NonceGenerator;
use crate::utils::BufferPool;
use actix_web::http::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The two resolved configuration fields, as supplied by a configuration file
/// or by positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CspSettings {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template: String,
    #[serde(default)]
    pub report_only: bool,
}

impl CspSettings {
    pub fn new(template: impl Into<String>, report_only: bool) -> Self {
        Self {
            template: template.into(),
            report_only,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CspError> {
        serde_json::from_str(json)
            .map_err(|err| CspError::ConfigError(format!("invalid CSP settings: {}", err)))
    }

    /// Resolves `<template> [<report_only>]`.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, CspError> {
        match args {
            [template] => Ok(Self::new(template.as_ref(), false)),
            [template, report_only] => Ok(Self::new(
                template.as_ref(),
                parse_bool(report_only.as_ref())?,
            )),
            _ => Err(CspError::ConfigError(format!(
                "expected <template> [<report_only>], got {} argument(s)",
                args.len()
            ))),
        }
    }
}

/// Parses the boolean spellings accepted for the report-only flag.
pub fn parse_bool(token: &str) -> Result<bool, CspError> {
    match token {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(CspError::ConfigError(format!(
            "expected boolean true or false, got '{}'",
            other
        ))),
    }
}

#[derive(Clone)]
pub struct CspConfig {
    template: CspTemplate,
    report_only: bool,
    static_header_value: Option<HeaderValue>,
    nonce_generator: Arc<NonceGenerator>,
    buffer_pool: Arc<BufferPool>,
    stats: Arc<CspStats>,
}

impl CspConfig {
    #[inline]
    pub fn new(template: impl Into<CspTemplate>) -> Result<Self, CspError> {
        CspConfigBuilder::new().template(template).build()
    }

    pub fn from_settings(settings: CspSettings) -> Result<Self, CspError> {
        CspConfigBuilder::new()
            .template(settings.template)
            .report_only(settings.report_only)
            .build()
    }

    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, CspError> {
        Self::from_settings(CspSettings::from_args(args)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CspError> {
        Self::from_settings(CspSettings::from_json(json)?)
    }

    #[inline]
    pub fn template(&self) -> &CspTemplate {
        &self.template
    }

    #[inline]
    pub fn is_report_only(&self) -> bool {
        self.report_only
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.template.is_empty()
    }

    #[inline]
    pub fn requires_buffering(&self) -> bool {
        self.template.requires_nonce()
    }

    #[inline]
    pub fn header_name(&self) -> HeaderName {
        if self.report_only {
            HeaderName::from_static(HEADER_CSP_REPORT_ONLY)
        } else {
            HeaderName::from_static(HEADER_CSP)
        }
    }

    /// The precomputed header value for templates without placeholders.
    #[inline]
    pub fn static_header_value(&self) -> Option<&HeaderValue> {
        self.static_header_value.as_ref()
    }

    #[inline]
    pub fn nonce_generator(&self) -> &Arc<NonceGenerator> {
        &self.nonce_generator
    }

    #[inline]
    pub fn buffer_pool(&self) -> &Arc<BufferPool> {
        &self.buffer_pool
    }

    #[inline]
    pub fn stats(&self) -> &Arc<CspStats> {
        &self.stats
    }
}

impl std::fmt::Debug for CspConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CspConfig")
            .field("template", &self.template.as_str())
            .field("report_only", &self.report_only)
            .field("requires_buffering", &self.requires_buffering())
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct CspConfigBuilder {
    template: Option<CspTemplate>,
    report_only: bool,
    nonce_generator: Option<Arc<NonceGenerator>>,
    entropy: Option<Arc<dyn EntropySource>>,
    buffer_pool: Option<Arc<BufferPool>>,
    stats: Option<Arc<CspStats>>,
}

impl CspConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn template(mut self, template: impl Into<CspTemplate>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[inline]
    pub fn report_only(mut self, report_only: bool) -> Self {
        self.report_only = report_only;
        self
    }

    #[inline]
    pub fn with_prebuilt_nonce_generator(mut self, generator: Arc<NonceGenerator>) -> Self {
        self.nonce_generator = Some(generator);
        self
    }

    /// Ignored when a prebuilt generator is supplied.
    #[inline]
    pub fn with_entropy_source(mut self, entropy: Arc<dyn EntropySource>) -> Self {
        self.entropy = Some(entropy);
        self
    }

    #[inline]
    pub fn with_buffer_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.buffer_pool = Some(pool);
        self
    }

    #[inline]
    pub fn with_stats(mut self, stats: Arc<CspStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(self) -> Result<CspConfig, CspError> {
        let template = self.template.unwrap_or_default();
        template.validate()?;

        if template.is_empty() {
            log::warn!("CSP template is empty, responses will pass through unmodified");
        } else if self.report_only {
            log::info!("CSP configured in report-only mode");
        }

        let static_header_value = if template.is_empty() || template.requires_nonce() {
            None
        } else {
            Some(template.header_value()?)
        };

        let nonce_generator = match (self.nonce_generator, self.entropy) {
            (Some(generator), _) => generator,
            (None, Some(entropy)) => Arc::new(NonceGenerator::with_entropy(entropy)),
            (None, None) => Arc::new(NonceGenerator::new()),
        };

        Ok(CspConfig {
            template,
            report_only: self.report_only,
            static_header_value,
            nonce_generator,
            buffer_pool: self.buffer_pool.unwrap_or_default(),
            stats: self.stats.unwrap_or_default(),
        })
    }
}
