use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CspError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Unable to read from secure random source: {0}")]
    EntropyError(#[from] getrandom::Error),

    #[error("Nonce encoding error: {0}")]
    EncodingError(#[from] base64::EncodeSliceError),

    #[error("Header processing error: {0}")]
    HeaderError(String),

    #[error("Response body error: {0}")]
    BodyError(String),
}

impl ResponseError for CspError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ConfigError(_)
            | Self::EntropyError(_)
            | Self::EncodingError(_)
            | Self::HeaderError(_)
            | Self::BodyError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<actix_web::http::header::InvalidHeaderValue> for CspError {
    fn from(err: actix_web::http::header::InvalidHeaderValue) -> Self {
        Self::HeaderError(err.to_string())
    }
}
