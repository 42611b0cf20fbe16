//! Error types for the image generation node.

/// Errors that can occur while generating an image.
///
/// Every error is terminal for the call: nothing is retried internally, and
/// no partial output is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum ImgenError {
    /// API key missing or too short to be valid.
    #[error("invalid API key: must be at least 10 characters")]
    InvalidCredentials,

    /// Request parameters outside the accepted range.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Tensor data does not match the claimed shape.
    #[error("invalid image tensor: {0}")]
    Tensor(String),

    /// A reference image could not be converted to PNG.
    #[error("failed to encode reference image {index}: {reason}")]
    ImageEncoding {
        /// 1-based position of the failing reference image.
        index: usize,
        /// Underlying codec failure.
        reason: String,
    },

    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned a non-200 status.
    #[error("API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// Response body was not valid JSON.
    #[error("failed to parse API response: {0}")]
    ResponseParse(#[from] serde_json::Error),

    /// Response carried no candidates and no usable content.
    #[error("API returned an empty response with no candidates")]
    EmptyResponse,

    /// Inline image data was not valid base64.
    #[error("failed to decode base64 image data: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Inline image bytes could not be decoded as an image.
    #[error("failed to decode image data: {0}")]
    ImageDecode(String),

    /// API answered with text commentary but produced no image.
    #[error("API returned text but no image: {0}")]
    TextOnly(String),
}

/// Result type alias for node operations.
pub type Result<T> = std::result::Result<T, ImgenError>;
