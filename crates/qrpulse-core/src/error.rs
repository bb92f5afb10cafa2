//! Error types for the façade and its collaborators.
//!
//! The format model itself never fails; only I/O, the pixel codec and
//! history lookups can.

use thiserror::Error;

/// Failures reported by a [`PixelCodec`](crate::effects::PixelCodec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The image held no recognizable barcode.
    #[error("no barcode pattern found in image")]
    NoPattern,
    #[error("render failed: {0}")]
    Render(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Encoding produced a blank payload; there is nothing to render.
    #[error("input required: payload is empty")]
    InputRequired,
    #[error("history record not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
