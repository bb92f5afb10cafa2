//! Collaborators — the pixel codec and the history store.
//!
//! The façade talks to both through traits so hosts can plug in a real
//! barcode renderer/decoder and whatever storage they have.

use crate::error::CodecError;
use crate::models::{ImageFormat, RenderOptions, RenderedImage};

/// Trait for barcode pixel codecs.
///
/// `render` turns a payload into an image; `decode` recovers a payload from
/// image bytes. All methods take `&self`; implementations manage their own
/// concurrency.
pub trait PixelCodec: Send + Sync {
    fn render(&self, payload: &str, options: &RenderOptions) -> Result<RenderedImage, CodecError>;
    fn decode(&self, image: &[u8]) -> Result<String, CodecError>;
}

/// No-op codec for headless use.
///
/// Renders an empty PNG handle and never finds a barcode. Use when you only
/// need the format model and history without pixels.
#[derive(Debug, Default)]
pub struct NoopCodec;

impl PixelCodec for NoopCodec {
    fn render(&self, _: &str, _: &RenderOptions) -> Result<RenderedImage, CodecError> {
        Ok(RenderedImage::new(ImageFormat::Png, Vec::new()))
    }

    fn decode(&self, _: &[u8]) -> Result<String, CodecError> {
        Err(CodecError::NoPattern)
    }
}

pub mod history;

pub use history::{FileHistory, HistoryStore, MemoryHistory, HISTORY_CAPACITY};
