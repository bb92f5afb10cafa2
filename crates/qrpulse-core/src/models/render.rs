//! Rendering options and image handles exchanged with the pixel codec.
//!
//! The format model never reads these; they ride alongside a payload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Reed-Solomon error-correction level of the rendered symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

/// Presentation inputs to the pixel codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Edge length of the output image in pixels.
    pub size: u32,
    pub foreground: String,
    pub background: String,
    /// Quiet zone, in modules.
    pub margin: u32,
    pub error_correction_level: ErrorCorrection,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 300,
            foreground: "#000000".into(),
            background: "#ffffff".into(),
            margin: 1,
            error_correction_level: ErrorCorrection::M,
        }
    }
}

/// Download/export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Svg => "image/svg+xml",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

pub const DEFAULT_DOWNLOAD_NAME: &str = "qr-code";

/// `qr-code.png` style filename for a download. Blank names use the default.
pub fn download_filename(name: &str, format: ImageFormat) -> String {
    let name = name.trim();
    let name = if name.is_empty() { DEFAULT_DOWNLOAD_NAME } else { name };
    format!("{}.{}", name, format.extension())
}

/// Encoded image bytes produced by a pixel codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl RenderedImage {
    pub fn new(format: ImageFormat, bytes: Vec<u8>) -> Self {
        Self {
            mime: format.mime().to_string(),
            bytes,
        }
    }

    /// `data:<mime>;base64,<payload>`, what the history stores and the UI displays.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_generator() {
        let o = RenderOptions::default();
        assert_eq!(o.size, 300);
        assert_eq!(o.foreground, "#000000");
        assert_eq!(o.background, "#ffffff");
        assert_eq!(o.margin, 1);
        assert_eq!(o.error_correction_level, ErrorCorrection::M);
    }

    #[test]
    fn options_deserialize_partial_camel_case() {
        let o: RenderOptions =
            serde_json::from_str(r##"{"foreground":"#8b5cf6","errorCorrectionLevel":"H"}"##)
                .unwrap();
        assert_eq!(o.foreground, "#8b5cf6");
        assert_eq!(o.error_correction_level, ErrorCorrection::H);
        assert_eq!(o.size, 300);
    }

    #[test]
    fn data_url_is_base64() {
        let img = RenderedImage::new(ImageFormat::Png, b"hi".to_vec());
        assert_eq!(img.data_url(), "data:image/png;base64,aGk=");
    }

    #[test]
    fn download_filename_defaults() {
        assert_eq!(download_filename("", ImageFormat::Png), "qr-code.png");
        assert_eq!(download_filename("wifi", ImageFormat::Svg), "wifi.svg");
    }
}
