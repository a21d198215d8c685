//=========================================================================
// Asset Handles & Decoding
//=========================================================================
//
// Decoded, immutable resources produced by the loader and owned by the
// store for the lifetime of the process.
//
// Architecture:
//   raw payload → Decoder::decode(kind) → AssetHandle::{Font, Image}
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use fontdue::{Font, FontSettings};
use image::RgbaImage;

//=== Internal Dependencies ===============================================

use super::AssetKind;
use crate::core::error::AssetError;

//=== FontAsset ===========================================================

/// A font opened at a fixed default pixel size.
pub struct FontAsset {
    font: Font,
    px: f32,
}

impl FontAsset {
    /// Parses `bytes` as a TrueType/OpenType font stored under `name`.
    ///
    /// # Errors
    ///
    /// [`AssetError::Decode`] if the payload is not a usable font.
    pub fn from_bytes(name: &str, bytes: &[u8], px: f32) -> Result<Self, AssetError> {
        let settings = FontSettings {
            scale: px,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings).map_err(|e| AssetError::Decode {
            name: name.to_string(),
            kind: AssetKind::Font,
            message: e.to_string(),
        })?;
        Ok(Self { font, px })
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Size the font was opened at.
    pub fn px(&self) -> f32 {
        self.px
    }
}

impl fmt::Debug for FontAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontAsset")
            .field("px", &self.px)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

//=== ImageAsset ==========================================================

/// A decoded RGBA8 image (straight alpha).
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pixels: RgbaImage,
}

impl ImageAsset {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

//=== AssetHandle =========================================================

/// Opaque decoded resource, tagged by kind.
#[derive(Debug)]
pub enum AssetHandle {
    Font(FontAsset),
    Image(ImageAsset),
}

impl AssetHandle {
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Font(_) => AssetKind::Font,
            Self::Image(_) => AssetKind::Image,
        }
    }

    pub fn as_font(&self) -> Option<&FontAsset> {
        match self {
            Self::Font(font) => Some(font),
            Self::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageAsset> {
        match self {
            Self::Image(image) => Some(image),
            Self::Font(_) => None,
        }
    }
}

//=== Decoder =============================================================

/// Turns a fetched payload into a handle of the declared kind.
///
/// Runs on loader worker threads.
pub trait Decoder: Send + Sync {
    fn decode(&self, name: &str, kind: AssetKind, bytes: &[u8]) -> Result<AssetHandle, AssetError>;
}

/// `fontdue` for fonts, the `image` crate for images.
#[derive(Debug, Clone, Copy)]
pub struct StandardDecoder {
    font_px: f32,
}

impl StandardDecoder {
    pub fn new(font_px: f32) -> Self {
        Self { font_px }
    }
}

impl Decoder for StandardDecoder {
    fn decode(&self, name: &str, kind: AssetKind, bytes: &[u8]) -> Result<AssetHandle, AssetError> {
        match kind {
            AssetKind::Font => FontAsset::from_bytes(name, bytes, self.font_px).map(AssetHandle::Font),
            AssetKind::Image => image::load_from_memory(bytes)
                .map(|decoded| AssetHandle::Image(ImageAsset::new(decoded.to_rgba8())))
                .map_err(|e| AssetError::Decode {
                    name: name.to_string(),
                    kind,
                    message: e.to_string(),
                }),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
