//=========================================================================
// Test Support
//=========================================================================
//
// Fixtures shared by unit tests across the crate. Nothing here touches
// the network or a real window.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{ImageFormat, RgbaImage};
use parking_lot::Mutex;

//=== Internal Dependencies ===============================================

use crate::core::assets::{
    AssetHandle, AssetKind, Decoder, Fetcher, FontAsset, ImageAsset, Progress,
};
use crate::core::error::{AssetError, RenderError};
use crate::core::frame_loop::InputSource;
use crate::core::input::InputEvent;
use crate::core::render::{Rect, RenderSurface, Rgba};

//=== Payloads ============================================================

fn white_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]))
}

/// PNG-encoded opaque white image.
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    white_image(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("png encoding");
    bytes
}

/// Decoded opaque white image handle.
pub(crate) fn test_image(width: u32, height: u32) -> AssetHandle {
    AssetHandle::Image(ImageAsset::new(white_image(width, height)))
}

/// Assembles a TrueType file from `(tag, data)` tables sorted by tag.
fn sfnt(tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    let count = tables.len() as u16;
    let search_range = 16 * (1u16 << (15 - count.leading_zeros()));
    let entry_selector = 15 - count.leading_zeros() as u16;

    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&count.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&(count * 16 - search_range).to_be_bytes());

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in tables {
        out.extend_from_slice(*tag);
        out.extend_from_slice(&0u32.to_be_bytes()); // checksum
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());

        let padded = (data.len() + 3) & !3;
        body.extend_from_slice(data);
        body.resize(body.len() + padded - data.len(), 0);
        offset += padded;
    }
    out.extend_from_slice(&body);
    out
}

fn be(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

fn head_table() -> Vec<u8> {
    let mut head = Vec::new();
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // fontRevision
    head.extend_from_slice(&0u32.to_be_bytes()); // checkSumAdjustment
    head.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magic
    head.extend_from_slice(&0u16.to_be_bytes()); // flags
    head.extend_from_slice(&1000u16.to_be_bytes()); // unitsPerEm
    head.extend_from_slice(&[0u8; 16]); // created, modified
    head.extend_from_slice(&be(&[0, -400, 1000, 1000])); // bbox
    head.extend_from_slice(&0u16.to_be_bytes()); // macStyle
    head.extend_from_slice(&8u16.to_be_bytes()); // lowestRecPPEM
    head.extend_from_slice(&be(&[2, 0, 0])); // direction hint, short loca, glyph format
    head
}

fn hhea_table() -> Vec<u8> {
    let mut hhea = Vec::new();
    hhea.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    hhea.extend_from_slice(&be(&[800, -200, 0])); // ascender, descender, lineGap
    hhea.extend_from_slice(&[0u8; 24]);
    hhea.extend_from_slice(&1u16.to_be_bytes()); // numberOfHMetrics
    hhea
}

fn maxp_table() -> Vec<u8> {
    let mut maxp = 0x0000_5000u32.to_be_bytes().to_vec();
    maxp.extend_from_slice(&1u16.to_be_bytes()); // numGlyphs
    maxp
}

/// Smallest TrueType file the parser accepts: `head`, `hhea` and `maxp`
/// with a single empty glyph and no character map.
pub(crate) fn minimal_font_bytes() -> Vec<u8> {
    sfnt(&[
        (b"head", head_table()),
        (b"hhea", hhea_table()),
        (b"maxp", maxp_table()),
    ])
}

/// Font whose only glyph, used for every character, is a solid box
/// 600 units wide spanning -400..1000 vertically: taller than the
/// 800/-200 line box, so it always needs clipping.
pub(crate) fn box_font_bytes() -> Vec<u8> {
    let mut glyf = be(&[1, 100, -400, 700, 1000]); // contours + bbox
    glyf.extend_from_slice(&be(&[3, 0])); // endPtsOfContours, no instructions
    glyf.extend_from_slice(&[0x01; 4]); // on-curve, 16-bit deltas
    glyf.extend_from_slice(&be(&[100, 600, 0, -600])); // x
    glyf.extend_from_slice(&be(&[-400, 0, 1400, 0])); // y
    let loca = be(&[0, ((glyf.len() + 1) / 2) as i16]);

    sfnt(&[
        (b"glyf", glyf),
        (b"head", head_table()),
        (b"hhea", hhea_table()),
        (b"hmtx", be(&[800, 100])),
        (b"loca", loca),
        (b"maxp", maxp_table()),
    ])
}

/// Font handle built from [`minimal_font_bytes`]; renders nothing.
pub(crate) fn test_font() -> AssetHandle {
    AssetHandle::Font(
        FontAsset::from_bytes("Minimal.ttf", &minimal_font_bytes(), 16.0).expect("minimal font"),
    )
}

/// Font handle built from [`box_font_bytes`] at 16px.
pub(crate) fn box_font() -> AssetHandle {
    AssetHandle::Font(FontAsset::from_bytes("Box.ttf", &box_font_bytes(), 16.0).expect("box font"))
}

//=== StaticFetcher =======================================================

/// In-memory fetcher keyed by URL. Unknown URLs fail like a 404.
#[derive(Debug, Default)]
pub(crate) struct StaticFetcher {
    routes: HashMap<String, Result<Vec<u8>, u16>>,
    pub(crate) attempts: AtomicUsize,
}

impl StaticFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ok(mut self, url: &str, body: Vec<u8>) -> Self {
        self.routes.insert(url.to_string(), Ok(body));
        self
    }

    pub(crate) fn status(mut self, url: &str, code: u16) -> Self {
        self.routes.insert(url.to_string(), Err(code));
        self
    }
}

impl Fetcher for StaticFetcher {
    fn fetch(&self, url: &str, on_progress: &mut dyn FnMut(Progress)) -> Result<Vec<u8>, AssetError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        match self.routes.get(url) {
            Some(Ok(body)) => {
                on_progress(Progress {
                    received: body.len() as u64,
                    total: Some(body.len() as u64),
                });
                Ok(body.clone())
            }
            Some(Err(code)) => Err(AssetError::Network {
                url: url.to_string(),
                status: Some(*code),
                message: "scripted failure".to_string(),
            }),
            None => Err(AssetError::Network {
                url: url.to_string(),
                status: Some(404),
                message: "no route".to_string(),
            }),
        }
    }
}

//=== CountingDecoder =====================================================

/// Records every decode request and answers with a 1x1 image.
#[derive(Debug, Default)]
pub(crate) struct CountingDecoder {
    pub(crate) seen: Mutex<Vec<(String, AssetKind)>>,
}

impl Decoder for CountingDecoder {
    fn decode(&self, name: &str, kind: AssetKind, _bytes: &[u8]) -> Result<AssetHandle, AssetError> {
        self.seen.lock().push((name.to_string(), kind));
        Ok(test_image(1, 1))
    }
}

//=== RecordingSurface ====================================================

/// One primitive call observed by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawCommand {
    Clear(Rgba),
    FillRect(Rect, Rgba),
    Image(Rect, (u32, u32)),
    Text(Rect, String, Rgba),
    Present,
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Debug)]
pub(crate) struct RecordingSurface {
    size: (u32, u32),
    pub(crate) commands: Vec<DrawCommand>,
    pub(crate) fail_present: bool,
}

impl RecordingSurface {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            commands: Vec::new(),
            fail_present: false,
        }
    }

    pub(crate) fn presents(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Present))
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn draw_image(&mut self, rect: Rect, image: &ImageAsset) {
        self.commands
            .push(DrawCommand::Image(rect, (image.width(), image.height())));
    }

    fn draw_text(&mut self, rect: Rect, text: &str, _font: &FontAsset, color: Rgba) {
        self.commands
            .push(DrawCommand::Text(rect, text.to_string(), color));
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.commands.push(DrawCommand::Present);
        if self.fail_present {
            return Err(RenderError::Present("scripted failure".to_string()));
        }
        Ok(())
    }
}

//=== ScriptedInput =======================================================

/// Input source replaying one batch per poll, then nothing.
#[derive(Debug, Default)]
pub(crate) struct ScriptedInput {
    batches: VecDeque<Vec<InputEvent>>,
    pub(crate) polls: usize,
}

impl ScriptedInput {
    pub(crate) fn new(batches: Vec<Vec<InputEvent>>) -> Self {
        Self {
            batches: batches.into(),
            polls: 0,
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.polls += 1;
        self.batches.pop_front().unwrap_or_default()
    }
}
