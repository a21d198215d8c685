//=========================================================================
// Button
//=========================================================================
//
// Bordered, labelled, clickable rectangle. Both a widget and a listener.
//
// Layers (bottom to top):
//   border fill (full rect) → face fill (rect inset by border) → label
//
// Clicks use strict-interior containment: a press exactly on an edge
// is not claimed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::Widget;
use crate::core::assets::AssetStore;
use crate::core::input::{DispatchContext, EventKind, EventKinds, InputEvent, InputListener, MouseButton};
use crate::core::render::{Rect, RenderSurface, Rgba};
use crate::core::scene::Entity;

//=== Button ==============================================================

#[derive(Debug, Clone)]
pub struct Button {
    rect: Rect,
    border: u32,
    label: String,
    font_key: String,
    border_color: Rgba,
    face_color: Rgba,
    text_color: Rgba,
}

impl Button {
    pub const BORDER_COLOR: Rgba = Rgba::from_u32(0x000000ff);
    pub const FACE_COLOR: Rgba = Rgba::from_u32(0x777777ff);
    pub const TEXT_COLOR: Rgba = Rgba::BLACK;

    //--- Construction -----------------------------------------------------

    /// Borderless button whose label is drawn with the font stored under
    /// `font_key`.
    pub fn new(rect: Rect, label: impl Into<String>, font_key: impl Into<String>) -> Self {
        Self {
            rect,
            border: 0,
            label: label.into(),
            font_key: font_key.into(),
            border_color: Self::BORDER_COLOR,
            face_color: Self::FACE_COLOR,
            text_color: Self::TEXT_COLOR,
        }
    }

    pub fn with_border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    pub fn with_colors(mut self, border: Rgba, face: Rgba, text: Rgba) -> Self {
        self.border_color = border;
        self.face_color = face;
        self.text_color = text;
        self
    }

    //--- Accessors --------------------------------------------------------

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn font_key(&self) -> &str {
        &self.font_key
    }

    pub fn border(&self) -> u32 {
        self.border
    }
}

//=== Widget ==============================================================

impl Widget for Button {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn render(&self, surface: &mut dyn RenderSurface, assets: &AssetStore) {
        surface.fill_rect(self.rect, self.border_color);
        if let Some(face) = self.rect.inset(self.border) {
            surface.fill_rect(face, self.face_color);
        }

        match assets.font(&self.font_key) {
            Some(font) => surface.draw_text(self.rect, &self.label, &font, self.text_color),
            None => debug!(
                target: "scene",
                "Font '{}' absent, label '{}' skipped",
                self.font_key,
                self.label
            ),
        }
    }
}

//=== InputListener =======================================================

impl InputListener for Button {
    fn accepted_kinds(&self) -> EventKinds {
        EventKinds::only(EventKind::PointerDown)
    }

    fn consume(&mut self, event: &InputEvent, ctx: &mut DispatchContext) -> bool {
        match *event {
            InputEvent::PointerDown {
                x,
                y,
                button: MouseButton::Left,
                ..
            } if self.rect.contains_strict(x, y) => {
                info!(target: "scene", "Button '{}' clicked at ({}, {})", self.label, x, y);
                ctx.acknowledge(format!("{} clicked", self.label));
                true
            }
            _ => false,
        }
    }
}

//=== Entity ==============================================================

impl Entity for Button {
    fn listener(&mut self) -> Option<&mut dyn InputListener> {
        Some(self)
    }

    fn widget(&self) -> Option<&dyn Widget> {
        Some(self)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
