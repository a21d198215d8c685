//=========================================================================
// Widgets
//=========================================================================
//
// Renderable capability and the stock widgets.
//
// Widgets read assets at render time and never cache handles, so an
// asset that shows up between frames is picked up on the next one.
// Rendering never mutates logical state.
//
//=========================================================================

//=== Module Declarations =================================================

mod button;
mod image_view;

//=== Public API ==========================================================

pub use button::Button;
pub use image_view::ImageView;

//=== Internal Dependencies ===============================================

use crate::core::assets::AssetStore;
use crate::core::render::{Rect, RenderSurface};

//=== Widget ==============================================================

/// Capability to draw onto a [`RenderSurface`].
///
/// Missing assets must be tolerated by skipping the dependent draw call.
pub trait Widget {
    /// Screen area the widget occupies.
    fn rect(&self) -> Rect;

    fn render(&self, surface: &mut dyn RenderSurface, assets: &AssetStore);
}
