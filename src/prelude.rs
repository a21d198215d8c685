//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use lumen_shell::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Application facade
pub use crate::application::{Application, ApplicationBuilder};
pub use crate::core::config::{ReadinessPolicy, ShellConfig};
pub use crate::core::error::ShellError;

// Assets
pub use crate::core::assets::{AssetHandle, AssetKind, AssetStore, Manifest};

// Input
pub use crate::core::input::{
    DispatchContext, EventKind, EventKinds, InputEvent, InputListener, KeyCode, Modifiers,
    MouseButton, QuitOnEscape, QuitSignal,
};

// Scene and widgets
pub use crate::core::frame_loop::FrameState;
pub use crate::core::render::{Rect, RenderSurface, Rgba};
pub use crate::core::scene::{Entity, EntityId, Scene};
pub use crate::core::widget::{Button, ImageView, Widget};
