//=========================================================================
// Input System
//
// Platform-neutral input vocabulary and the listener capability.
//
// Responsibilities:
// - Define the events the frame loop dispatches (`event`)
// - Define who may receive them and how claims work (`listener`)
//
// Notes:
// Conversion from Winit types lives in the platform layer; nothing in
// this module depends on a windowing backend.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod listener;

//=== Public API ==========================================================

pub use event::{EventKind, EventKinds, InputEvent, KeyCode, Modifiers, MouseButton};
pub use listener::{Acknowledgement, DispatchContext, InputListener, QuitOnEscape, QuitSignal};
