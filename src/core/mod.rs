//=========================================================================
// Core Systems
//
// Everything that runs on the frame thread, independent of the windowing
// backend.
//
// Modules:
// - `assets`: manifest, concurrent loader and the shared asset store
// - `input`: shell input events and the listener contract
// - `scene`: entity arena with its listener chain and widget list
// - `widget`: drawable scene elements (button, image view)
// - `render`: drawing surface contract and the tiny-skia backend
// - `frame_loop`: Loading → Running state machine driven once per tick
// - `platform_bridge`: channel contract between platform and frame thread
//
//=========================================================================

pub mod assets;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod input;
pub(crate) mod platform_bridge;
pub mod render;
pub mod scene;
pub mod widget;

#[cfg(test)]
pub(crate) mod testing;
