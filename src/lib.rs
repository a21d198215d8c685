//=========================================================================
// Lumen Shell Library Root
//
// A minimal interactive application shell: a window whose scene becomes
// interactive once every required asset has been fetched.
//
// Responsibilities:
// - Expose the application facade (`Application`, `ApplicationBuilder`)
// - Keep the windowing backend (`platform`) hidden from end users
// - Re-export the asset, input, scene and widget building blocks
//
// Typical usage:
// ```no_run
// use lumen_shell::prelude::*;
//
// fn main() -> Result<(), ShellError> {
//     ApplicationBuilder::new()
//         .with_entity(QuitOnEscape)
//         .build()?
//         .run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds everything that runs on the frame thread: assets, input
// dispatch, scene, widgets and the render contract.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the winit integration and must stay on the main
// thread; it is not part of the public API surface.
//
mod application;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use application::{Application, ApplicationBuilder};
