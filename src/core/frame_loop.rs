//=========================================================================
// Frame Loop
//=========================================================================
//
// Per-tick driver gating the scene on asset readiness.
//
// State machine:
// ```text
//   Loading ──is_ready()──> Running   (terminal, never reverts)
//      │                       │
//      └─ pump loader only     └─ poll → dispatch → render_all
// ```
//
// The transition falls through: the tick that observes readiness also
// runs the Running behaviour. A tick never blocks; stopping further
// ticks is up to the external driver.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use crate::core::assets::{AssetLoader, AssetStore};
use crate::core::error::RenderError;
use crate::core::input::{DispatchContext, InputEvent};
use crate::core::render::{RenderSurface, Rgba};
use crate::core::scene::Scene;

//=== InputSource =========================================================

/// Non-blocking supplier of input events.
pub trait InputSource {
    /// Returns every event pending since the previous call, possibly none.
    fn poll(&mut self) -> Vec<InputEvent>;
}

//=== FrameState ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    /// Waiting on the asset gate; no polling, no rendering.
    #[default]
    Loading,

    /// Interactive.
    Running,
}

//=== Frame ===============================================================

/// Everything one tick reads or writes, borrowed from the owner.
pub struct Frame<'a> {
    pub assets: &'a AssetStore,

    /// Drained once per Loading tick, if present.
    pub loader: Option<&'a mut AssetLoader>,

    pub input: &'a mut dyn InputSource,
    pub scene: &'a mut Scene,
    pub surface: &'a mut dyn RenderSurface,
    pub dispatch: &'a mut DispatchContext,
    pub background: Rgba,
}

//=== FrameLoop ===========================================================

#[derive(Debug, Default)]
pub struct FrameLoop {
    state: FrameState,
    ticks: u64,
    loading_ticks: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Total ticks executed.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks spent gated in Loading.
    pub fn loading_ticks(&self) -> u64 {
        self.loading_ticks
    }

    //--- Tick -------------------------------------------------------------

    /// Runs one tick and returns the state it ended in.
    ///
    /// # Errors
    ///
    /// A [`RenderError`] from the render pass. The caller is expected to
    /// treat it as fatal.
    pub fn tick(&mut self, mut frame: Frame<'_>) -> Result<FrameState, RenderError> {
        self.ticks += 1;

        if self.state == FrameState::Loading {
            if let Some(loader) = frame.loader {
                let applied = loader.pump(frame.assets);
                if applied > 0 {
                    debug!(
                        target: "frame_loop",
                        "Applied {} outcomes ({}/{} resolved)",
                        applied,
                        frame.assets.completed(),
                        frame.assets.required()
                    );
                }
            }

            if !frame.assets.is_ready() {
                self.loading_ticks += 1;
                return Ok(FrameState::Loading);
            }

            info!(
                target: "frame_loop",
                "Assets ready after {} ticks ({} failed), running",
                self.loading_ticks,
                frame.assets.failed()
            );
            self.state = FrameState::Running;
        }

        let events = frame.input.poll();
        if !events.is_empty() {
            let claimed = frame.scene.dispatch_events(&events, frame.dispatch);
            trace!(target: "frame_loop", "{} events, {} claimed", events.len(), claimed);
        }

        frame
            .scene
            .render_all(frame.surface, frame.assets, frame.background)?;
        Ok(self.state)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
