//=========================================================================
// Frame Slot
//=========================================================================
//
// Hand-off of the most recently presented frame from the frame thread
// to the platform thread, which shows it in the window.
//
// Architecture:
//   PixmapSurface::present → publish() ──(latest wins)──> read_newer() → window
//
// Only the newest frame matters: a frame the window never picked up is
// overwritten, not queued.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use parking_lot::Mutex;

//=== PresentedFrame ======================================================

/// One finished frame, RGBA8 premultiplied, row-major without padding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PresentedFrame {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixels: Vec<u8>,
}

//=== FrameSlot ===========================================================

#[derive(Debug, Default)]
struct SlotState {
    frame: PresentedFrame,
    generation: u64,
}

/// Shared single-frame mailbox. Generation 0 means nothing was published.
#[derive(Debug, Clone, Default)]
pub(crate) struct FrameSlot {
    state: Arc<Mutex<SlotState>>,
}

impl FrameSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored frame, reusing its allocation.
    pub(crate) fn publish(&self, width: u32, height: u32, pixels: &[u8]) {
        let mut state = self.state.lock();
        state.frame.width = width;
        state.frame.height = height;
        state.frame.pixels.clear();
        state.frame.pixels.extend_from_slice(pixels);
        state.generation += 1;
    }

    /// Runs `read` on the stored frame if it is newer than `seen`, and
    /// returns its generation with the result.
    pub(crate) fn read_newer<R>(
        &self,
        seen: u64,
        read: impl FnOnce(&PresentedFrame) -> R,
    ) -> Option<(u64, R)> {
        let state = self.state.lock();
        if state.generation > seen {
            Some((state.generation, read(&state.frame)))
        } else {
            None
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.state.lock().generation
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
