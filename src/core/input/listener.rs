//=========================================================================
// Input Listeners
//=========================================================================
//
// The listener capability and the context it runs against.
//
// Dispatch contract:
//   for each event (arrival order):
//     for each listener (registration order):
//       accepts(kind)? → consume(event, ctx) → true stops the event
//
// An event nobody claims is dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;

//=== Internal Dependencies ===============================================

use super::{EventKind, EventKinds, InputEvent, KeyCode};
use crate::core::scene::EntityId;

//=== QuitSignal ==========================================================

/// Process-wide request to stop the frame loop.
///
/// Cloning shares the flag. Once requested it stays requested.
#[derive(Debug, Clone, Default)]
pub struct QuitSignal(Arc<AtomicBool>);

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests termination. Returns `true` only for the first request.
    pub fn request(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

//=== Acknowledgement =====================================================

/// Observable record of a listener reacting to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    /// Entity whose listener produced it, if dispatched through a scene.
    pub entity: Option<EntityId>,
    pub label: String,
}

//=== DispatchContext =====================================================

/// Mutable state handed to every `consume` call during one dispatch pass.
#[derive(Debug)]
pub struct DispatchContext {
    quit: QuitSignal,
    current: Option<EntityId>,
    acknowledgements: Vec<Acknowledgement>,
}

impl DispatchContext {
    pub fn new(quit: QuitSignal) -> Self {
        Self {
            quit,
            current: None,
            acknowledgements: Vec::new(),
        }
    }

    pub fn quit(&self) -> &QuitSignal {
        &self.quit
    }

    /// Requests termination of the frame loop.
    pub fn request_quit(&self) -> bool {
        self.quit.request()
    }

    /// Records that the current listener handled something.
    pub fn acknowledge(&mut self, label: impl Into<String>) {
        self.acknowledgements.push(Acknowledgement {
            entity: self.current,
            label: label.into(),
        });
    }

    pub fn acknowledgements(&self) -> &[Acknowledgement] {
        &self.acknowledgements
    }

    pub fn take_acknowledgements(&mut self) -> Vec<Acknowledgement> {
        std::mem::take(&mut self.acknowledgements)
    }

    pub(crate) fn set_current(&mut self, entity: Option<EntityId>) {
        self.current = entity;
    }
}

//=== InputListener =======================================================

/// Capability to receive input events.
///
/// `accepted_kinds` is fixed for the lifetime of the listener. `consume`
/// is only ever called with events of an accepted kind and returns `true`
/// to claim the event, which stops its propagation.
pub trait InputListener {
    fn accepted_kinds(&self) -> EventKinds;

    fn accepts(&self, kind: EventKind) -> bool {
        self.accepted_kinds().contains(kind)
    }

    fn consume(&mut self, event: &InputEvent, ctx: &mut DispatchContext) -> bool;
}

//=== QuitOnEscape ========================================================

/// Requests quit when Escape is pressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuitOnEscape;

impl InputListener for QuitOnEscape {
    fn accepted_kinds(&self) -> EventKinds {
        EventKinds::only(EventKind::KeyDown)
    }

    fn consume(&mut self, event: &InputEvent, ctx: &mut DispatchContext) -> bool {
        match event {
            InputEvent::KeyDown { key: KeyCode::Escape, .. } => {
                if ctx.request_quit() {
                    info!(target: "runtime", "Escape pressed, quit requested");
                }
                true
            }
            _ => false,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
