//=========================================================================
// Event Collector
//=========================================================================
//
// Frame-thread side of the platform channel, exposed as an InputSource.
//
// Architecture:
//   Receiver<PlatformEvent> → poll() → Vec<InputEvent>
//
// Per batch, discrete events precede continuous ones. WindowClosed
// becomes InputEvent::Quit. Polling is bounded per frame so a flood of
// platform events cannot starve rendering.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::frame_loop::InputSource;
use crate::core::input::InputEvent;

//=== EventCollector ======================================================

/// Drains platform events without blocking.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    disconnected: bool,
}

impl EventCollector {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            disconnected: false,
        }
    }

    /// Whether the platform side has hung up.
    pub(crate) fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn handle_event(event: PlatformEvent, out: &mut Vec<InputEvent>) {
        match event {
            PlatformEvent::Inputs { discrete, continuous } => {
                out.extend(discrete);
                out.extend(continuous);
            }
            PlatformEvent::WindowClosed => out.push(InputEvent::Quit),
        }
    }
}

impl InputSource for EventCollector {
    fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    Self::handle_event(event, &mut events);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        debug!(target: "platform", "Platform channel disconnected");
                    }
                    self.disconnected = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!(target: "platform", "Event queue backlog: drained {} events this frame", drained);
        }

        events
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
