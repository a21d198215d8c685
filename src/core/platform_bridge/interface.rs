//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-frame-loop message type.
//
// Defines the contract for communication between the platform (main)
// thread and the frame thread.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from platform to the frame thread over a bounded channel.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// Batched input events for a frame.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// Window close requested.
    WindowClosed,
}

//=========================================================================
// Unit Tests
//=========================================================================
