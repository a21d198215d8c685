//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit) with the frame thread.
//
// This module defines the contract between platform implementations and
// the frame loop, so the windowing backend can be swapped without
// touching scene or asset code.
//
// Components:
// - `interface`: the message type crossing the thread boundary
// - `event_collector`: frame-thread side, an `InputSource`
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::EventCollector;
pub(crate) use interface::PlatformEvent;
