//=========================================================================
// Input Event Types
//
// Defines the shell's representation of low-level input events.
//
// This module abstracts away platform-specific input (e.g. Winit) into a
// unified format consumed by the listener chain.
//
// Responsibilities:
// - Represent keyboard and pointer inputs in a stable, portable way
// - Tag every event with an `EventKind` for listener filtering
// - Provide equality and hashing semantics for per-frame deduplication
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    Scene::dispatch_events → InputListener chain
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== MouseButton =========================================================

/// Physical pointer button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Fallback for keys not explicitly mapped by the platform layer.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// The system does not distinguish between left/right variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

//=== EventKind ===========================================================

/// Tag of an [`InputEvent`], used by listeners to declare interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    PointerDown,
    PointerUp,
    PointerMove,
    Quit,
}

impl EventKind {
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

//=== EventKinds ==========================================================

/// Fixed set of event kinds a listener accepts.
///
/// ```
/// use lumen_shell::core::input::{EventKind, EventKinds};
///
/// let kinds = EventKinds::of(&[EventKind::KeyDown, EventKind::KeyUp]);
/// assert!(kinds.contains(EventKind::KeyDown));
/// assert!(!kinds.contains(EventKind::PointerDown));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventKinds(u8);

impl EventKinds {
    pub const NONE: Self = Self(0);

    pub const fn only(kind: EventKind) -> Self {
        Self(kind.bit())
    }

    pub const fn of(kinds: &[EventKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        Self(bits)
    }

    pub const fn with(self, kind: EventKind) -> Self {
        Self(self.0 | kind.bit())
    }

    pub const fn contains(self, kind: EventKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

//=== InputEvent ==========================================================

/// Low-level input event as produced by the input source.
///
/// Pointer coordinates are in surface pixels, top-left origin.
///
/// # Equality & Hashing Semantics
///
/// Events are compared by kind + key/button + modifiers. Coordinates
/// are ignored so consecutive pointer events can be coalesced
/// (last position wins).
///
/// ```text
/// KeyDown{A, CTRL}        == KeyDown{A, CTRL}          ✓
/// KeyDown{A, CTRL}        == KeyDown{A, SHIFT}         ✗
/// PointerMoved{1,1}       == PointerMoved{5,9}         ✓
/// PointerDown{Left,1,1}   == PointerDown{Left,5,9}     ✓
/// ```
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    PointerDown {
        x: f32,
        y: f32,
        button: MouseButton,
        modifiers: Modifiers,
    },

    PointerUp {
        x: f32,
        y: f32,
        button: MouseButton,
        modifiers: Modifiers,
    },

    PointerMoved { x: f32, y: f32 },

    /// Window close or OS shutdown request.
    Quit,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::KeyUp { .. } => EventKind::KeyUp,
            Self::PointerDown { .. } => EventKind::PointerDown,
            Self::PointerUp { .. } => EventKind::PointerUp,
            Self::PointerMoved { .. } => EventKind::PointerMove,
            Self::Quit => EventKind::Quit,
        }
    }

    /// Pointer coordinates, for pointer events.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            Self::PointerDown { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::PointerMoved { x, y } => Some((x, y)),
            _ => None,
        }
    }

    /// Shorthand for an unmodified key press.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Shorthand for an unmodified pointer press.
    pub fn pointer_down(x: f32, y: f32, button: MouseButton) -> Self {
        Self::PointerDown {
            x,
            y,
            button,
            modifiers: Modifiers::NONE,
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown { key: a, modifiers: ma }, KeyDown { key: b, modifiers: mb })
            | (KeyUp { key: a, modifiers: ma }, KeyUp { key: b, modifiers: mb }) => {
                a == b && ma == mb
            }
            (
                PointerDown { button: a, modifiers: ma, .. },
                PointerDown { button: b, modifiers: mb, .. },
            )
            | (
                PointerUp { button: a, modifiers: ma, .. },
                PointerUp { button: b, modifiers: mb, .. },
            ) => a == b && ma == mb,
            (PointerMoved { .. }, PointerMoved { .. }) => true,
            (Quit, Quit) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

/// Consistent with equality: coordinates are never hashed.
impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::KeyDown { key, modifiers } | Self::KeyUp { key, modifiers } => {
                key.hash(state);
                modifiers.hash(state);
            }
            Self::PointerDown { button, modifiers, .. }
            | Self::PointerUp { button, modifiers, .. } => {
                button.hash(state);
                modifiers.hash(state);
            }
            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
