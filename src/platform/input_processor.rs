//=========================================================================
// Input Processor
//=========================================================================
//
// Converts platform-specific Winit events into shell InputEvents.
//
// Architecture:
//   Winit Events → InputProcessor → InputEvent (shell type) → InputBuffer
//
// Stateful tracking: caches modifier state from ModifiersChanged and the
// last cursor position from CursorMoved, and stamps both onto subsequent
// key/button events (winit button events carry no coordinates). Unmapped
// keys (F13-F24, exotic keyboards) are filtered (returns None).
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::ElementState,
    event::{KeyEvent, MouseButton as WinitMouseButton},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

/// Converts Winit events to shell InputEvents with stateful modifier and
/// cursor tracking.
pub(crate) struct InputProcessor {
    current_modifiers: Modifiers,
    cursor: (f32, f32),
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
            cursor: (0.0, 0.0),
        }
    }

    //--- Modifier State Management ----------------------------------------

    /// Updates cached modifier state (applied to subsequent events).
    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    #[cfg(test)]
    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    //--- Event Processing -------------------------------------------------

    /// Converts Winit KeyEvent to InputEvent (filters unmapped keys).
    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        let key_code = match key_event.physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            _ => return None,
        };

        if matches!(key_code, KeyCode::Unidentified) {
            return None;
        }

        Some(self.create_key_input_event(key_code, key_event.state))
    }

    /// Converts Winit mouse button event to a pointer event at the last
    /// known cursor position.
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> InputEvent {
        let button = MouseButton::from(button);
        let (x, y) = self.cursor;

        match state {
            ElementState::Pressed => InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers: self.current_modifiers,
            },
            ElementState::Released => InputEvent::PointerUp {
                x,
                y,
                button,
                modifiers: self.current_modifiers,
            },
        }
    }

    /// Records the cursor position and creates a motion event (surface
    /// pixels, no modifiers).
    pub(crate) fn process_mouse_move(&mut self, x: f32, y: f32) -> InputEvent {
        self.cursor = (x, y);
        InputEvent::PointerMoved { x, y }
    }

    //--- Internal Helpers -------------------------------------------------

    fn create_key_input_event(&self, key: KeyCode, state: ElementState) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::KeyDown {
                key,
                modifiers: self.current_modifiers,
            },
            ElementState::Released => InputEvent::KeyUp {
                key,
                modifiers: self.current_modifiers,
            },
        }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit ModifiersState to shell Modifiers.
///
/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Converts Winit physical key codes to shell key codes.
///
/// Maps A-Z, 0-9, arrows, and common special keys. Unmapped keys (F13-F24,
/// numpad, media keys) return `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts Winit mouse buttons to shell buttons.
///
/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode as WinitKeyCode;

    fn make_modifiers(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        if shift { state.insert(ModifiersState::SHIFT); }
        if ctrl { state.insert(ModifiersState::CONTROL); }
        if alt { state.insert(ModifiersState::ALT); }
        state
    }

    #[test]
    fn starts_with_no_modifiers() {
        let processor = InputProcessor::new();
        let mods = processor.current_modifiers();
        assert!(!mods.shift && !mods.ctrl && !mods.alt);
    }

    #[test]
    fn update_modifiers_works() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(true, false, true));

        let mods = processor.current_modifiers();
        assert!(mods.shift && !mods.ctrl && mods.alt);
    }

    #[test]
    fn create_key_down_event_with_modifiers() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(false, true, false));

        let event = processor.create_key_input_event(
            KeyCode::KeyS,
            ElementState::Pressed,
        );

        match event {
            InputEvent::KeyDown { key, modifiers } => {
                assert_eq!(key, KeyCode::KeyS);
                assert!(modifiers.ctrl);
                assert!(!modifiers.shift);
            }
            _ => panic!("Expected KeyDown"),
        }
    }

    #[test]
    fn create_key_up_event_with_modifiers() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(true, true, false));

        let event = processor.create_key_input_event(
            KeyCode::KeyA,
            ElementState::Released,
        );

        match event {
            InputEvent::KeyUp { key, modifiers } => {
                assert_eq!(key, KeyCode::KeyA);
                assert!(modifiers.shift);
                assert!(modifiers.ctrl);
            }
            _ => panic!("Expected KeyUp"),
        }
    }

    #[test]
    fn keycode_conversion_filters_unidentified() {
        // Test conversion directly
        let unidentified = KeyCode::from(WinitKeyCode::F13);
        assert!(matches!(unidentified, KeyCode::Unidentified));
    }

    #[test]
    fn mouse_button_has_modifiers() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(false, false, true));

        let event = processor.process_mouse_button(
            WinitMouseButton::Left,
            ElementState::Pressed,
        );

        match event {
            InputEvent::PointerDown { button, modifiers, .. } => {
                assert_eq!(button, MouseButton::Left);
                assert!(modifiers.alt);
            }
            _ => panic!("Expected PointerDown"),
        }
    }

    #[test]
    fn mouse_move_updates_cursor() {
        let mut processor = InputProcessor::new();
        let event = processor.process_mouse_move(123.5, 456.7);

        assert_eq!(event.position(), Some((123.5, 456.7)));
        assert_eq!(processor.cursor(), (123.5, 456.7));
    }

    #[test]
    fn button_event_carries_last_cursor_position() {
        let mut processor = InputProcessor::new();
        processor.process_mouse_move(131.0, 71.0);

        let down = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed);
        let up = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Released);

        assert_eq!(down.position(), Some((131.0, 71.0)));
        assert!(matches!(up, InputEvent::PointerUp { x, y, .. } if (x, y) == (131.0, 71.0)));
    }

    #[test]
    fn modifiers_persist_across_events() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(true, false, false));

        let event1 = processor.process_mouse_button(
            WinitMouseButton::Left,
            ElementState::Pressed,
        );

        let event2 = processor.create_key_input_event(
            KeyCode::Space,
            ElementState::Pressed,
        );

        // Both should have Shift
        match event1 {
            InputEvent::PointerDown { modifiers, .. } => {
                assert!(modifiers.shift)
            }
            _ => panic!(),
        }
        match event2 {
            InputEvent::KeyDown { modifiers, .. } => {
                assert!(modifiers.shift)
            }
            _ => panic!(),
        }
    }

    #[test]
    fn keycode_conversion_alphabetic() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyZ), KeyCode::KeyZ);
    }

    #[test]
    fn keycode_conversion_special() {
        assert_eq!(KeyCode::from(WinitKeyCode::Space), KeyCode::Space);
        assert_eq!(KeyCode::from(WinitKeyCode::Enter), KeyCode::Enter);
        assert_eq!(KeyCode::from(WinitKeyCode::Escape), KeyCode::Escape);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Right), MouseButton::Right);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
    }
}