//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to viewer actions like ToggleExplode, Export, etc.
//! Mouse orbit and zoom are NOT mapped here - they go directly to OrbitController.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Select catalog entry by position (1-9 keys, zero-based)
    SelectAssembly(usize),
    /// Next assembly in catalog order (Right arrow)
    NextAssembly,
    /// Previous assembly in catalog order (Left arrow)
    PreviousAssembly,
    /// Toggle between assembled and exploded view (E key)
    ToggleExplode,
    /// Toggle auto-rotation (T key)
    ToggleRotate,
    /// Reset camera to the default viewpoint (R key)
    ResetCamera,
    /// Export the current assembly (X key)
    Export,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Exit application (Escape)
    Exit,
}

/// Maps raw input events to semantic actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `None` for releases and unmapped keys
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyE => Some(InputAction::ToggleExplode),
            KeyCode::KeyT => Some(InputAction::ToggleRotate),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::KeyX => Some(InputAction::Export),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::ArrowRight => Some(InputAction::NextAssembly),
            KeyCode::ArrowLeft => Some(InputAction::PreviousAssembly),
            _ => Self::digit(key).map(|n| InputAction::SelectAssembly(n - 1)),
        }
    }

    /// 1-9 on the main row or keypad
    fn digit(key: KeyCode) -> Option<usize> {
        let n = match key {
            KeyCode::Digit1 | KeyCode::Numpad1 => 1,
            KeyCode::Digit2 | KeyCode::Numpad2 => 2,
            KeyCode::Digit3 | KeyCode::Numpad3 => 3,
            KeyCode::Digit4 | KeyCode::Numpad4 => 4,
            KeyCode::Digit5 | KeyCode::Numpad5 => 5,
            KeyCode::Digit6 | KeyCode::Numpad6 => 6,
            KeyCode::Digit7 | KeyCode::Numpad7 => 7,
            KeyCode::Digit8 | KeyCode::Numpad8 => 8,
            KeyCode::Digit9 | KeyCode::Numpad9 => 9,
            _ => return None,
        };
        Some(n)
    }
}
