use std::collections::HashMap;

use winit::{event::MouseButton, keyboard::KeyCode};

use crate::camera::Direction;
use crate::math::Vec2;

/// Logical key the views understand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Move(Direction),
    ToggleConsole,
    Submit,
    Backspace,
}

/// Mapping from physical keys to logical [`Key`]s.
///
/// Several physical keys may map to the same logical key (arrows and WASD
/// both move the camera).
#[derive(Clone, Debug)]
pub struct InputMap {
    bindings: HashMap<KeyCode, Key>,
}

impl InputMap {
    /// Create an empty input map.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a physical key, replacing any previous binding for it.
    pub fn bind_key(&mut self, code: KeyCode, key: Key) {
        self.bindings.insert(code, key);
    }

    pub fn key_for(&self, code: KeyCode) -> Option<Key> {
        self.bindings.get(&code).copied()
    }
}

impl Default for InputMap {
    /// Arrows and WASD move, F4 toggles the console, Enter submits.
    fn default() -> Self {
        let mut map = Self::new();
        for (codes, direction) in [
            ([KeyCode::ArrowUp, KeyCode::KeyW], Direction::Up),
            ([KeyCode::ArrowDown, KeyCode::KeyS], Direction::Down),
            ([KeyCode::ArrowLeft, KeyCode::KeyA], Direction::Left),
            ([KeyCode::ArrowRight, KeyCode::KeyD], Direction::Right),
        ] {
            for code in codes {
                map.bind_key(code, Key::Move(direction));
            }
        }
        map.bind_key(KeyCode::F4, Key::ToggleConsole);
        map.bind_key(KeyCode::Enter, Key::Submit);
        map.bind_key(KeyCode::NumpadEnter, Key::Submit);
        map.bind_key(KeyCode::Backspace, Key::Backspace);
        map
    }
}

/// Tracks the cursor and left button to turn raw motion into drags.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    position: Option<Vec2>,
    left_down: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in UI coordinates.
    pub fn position(&self) -> Vec2 {
        self.position.unwrap_or(Vec2::ZERO)
    }

    /// Record a cursor move. Returns the drag delta in world orientation
    /// (y up) when the left button is held.
    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) -> Option<Vec2> {
        let current = Vec2::new(x, y);
        let previous = self.position.replace(current);
        match previous {
            Some(previous) if self.left_down => {
                let delta = current - previous;
                Some(Vec2::new(delta.x, -delta.y))
            }
            _ => None,
        }
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if button == MouseButton::Left {
            self.left_down = pressed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_cover_arrows_and_wasd() {
        let map = InputMap::default();
        assert_eq!(map.key_for(KeyCode::KeyW), Some(Key::Move(Direction::Up)));
        assert_eq!(map.key_for(KeyCode::ArrowUp), Some(Key::Move(Direction::Up)));
        assert_eq!(map.key_for(KeyCode::KeyA), Some(Key::Move(Direction::Left)));
        assert_eq!(map.key_for(KeyCode::ArrowRight), Some(Key::Move(Direction::Right)));
        assert_eq!(map.key_for(KeyCode::F4), Some(Key::ToggleConsole));
        assert_eq!(map.key_for(KeyCode::Enter), Some(Key::Submit));
        assert_eq!(map.key_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn rebinding_replaces_previous_key() {
        let mut map = InputMap::default();
        map.bind_key(KeyCode::F4, Key::Submit);
        map.bind_key(KeyCode::Backquote, Key::ToggleConsole);
        assert_eq!(map.key_for(KeyCode::F4), Some(Key::Submit));
        assert_eq!(map.key_for(KeyCode::Backquote), Some(Key::ToggleConsole));
        assert_eq!(map.key_for(KeyCode::KeyW), Some(Key::Move(Direction::Up)));
    }

    #[test]
    fn drags_only_while_left_button_held() {
        let mut pointer = PointerState::new();
        assert_eq!(pointer.handle_cursor_moved(10.0, 10.0), None);
        assert_eq!(pointer.handle_cursor_moved(12.0, 10.0), None);

        pointer.handle_mouse_button(MouseButton::Left, true);
        // Moving the cursor down the screen is a negative world-y drag.
        assert_eq!(pointer.handle_cursor_moved(15.0, 14.0), Some(Vec2::new(3.0, -4.0)));

        pointer.handle_mouse_button(MouseButton::Right, false);
        assert_eq!(pointer.handle_cursor_moved(15.0, 15.0), Some(Vec2::new(0.0, -1.0)));
        pointer.handle_mouse_button(MouseButton::Left, false);
        assert_eq!(pointer.handle_cursor_moved(0.0, 0.0), None);
        assert_eq!(pointer.position(), Vec2::ZERO);
    }
}
