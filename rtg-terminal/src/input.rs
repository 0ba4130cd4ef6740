//! Map crossterm events onto the core [`InputState`].
//!
//! Most terminals only report key presses, so a movement key counts as held
//! for [`HOLD_WINDOW`] after its last press or auto-repeat. Terminals that
//! report releases end the hold immediately.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rtg_core::{InputState, MoveKey};

/// How long a key stays down without a repeat event
pub const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// Cells the virtual cursor moves per arrow press in keyboard look mode
pub const ARROW_STEP: f64 = 2.0;

/// App-level actions that are not camera motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleProjection,
    Reset,
    ToggleKeyboardLook,
}

#[derive(Debug, Default)]
pub struct TerminalInput {
    state: InputState,
    pressed_at: HashMap<MoveKey, Instant>,
    mouse_look: bool,
    keyboard_look: bool,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn keyboard_look(&self) -> bool {
        self.keyboard_look
    }

    /// Feed one event, returning the command it triggers, if any
    pub fn handle_event(&mut self, event: &Event, now: Instant) -> Option<Command> {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                None
            }
            Event::FocusLost => {
                self.release_everything();
                None
            }
            _ => None,
        }
    }

    /// Drop keys whose hold window has run out
    pub fn refresh(&mut self, now: Instant) {
        let state = &mut self.state;
        self.pressed_at.retain(|key, pressed| {
            let held = now.saturating_duration_since(*pressed) < HOLD_WINDOW;
            if !held {
                state.release(*key);
            }
            held
        });
    }

    fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> Option<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }

        if key.kind == KeyEventKind::Release {
            if let Some(movement) = movement_key(key.code) {
                self.release_key(movement);
                self.release_key(MoveKey::Sprint);
            }
            return None;
        }

        if let Some(movement) = movement_key(key.code) {
            self.press_key(movement, now);
            if is_sprint(key) {
                self.press_key(MoveKey::Sprint, now);
            } else {
                self.release_key(MoveKey::Sprint);
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::ToggleProjection),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.keyboard_look = !self.keyboard_look;
                self.sync_look();
                Some(Command::ToggleKeyboardLook)
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down if self.keyboard_look => {
                let (x, y) = self.state.cursor;
                let (dx, dy) = match key.code {
                    KeyCode::Left => (-ARROW_STEP, 0.0),
                    KeyCode::Right => (ARROW_STEP, 0.0),
                    KeyCode::Up => (0.0, -ARROW_STEP),
                    _ => (0.0, ARROW_STEP),
                };
                self.state.set_cursor(x + dx, y + dy);
                None
            }
            _ => None,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let position = (f64::from(mouse.column), f64::from(mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Right) => {
                self.state.set_cursor(position.0, position.1);
                self.mouse_look = true;
                self.sync_look();
            }
            MouseEventKind::Up(MouseButton::Right) => {
                self.mouse_look = false;
                self.sync_look();
            }
            MouseEventKind::Drag(MouseButton::Right) | MouseEventKind::Moved
                if !self.keyboard_look =>
            {
                self.state.set_cursor(position.0, position.1);
            }
            _ => {}
        }
    }

    fn press_key(&mut self, key: MoveKey, now: Instant) {
        self.state.press(key);
        self.pressed_at.insert(key, now);
    }

    fn release_key(&mut self, key: MoveKey) {
        self.state.release(key);
        self.pressed_at.remove(&key);
    }

    fn release_everything(&mut self) {
        self.state.release_all();
        self.pressed_at.clear();
        self.mouse_look = false;
        self.keyboard_look = false;
        self.sync_look();
    }

    fn sync_look(&mut self) {
        self.state.look_held = self.mouse_look || self.keyboard_look;
    }
}

fn movement_key(code: KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(MoveKey::Forward),
            's' => Some(MoveKey::Backward),
            'a' => Some(MoveKey::Left),
            'd' => Some(MoveKey::Right),
            'e' => Some(MoveKey::Up),
            'q' => Some(MoveKey::Down),
            _ => None,
        },
        _ => None,
    }
}

// Shift arrives either as a modifier or only as an upper-case letter
fn is_sprint(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::SHIFT)
        || matches!(key.code, KeyCode::Char(c) if c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_wasd_maps_to_movement() {
        let mut input = TerminalInput::new();
        let now = Instant::now();
        for code in ['w', 'a', 's', 'd', 'q', 'e'] {
            assert_eq!(input.handle_event(&press(KeyCode::Char(code)), now), None);
        }
        let state = input.state();
        assert!(state.key_down(MoveKey::Forward));
        assert!(state.key_down(MoveKey::Left));
        assert!(state.key_down(MoveKey::Backward));
        assert!(state.key_down(MoveKey::Right));
        assert!(state.key_down(MoveKey::Down));
        assert!(state.key_down(MoveKey::Up));
        assert!(!state.key_down(MoveKey::Sprint));
    }

    #[test]
    fn test_uppercase_letter_sprints() {
        let mut input = TerminalInput::new();
        let now = Instant::now();
        input.handle_event(&press(KeyCode::Char('W')), now);
        assert!(input.state().key_down(MoveKey::Forward));
        assert!(input.state().key_down(MoveKey::Sprint));

        // Lower-case press drops the sprint again
        input.handle_event(&press(KeyCode::Char('w')), now);
        assert!(!input.state().key_down(MoveKey::Sprint));
    }

    #[test]
    fn test_keys_expire_after_hold_window() {
        let mut input = TerminalInput::new();
        let start = Instant::now();
        input.handle_event(&press(KeyCode::Char('w')), start);

        input.refresh(start + HOLD_WINDOW / 2);
        assert!(input.state().key_down(MoveKey::Forward));

        input.refresh(start + HOLD_WINDOW * 2);
        assert!(!input.state().key_down(MoveKey::Forward));
    }

    #[test]
    fn test_release_event_ends_hold() {
        let mut input = TerminalInput::new();
        let now = Instant::now();
        input.handle_event(&press(KeyCode::Char('d')), now);

        let mut release = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        input.handle_event(&Event::Key(release), now);
        assert!(!input.state().key_down(MoveKey::Right));
    }

    #[test]
    fn test_commands() {
        let mut input = TerminalInput::new();
        let now = Instant::now();
        assert_eq!(input.handle_event(&press(KeyCode::Esc), now), Some(Command::Quit));
        assert_eq!(
            input.handle_event(&press(KeyCode::Char('p')), now),
            Some(Command::ToggleProjection)
        );
        assert_eq!(input.handle_event(&press(KeyCode::Char('r')), now), Some(Command::Reset));
        assert_eq!(
            input.handle_event(
                &Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
                now
            ),
            Some(Command::Quit)
        );
    }

    #[test]
    fn test_right_drag_looks() {
        let mut input = TerminalInput::new();
        let now = Instant::now();
        input.handle_event(&mouse(MouseEventKind::Down(MouseButton::Right), 10, 5), now);
        assert!(input.state().look_held);
        assert_eq!(input.state().cursor, (10.0, 5.0));

        input.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Right), 14, 3), now);
        assert_eq!(input.state().cursor, (14.0, 3.0));

        input.handle_event(&mouse(MouseEventKind::Up(MouseButton::Right), 14, 3), now);
        assert!(!input.state().look_held);
    }

    #[test]
    fn test_left_button_does_not_look() {
        let mut input = TerminalInput::new();
        input.handle_event(
            &mouse(MouseEventKind::Down(MouseButton::Left), 3, 3),
            Instant::now(),
        );
        assert!(!input.state().look_held);
    }

    #[test]
    fn test_keyboard_look_moves_virtual_cursor() {
        let mut input = TerminalInput::new();
        let now = Instant::now();

        // Arrows do nothing until keyboard look is on
        input.handle_event(&press(KeyCode::Right), now);
        assert_eq!(input.state().cursor, (0.0, 0.0));

        assert_eq!(
            input.handle_event(&press(KeyCode::Char('l')), now),
            Some(Command::ToggleKeyboardLook)
        );
        assert!(input.keyboard_look());
        assert!(input.state().look_held);

        input.handle_event(&press(KeyCode::Right), now);
        input.handle_event(&press(KeyCode::Up), now);
        assert_eq!(input.state().cursor, (ARROW_STEP, -ARROW_STEP));

        input.handle_event(&press(KeyCode::Char('l')), now);
        assert!(!input.state().look_held);
    }

    #[test]
    fn test_focus_lost_releases_everything() {
        let mut input = TerminalInput::new();
        let now = Instant::now();
        input.handle_event(&press(KeyCode::Char('w')), now);
        input.handle_event(&mouse(MouseEventKind::Down(MouseButton::Right), 1, 1), now);

        input.handle_event(&Event::FocusLost, now);
        assert!(!input.state().key_down(MoveKey::Forward));
        assert!(!input.state().look_held);
    }
}
