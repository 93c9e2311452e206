use std::collections::HashMap;
use std::time::{Duration, Instant};
use crossterm::event::{KeyCode, KeyEventKind};

use crate::constants::KEY_TIMEOUT;
use crate::game::Game;
use crate::input::event::InputEvent;

#[derive(Debug, Clone, Copy)]
pub struct KeyState {
    pub pressed: bool,
    pub last_update: Instant,
}

impl KeyState {
    pub fn new(now: Instant) -> Self {
        Self {
            pressed: false,
            last_update: now,
        }
    }
}

/// Tracks held keys so that terminals without release events still
/// produce a release once key activity stops.
pub struct InputState {
    pub keys: HashMap<InputEvent, KeyState>,
    pub keyboard_enhancement_active: bool,
}

impl InputState {
    pub fn new() -> Self {
        let now = Instant::now();
        let mut keys = HashMap::new();
        keys.insert(InputEvent::MoveLeft, KeyState::new(now));
        keys.insert(InputEvent::MoveRight, KeyState::new(now));
        keys.insert(InputEvent::SoftDropStart, KeyState::new(now));

        Self {
            keys,
            keyboard_enhancement_active: false,
        }
    }

    pub fn is_pressed(&self, press: InputEvent) -> bool {
        self.keys.get(&press).is_some_and(|s| s.pressed)
    }

    /// Maps one terminal key event to an engine event, if any.
    pub fn translate(&mut self, key_code: KeyCode, kind: KeyEventKind, now: Instant) -> Option<InputEvent> {
        match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => match key_code {
                KeyCode::Left => self.press(InputEvent::MoveLeft, now),
                KeyCode::Right => self.press(InputEvent::MoveRight, now),
                KeyCode::Down => self.press(InputEvent::SoftDropStart, now),
                KeyCode::Up => Some(InputEvent::RotateCw),
                KeyCode::Char(' ') if kind == KeyEventKind::Press => Some(InputEvent::TogglePause),
                _ => None,
            },
            KeyEventKind::Release => match key_code {
                KeyCode::Left => self.release(InputEvent::MoveLeft),
                KeyCode::Right => self.release(InputEvent::MoveRight),
                KeyCode::Down => self.release(InputEvent::SoftDropStart),
                _ => None,
            },
        }
    }

    fn press(&mut self, press: InputEvent, now: Instant) -> Option<InputEvent> {
        let state = self.keys.get_mut(&press)?;
        state.last_update = now;
        if state.pressed {
            return None;
        }
        state.pressed = true;
        Some(press)
    }

    fn release(&mut self, press: InputEvent) -> Option<InputEvent> {
        let state = self.keys.get_mut(&press)?;
        if !state.pressed {
            return None;
        }
        state.pressed = false;
        press.release()
    }

    /// Releases keys that have gone quiet, unless the terminal reports releases.
    pub fn check_timeouts(&mut self, now: Instant) -> Vec<InputEvent> {
        if self.keyboard_enhancement_active {
            return Vec::new();
        }

        let timeout = Duration::from_millis(KEY_TIMEOUT);
        let mut released = Vec::new();
        for (press, state) in self.keys.iter_mut() {
            if state.pressed && now.duration_since(state.last_update) > timeout {
                state.pressed = false;
                released.extend(press.release());
            }
        }
        released
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_input<R: rand::Rng>(
    game: &mut Game<R>,
    input_state: &mut InputState,
    key_code: KeyCode,
    kind: KeyEventKind,
) {
    if let Some(event) = input_state.translate(key_code, kind, Instant::now()) {
        game.handle_input(event);
    }
}
