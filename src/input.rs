//! Keyboard handling: which keys are held, and what holding them does.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::config::{COMBO_REPEAT, SINGLE_KEY_REPEAT, TAP_TICKS};
use crate::firework::ParticleStyle;

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Set of currently held keys.
///
/// Terminals that report key releases give exact hold spans. Legacy terminals
/// only send presses and auto-repeats, so there a key counts as held until it
/// goes quiet: `TAP_TICKS` after a lone press, `hold_ticks` once it repeats.
pub struct KeyState {
    held: HashMap<KeyCode, Hold>,
    hold_ticks: Option<u32>,
}

struct Hold {
    // Ticks since the key was last reported
    silent: u32,
    repeating: bool,
}

impl KeyState {
    pub fn new(hold_ticks: Option<u32>) -> Self {
        Self {
            held: HashMap::new(),
            hold_ticks,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        let code = normalize(key.code);
        match key.kind {
            // Legacy terminals report auto-repeats as presses too
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held
                    .entry(code)
                    .and_modify(|hold| {
                        hold.silent = 0;
                        hold.repeating = true;
                    })
                    .or_insert(Hold { silent: 0, repeating: false });
            }
            KeyEventKind::Release => {
                self.held.remove(&code);
            }
        }
    }

    /// Ages every held key by one tick, dropping the ones that timed out.
    pub fn end_tick(&mut self) {
        let Some(limit) = self.hold_ticks else {
            return;
        };
        self.held.retain(|_, hold| {
            hold.silent += 1;
            let limit = if hold.repeating { limit } else { limit.min(TAP_TICKS) };
            hold.silent < limit
        });
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held.contains_key(&normalize(code))
    }
}

/// Counts consecutive held ticks and fires on every `every`-th one.
#[derive(Default)]
struct RepeatTimer {
    frames: u32,
}

impl RepeatTimer {
    fn step(&mut self, held: bool, every: u32) -> bool {
        if held {
            self.frames += 1;
            self.frames % every == 0
        } else {
            self.frames = 0;
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Who {
    Kwimi,
    Grogu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Launch(ParticleStyle),
    /// Start a hop, optionally with the character's speech text.
    Hop { who: Who, quip: bool },
}

#[derive(Default)]
pub struct InputMapper {
    hearts: RepeatTimer,
    pixels: RepeatTimer,
    combo: RepeatTimer,
}

impl InputMapper {
    pub fn process(&mut self, keys: &KeyState) -> Vec<Action> {
        let mut actions = Vec::new();
        let k = keys.is_held(KeyCode::Char('k'));
        let g = keys.is_held(KeyCode::Char('g'));

        if self.hearts.step(keys.is_held(KeyCode::Char(' ')), SINGLE_KEY_REPEAT) {
            actions.push(Action::Launch(ParticleStyle::Heart));
        }

        // P yields to the K+G combo
        let pixels_held = keys.is_held(KeyCode::Char('p')) && !(k && g);
        if self.pixels.step(pixels_held, SINGLE_KEY_REPEAT) {
            actions.push(Action::Launch(ParticleStyle::Pixel));
        }

        if keys.is_held(KeyCode::Left) {
            actions.push(Action::Hop { who: Who::Kwimi, quip: false });
        }
        if keys.is_held(KeyCode::Right) {
            actions.push(Action::Hop { who: Who::Grogu, quip: false });
        }
        if k {
            actions.push(Action::Hop { who: Who::Kwimi, quip: true });
        }
        if g {
            actions.push(Action::Hop { who: Who::Grogu, quip: true });
        }

        if self.combo.step(k && g, COMBO_REPEAT) {
            actions.push(Action::Launch(ParticleStyle::Heart));
        }

        actions
    }
}
