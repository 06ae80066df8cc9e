use crossterm::event::Event;

use super::{Effect, Settings};
use crate::character::Character;
use crate::config::{FACE_SIZE, HEIGHT, HOLD_TICKS, TEXT_GROGU, TEXT_KWIMI, WHITE, WIDTH};
use crate::input::{Action, InputMapper, KeyState, Who};
use crate::manager::FireworkManager;
use crate::surface::Surface;

const GROUND_THICKNESS: u32 = 10;

const INSTRUCTIONS: [&str; 5] = [
    "SPACE: Heart fireworks",
    "P: Pixel fireworks",
    "K+G: Romance combo (hearts!)",
    "LEFT/RIGHT: Hop",
    "Q/ESC: Quit",
];

/// The interactive toy: two hopping characters and keyboard-launched fireworks.
pub struct ShowEffect {
    kwimi: Character,
    grogu: Character,
    fireworks: FireworkManager,
    keys: KeyState,
    mapper: InputMapper,
}

impl ShowEffect {
    fn apply(&mut self, action: Action, now_ms: u64) {
        match action {
            Action::Launch(style) => self.fireworks.spawn(style),
            Action::Hop { who, quip } => {
                let (character, text) = match who {
                    Who::Kwimi => (&mut self.kwimi, TEXT_KWIMI),
                    Who::Grogu => (&mut self.grogu, TEXT_GROGU),
                };
                character.start_animation(now_ms, quip.then_some(text));
            }
        }
    }
}

impl Effect for ShowEffect {
    fn new(settings: &Settings) -> Self {
        let face_y = HEIGHT / 2 - FACE_SIZE as i32 / 2;
        let hold_ticks = if settings.release_events { None } else { Some(HOLD_TICKS) };

        Self {
            kwimi: Character::load(&settings.face_image, (100, face_y), "Kwimi", true, 80),
            grogu: Character::load(
                &settings.face_image,
                (WIDTH - 100 - FACE_SIZE as i32, face_y),
                "Grogu",
                false,
                -80,
            ),
            fireworks: FireworkManager::with_heart_image(&settings.heart_image, settings.seed),
            keys: KeyState::new(hold_ticks),
            mapper: InputMapper::default(),
        }
    }

    fn tick(&mut self, now_ms: u64) {
        for action in self.mapper.process(&self.keys) {
            self.apply(action, now_ms);
        }

        self.fireworks.tick();
        self.kwimi.update(now_ms);
        self.grogu.update(now_ms);

        self.keys.end_tick();
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fill(crate::get_bg_color());

        let ground_y = HEIGHT / 2 + FACE_SIZE as i32 / 2;
        surface.fill_rect(0, ground_y - GROUND_THICKNESS as i32 / 2, WIDTH as u32, GROUND_THICKNESS, WHITE);

        self.kwimi.render(surface);
        self.grogu.render(surface);
        self.fireworks.render_all(surface);

        for (i, line) in INSTRUCTIONS.iter().enumerate() {
            surface.draw_text(10, 10 + i as i32 * 25, line, WHITE);
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Key(key_event) = event {
            self.keys.handle_key(key_event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::{Draw, Recorder};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    fn settings() -> Settings {
        Settings {
            heart_image: "missing/heart.png".into(),
            face_image: "missing/face.png".into(),
            seed: Some(4),
            release_events: true,
        }
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    fn circles(effect: &ShowEffect) -> usize {
        let mut rec = Recorder::default();
        effect.render(&mut rec);
        rec.calls.iter().filter(|c| matches!(c, Draw::Circle { .. })).count()
    }

    #[test]
    fn test_idle_frame_layout() {
        let effect = ShowEffect::new(&settings());
        let mut rec = Recorder::default();
        effect.render(&mut rec);

        assert!(matches!(rec.calls[0], Draw::Fill(_)));
        assert_eq!(rec.calls[1], Draw::Rect { x: 0, y: 327, w: 800, h: 10, color: WHITE });
        assert_eq!(rec.calls[2], Draw::Blit { x: 100, y: 268, size: (64, 64), alpha: None });
        assert_eq!(rec.calls[4], Draw::Blit { x: 636, y: 268, size: (64, 64), alpha: None });
        let texts = rec.calls.iter().filter(|c| matches!(c, Draw::Text { .. })).count();
        assert_eq!(texts, 2 + INSTRUCTIONS.len());
    }

    #[test]
    fn test_held_space_launches_hearts() {
        let mut effect = ShowEffect::new(&settings());
        effect.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Press));

        for now in 0..7 {
            effect.tick(now * 16);
        }
        assert_eq!(circles(&effect), 0);

        effect.tick(7 * 16);
        assert_eq!(circles(&effect), 6);

        effect.handle_event(&key(KeyCode::Char(' '), KeyEventKind::Release));
        for now in 8..16 {
            effect.tick(now * 16);
        }
        // Still just the one shell climbing
        assert_eq!(circles(&effect), 6);
    }

    #[test]
    fn test_k_makes_kwimi_speak() {
        let mut effect = ShowEffect::new(&settings());
        effect.handle_event(&key(KeyCode::Char('k'), KeyEventKind::Press));
        effect.tick(0);
        effect.tick(100);

        let mut rec = Recorder::default();
        effect.render(&mut rec);
        assert!(rec.calls.iter().any(|c| matches!(c, Draw::Text { text, .. } if text == TEXT_KWIMI)));
        assert!(!rec.calls.iter().any(|c| matches!(c, Draw::Text { text, .. } if text == TEXT_GROGU)));
    }
}
