use std::path::PathBuf;

use crossterm::event::Event;

use crate::surface::Surface;

pub mod salute;
pub mod show;

/// Startup options shared by every effect.
#[derive(Debug, Clone)]
pub struct Settings {
    pub heart_image: PathBuf,
    pub face_image: PathBuf,
    pub seed: Option<u64>,
    /// Whether the terminal reports key releases.
    pub release_events: bool,
}

/// A scene driven one tick per frame.
pub trait Effect {
    fn new(settings: &Settings) -> Self
    where
        Self: Sized;
    /// Advances the scene one tick. `now_ms` is monotonic time since startup.
    fn tick(&mut self, now_ms: u64);
    fn render(&self, surface: &mut dyn Surface);
    fn handle_event(&mut self, _event: &Event) {}
}
