use super::{Effect, Settings};
use crate::firework::ParticleStyle;
use crate::manager::FireworkManager;
use crate::surface::Surface;

// Launch spacing, in ticks
const MIN_LAUNCH_GAP: u64 = 18;
const LAUNCH_GAP_SPREAD: u64 = 48;

/// Unattended display: fireworks of either style go up on their own.
pub struct SaluteEffect {
    fireworks: FireworkManager,
    ticks: u64,
    next_launch: u64,
}

impl Effect for SaluteEffect {
    fn new(settings: &Settings) -> Self {
        Self {
            fireworks: FireworkManager::with_heart_image(&settings.heart_image, settings.seed),
            ticks: 0,
            next_launch: MIN_LAUNCH_GAP,
        }
    }

    fn tick(&mut self, _now_ms: u64) {
        self.ticks += 1;

        if self.ticks >= self.next_launch {
            let rng = self.fireworks.rng();
            let style = ParticleStyle::random(rng);
            let gap = MIN_LAUNCH_GAP + rng.u64(..LAUNCH_GAP_SPREAD);
            self.fireworks.spawn(style);
            self.next_launch = self.ticks + gap;
        }

        self.fireworks.tick();
    }

    fn render(&self, surface: &mut dyn Surface) {
        surface.fill(crate::get_bg_color());
        self.fireworks.render_all(surface);
    }
}
