use std::path::Path;

use fastrand::Rng;
use log::debug;

use crate::config::{
    CANONICAL_SIZES, FIREWORK_COLORS, HEIGHT, LAUNCH_MARGIN, PLACEHOLDER_HEART, TARGET_MARGIN, TARGET_TOP, WIDTH,
};
use crate::firework::{Firework, ParticleStyle};
use crate::sprites::{SpriteCache, SpriteSource};
use crate::surface::Surface;

/// Owns every live firework along with the sprite cache and RNG they draw from.
pub struct FireworkManager {
    fireworks: Vec<Firework>,
    sprites: SpriteCache,
    rng: Rng,
}

impl FireworkManager {
    pub fn new(sprites: SpriteCache, rng: Rng) -> Self {
        Self {
            fireworks: Vec::new(),
            sprites,
            rng,
        }
    }

    /// Builds a manager whose heart sprites come from `heart_path`, falling back to
    /// placeholder squares if the image cannot be read.
    pub fn with_heart_image(heart_path: impl AsRef<Path>, seed: Option<u64>) -> Self {
        let mut sprites = SpriteCache::new();
        if sprites.preload(heart_path, &CANONICAL_SIZES, PLACEHOLDER_HEART) == SpriteSource::Placeholder {
            debug!("heart fireworks will use placeholder sprites");
        }
        let rng = match seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self::new(sprites, rng)
    }

    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Launches a firework from the bottom edge toward a random point in the upper half.
    pub fn spawn(&mut self, style: ParticleStyle) {
        let start_x = self.rng.i32(LAUNCH_MARGIN..=WIDTH - LAUNCH_MARGIN) as f32;
        let start_y = HEIGHT as f32;
        let target_x = self.rng.i32(TARGET_MARGIN..=WIDTH - TARGET_MARGIN) as f32;
        let target_y = self.rng.i32(TARGET_TOP..=HEIGHT / 2) as f32;
        let color = FIREWORK_COLORS[self.rng.usize(..FIREWORK_COLORS.len())];

        debug!(
            "launching {:?} firework from ({}, {}) to ({}, {})",
            style, start_x, start_y, target_x, target_y
        );
        self.fireworks
            .push(Firework::new((start_x, start_y), (target_x, target_y), color, style));
    }

    /// Advances every firework and drops the ones that have finished.
    pub fn tick(&mut self) {
        let rng = &mut self.rng;
        let sprites = &mut self.sprites;
        self.fireworks.retain_mut(|firework| firework.advance(rng, sprites));
    }

    pub fn render_all(&self, surface: &mut dyn Surface) {
        for firework in &self.fireworks {
            firework.render(surface);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.fireworks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.fireworks.is_empty()
    }
}
