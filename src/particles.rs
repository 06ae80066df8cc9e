use crate::config::{AIR_DAMPING, GRAVITY};
use crate::sprites::Sprite;
use crate::surface::{Rgb, Surface};

/// How a particle is drawn. Physics is the same for every kind.
#[derive(Clone)]
pub enum ParticleKind {
    /// Flat square of side `size` in the faded color.
    Pixel,
    /// Cached sprite, faded by alpha. `None` when the cache had nothing to give.
    Sprite(Option<Sprite>),
}

#[derive(Clone)]
pub struct Particle {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) color: Rgb,
    pub(crate) current_color: Rgb,
    pub(crate) size: u32,
    pub(crate) life: u32,
    pub(crate) max_life: u32,
    pub(crate) kind: ParticleKind,
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, color: Rgb, size: u32, lifetime: u32, kind: ParticleKind) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            color,
            current_color: color,
            size,
            life: lifetime,
            max_life: lifetime,
            kind,
        }
    }

    fn faded(&self, channel: u8) -> u8 {
        (channel as u32 * self.life / self.max_life.max(1)) as u8
    }

    /// Steps the particle one tick. Returns `false` once its lifetime has run out;
    /// removing it is up to the owner.
    pub fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;

        self.vy += GRAVITY;
        // Drag on the horizontal axis only
        self.vx *= AIR_DAMPING;

        self.life = self.life.saturating_sub(1);

        self.current_color = (
            self.faded(self.color.0),
            self.faded(self.color.1),
            self.faded(self.color.2),
        );

        self.life > 0
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if self.life == 0 {
            return;
        }
        let x = self.x as i32;
        let y = self.y as i32;

        match &self.kind {
            ParticleKind::Pixel => {
                surface.fill_rect(x, y, self.size, self.size, self.current_color);
            }
            ParticleKind::Sprite(Some(sprite)) => {
                let alpha = self.faded(255);
                if alpha < 255 {
                    surface.blit(sprite, x, y, Some(alpha));
                } else {
                    surface.blit(sprite, x, y, None);
                }
            }
            ParticleKind::Sprite(None) => {}
        }
    }
}
