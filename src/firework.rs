//! A single firework: a shell that climbs toward its target, then bursts into
//! particles and lingers until the last one fades.

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use fastrand::Rng;
use log::debug;

use crate::config::{ARRIVAL_TOLERANCE, COLOR_JITTER, LAUNCH_SPEED_FACTOR};
use crate::easing::linear_fade;
use crate::particles::{Particle, ParticleKind};
use crate::sprites::SpriteCache;
use crate::surface::{Rgb, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleStyle {
    Heart,
    Pixel,
}

/// Per-style particle ranges used when a shell bursts.
struct BurstParams {
    size: RangeInclusive<u32>,
    lifetime: RangeInclusive<u32>,
}

const BURST_COUNT: RangeInclusive<usize> = 5..=15;
const BURST_SPEED_MIN: f32 = 2.0;
const BURST_SPEED_MAX: f32 = 8.0;

const TRAIL_STEPS: i32 = 5;
const HEAD_RADIUS: i32 = 3;

impl ParticleStyle {
    pub fn random(rng: &mut Rng) -> Self {
        if rng.bool() {
            ParticleStyle::Heart
        } else {
            ParticleStyle::Pixel
        }
    }

    fn burst(self) -> BurstParams {
        match self {
            ParticleStyle::Heart => BurstParams {
                size: 25..=40,
                lifetime: 30..=60,
            },
            ParticleStyle::Pixel => BurstParams {
                size: 2..=6,
                lifetime: 20..=40,
            },
        }
    }
}

fn jitter(channel: u8, rng: &mut Rng) -> u8 {
    (channel as i32 + rng.i32(-COLOR_JITTER..=COLOR_JITTER)).clamp(0, 255) as u8
}

pub struct Firework {
    x: f32,
    y: f32,
    target_x: f32,
    target_y: f32,
    vx: f32,
    vy: f32,
    color: Rgb,
    style: ParticleStyle,
    exploded: bool,
    particles: Vec<Particle>,
}

impl Firework {
    pub fn new(launch: (f32, f32), target: (f32, f32), color: Rgb, style: ParticleStyle) -> Self {
        Self {
            x: launch.0,
            y: launch.1,
            target_x: target.0,
            target_y: target.1,
            // Covers the whole distance in 50 ticks
            vx: (target.0 - launch.0) * LAUNCH_SPEED_FACTOR,
            vy: (target.1 - launch.1) * LAUNCH_SPEED_FACTOR,
            color,
            style,
            exploded: false,
            particles: Vec::new(),
        }
    }

    /// Steps the firework one tick.
    ///
    /// Returns `false` only once the shell has burst and every particle has died,
    /// at which point the firework can be dropped.
    pub fn advance(&mut self, rng: &mut Rng, sprites: &mut SpriteCache) -> bool {
        if !self.exploded {
            self.x += self.vx;
            self.y += self.vy;

            if (self.x - self.target_x).abs() < ARRIVAL_TOLERANCE
                && (self.y - self.target_y).abs() < ARRIVAL_TOLERANCE
            {
                self.explode(rng, sprites);
            }
        } else {
            self.particles.retain_mut(|particle| particle.advance());
        }

        !self.exploded || !self.particles.is_empty()
    }

    fn explode(&mut self, rng: &mut Rng, sprites: &mut SpriteCache) {
        self.exploded = true;

        let params = self.style.burst();
        let count = rng.usize(BURST_COUNT);
        self.particles.reserve(count);

        for _ in 0..count {
            let angle = rng.f32() * TAU;
            let speed = BURST_SPEED_MIN + rng.f32() * (BURST_SPEED_MAX - BURST_SPEED_MIN);
            let size = rng.u32(params.size.clone());
            let lifetime = rng.u32(params.lifetime.clone());
            let color = (
                jitter(self.color.0, rng),
                jitter(self.color.1, rng),
                jitter(self.color.2, rng),
            );

            let kind = match self.style {
                ParticleStyle::Heart => ParticleKind::Sprite(sprites.get(size)),
                ParticleStyle::Pixel => ParticleKind::Pixel,
            };

            self.particles.push(Particle::new(
                self.x,
                self.y,
                angle.cos() * speed,
                angle.sin() * speed,
                color,
                size,
                lifetime,
                kind,
            ));
        }

        debug!(
            "{:?} firework burst at ({:.0}, {:.0}) into {} particles",
            self.style, self.x, self.y, count
        );
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        if self.exploded {
            for particle in &self.particles {
                particle.render(surface);
            }
            return;
        }

        surface.fill_circle((self.x as i32, self.y as i32), HEAD_RADIUS, self.color);

        // Trail runs back along the direction of travel, dimming and shrinking
        for i in 0..TRAIL_STEPS {
            let step = i as f32 * 2.0;
            let trail_x = (self.x - self.vx * step) as i32;
            let trail_y = (self.y - self.vy * step) as i32;
            let fade = linear_fade(0.2 * i as f64);
            let color = (
                (self.color.0 as f64 * fade) as u8,
                (self.color.1 as f64 * fade) as u8,
                (self.color.2 as f64 * fade) as u8,
            );
            surface.fill_circle((trail_x, trail_y), (HEAD_RADIUS - i).max(1), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CANONICAL_SIZES, PLACEHOLDER_HEART};
    use crate::surface::testing::{Draw, Recorder};

    fn cache() -> SpriteCache {
        let mut cache = SpriteCache::new();
        cache.preload("no/such/heart.png", &CANONICAL_SIZES, PLACEHOLDER_HEART);
        cache
    }

    #[test]
    fn test_zero_distance_explodes_on_first_tick() {
        let mut rng = Rng::with_seed(1);
        let mut sprites = cache();
        let mut fw = Firework::new((100.0, 500.0), (100.0, 500.0), (255, 100, 100), ParticleStyle::Heart);

        assert!(!fw.exploded);
        assert!(fw.particles.is_empty());
        assert!(fw.advance(&mut rng, &mut sprites));
        assert!(fw.exploded);
        assert!(!fw.particles.is_empty());
    }

    #[test]
    fn test_burst_size_bounds() {
        let mut sprites = cache();
        for seed in 0..200 {
            let mut rng = Rng::with_seed(seed);
            let style = if seed % 2 == 0 { ParticleStyle::Heart } else { ParticleStyle::Pixel };
            let mut fw = Firework::new((0.0, 0.0), (0.0, 0.0), (100, 100, 255), style);
            fw.advance(&mut rng, &mut sprites);
            assert!(BURST_COUNT.contains(&fw.particles.len()));
        }
        // Heart sizes all fall within reach of a canonical sprite
        assert_eq!(sprites.sprite_count(), CANONICAL_SIZES.len());
    }

    #[test]
    fn test_burst_particle_ranges() {
        let mut sprites = cache();
        for style in [ParticleStyle::Heart, ParticleStyle::Pixel] {
            let params = style.burst();
            for seed in 0..50 {
                let mut rng = Rng::with_seed(seed);
                let mut fw = Firework::new((0.0, 0.0), (0.0, 0.0), (255, 0, 128), style);
                fw.advance(&mut rng, &mut sprites);
                for p in &fw.particles {
                    assert!(params.size.contains(&p.size));
                    assert!(params.lifetime.contains(&p.life));
                    assert_eq!(p.life, p.max_life);
                    assert!(p.color.0 >= 225);
                    assert!(p.color.1 <= 30);
                    assert!((98..=158).contains(&p.color.2));
                    let speed = (p.vx * p.vx + p.vy * p.vy).sqrt();
                    assert!((BURST_SPEED_MIN - 1e-3..=BURST_SPEED_MAX + 1e-3).contains(&speed));
                    match (&p.kind, style) {
                        (ParticleKind::Sprite(Some(_)), ParticleStyle::Heart) => {}
                        (ParticleKind::Pixel, ParticleStyle::Pixel) => {}
                        _ => panic!("particle kind does not match {:?}", style),
                    }
                }
            }
        }
    }

    #[test]
    fn test_advance_false_exactly_once_after_last_particle() {
        let mut rng = Rng::with_seed(42);
        let mut sprites = cache();
        let mut fw = Firework::new((300.0, 300.0), (300.0, 300.0), (255, 255, 100), ParticleStyle::Pixel);

        assert!(fw.advance(&mut rng, &mut sprites));
        let longest = fw.particles.iter().map(|p| p.life).max().unwrap();

        // Alive for every tick until the longest-lived particle runs out
        for _ in 1..longest {
            assert!(fw.advance(&mut rng, &mut sprites));
        }
        assert!(!fw.advance(&mut rng, &mut sprites));
        assert!(fw.particles.is_empty());
    }

    #[test]
    fn test_reaches_target_in_bounded_ticks() {
        let mut rng = Rng::with_seed(7);
        let mut sprites = cache();
        let mut fw = Firework::new((400.0, 600.0), (400.0, 300.0), (100, 255, 255), ParticleStyle::Pixel);

        let mut ticks = 0;
        while !fw.exploded {
            assert!(fw.advance(&mut rng, &mut sprites));
            ticks += 1;
            assert!(ticks <= 50, "still climbing after {} ticks", ticks);
        }
        // 6 units a tick closes the 290 units outside the tolerance on tick 49
        assert_eq!(ticks, 49);
        assert!((fw.y - 306.0).abs() < 1e-3);
    }

    #[test]
    fn test_position_frozen_after_burst() {
        let mut rng = Rng::with_seed(3);
        let mut sprites = cache();
        let mut fw = Firework::new((200.0, 200.0), (205.0, 195.0), (255, 255, 255), ParticleStyle::Pixel);
        fw.advance(&mut rng, &mut sprites);
        assert!(fw.exploded);
        let at = (fw.x, fw.y);
        for _ in 0..5 {
            fw.advance(&mut rng, &mut sprites);
        }
        assert_eq!((fw.x, fw.y), at);
    }

    #[test]
    fn test_render_shell_with_trail() {
        let fw = Firework::new((100.0, 200.0), (100.0, 100.0), (200, 100, 50), ParticleStyle::Pixel);
        let mut rec = Recorder::default();
        fw.render(&mut rec);

        // vy = -2, so each trail step sits 4 units further down
        assert_eq!(
            rec.calls,
            vec![
                Draw::Circle { center: (100, 200), radius: 3, color: (200, 100, 50) },
                Draw::Circle { center: (100, 200), radius: 3, color: (200, 100, 50) },
                Draw::Circle { center: (100, 204), radius: 2, color: (160, 80, 40) },
                Draw::Circle { center: (100, 208), radius: 1, color: (120, 60, 30) },
                Draw::Circle { center: (100, 212), radius: 1, color: (79, 39, 19) },
                Draw::Circle { center: (100, 216), radius: 1, color: (39, 19, 9) },
            ]
        );
    }

    #[test]
    fn test_trail_colors_truncate() {
        let fw = Firework::new((400.0, 400.0), (400.0, 100.0), (255, 255, 255), ParticleStyle::Heart);
        let mut rec = Recorder::default();
        fw.render(&mut rec);

        let colors: Vec<Rgb> = rec
            .calls
            .iter()
            .skip(1)
            .map(|call| match call {
                Draw::Circle { color, .. } => *color,
                other => panic!("unexpected draw {:?}", other),
            })
            .collect();
        assert_eq!(
            colors,
            vec![(255, 255, 255), (204, 204, 204), (153, 153, 153), (101, 101, 101), (50, 50, 50)]
        );
    }

    #[test]
    fn test_render_after_burst_draws_particles() {
        let mut rng = Rng::with_seed(11);
        let mut sprites = cache();
        let mut fw = Firework::new((50.0, 50.0), (50.0, 50.0), (255, 100, 255), ParticleStyle::Heart);
        fw.advance(&mut rng, &mut sprites);

        let mut rec = Recorder::default();
        fw.render(&mut rec);
        assert_eq!(rec.calls.len(), fw.particles.len());
        assert!(rec.calls.iter().all(|c| matches!(c, Draw::Blit { alpha: None, .. })));
    }
}
