use std::f32::consts::PI;
use std::path::Path;

use image::imageops;
use image::{Rgba, RgbaImage};
use log::warn;

use crate::config::{ANIMATION_DURATION_MS, BOUNCE_AMPLITUDE, FACE_SIZE, PEAK_SCALE, PLACEHOLDER_FACE, WHITE};
use crate::easing::ease_out_bounce;
use crate::sprites::{load_image, scale};
use crate::surface::Surface;

/// State of a character's hop-and-flip animation.
struct Animation {
    is_animating: bool,
    start_ms: u64,
    duration_ms: u64,
    target_scale: f32,
    bounce_amp: f32,
    flipped: bool,
    quip: Option<&'static str>,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            is_animating: false,
            start_ms: 0,
            duration_ms: ANIMATION_DURATION_MS,
            target_scale: PEAK_SCALE,
            bounce_amp: BOUNCE_AMPLITUDE,
            flipped: false,
            quip: None,
        }
    }
}

pub struct Character {
    name: &'static str,
    position: (i32, i32),
    base: RgbaImage,
    current: RgbaImage,
    bounce: f32,
    // Horizontal offset of the speech text from the face
    quip_offset: i32,
    animation: Animation,
}

impl Character {
    pub fn new(base: RgbaImage, position: (i32, i32), name: &'static str, quip_offset: i32) -> Self {
        Self {
            name,
            position,
            current: base.clone(),
            base,
            bounce: 0.0,
            quip_offset,
            animation: Animation::default(),
        }
    }

    /// Loads the face at `path` scaled to the standard face size. A face that
    /// cannot be read is replaced by a flat red square.
    pub fn load(
        path: impl AsRef<Path>,
        position: (i32, i32),
        name: &'static str,
        flipped: bool,
        quip_offset: i32,
    ) -> Self {
        let base = match load_image(path.as_ref()) {
            Ok(img) => {
                let img = scale(&img, FACE_SIZE, FACE_SIZE);
                if flipped { imageops::flip_horizontal(&img) } else { img }
            }
            Err(e) => {
                warn!("{}; {} gets a placeholder face", e, name);
                RgbaImage::from_pixel(FACE_SIZE, FACE_SIZE, Rgba(PLACEHOLDER_FACE))
            }
        };
        Self::new(base, position, name, quip_offset)
    }

    /// Starts a hop unless one is already running. Each hop turns the face around.
    pub fn start_animation(&mut self, now_ms: u64, quip: Option<&'static str>) {
        if self.animation.is_animating {
            return;
        }
        self.animation.is_animating = true;
        self.animation.start_ms = now_ms;
        self.animation.flipped = !self.animation.flipped;
        self.animation.quip = quip;
    }

    fn oriented(&self) -> RgbaImage {
        if self.animation.flipped {
            imageops::flip_horizontal(&self.base)
        } else {
            self.base.clone()
        }
    }

    pub fn update(&mut self, now_ms: u64) {
        if !self.animation.is_animating {
            return;
        }

        let elapsed = now_ms.saturating_sub(self.animation.start_ms);
        let progress = (elapsed as f32 / self.animation.duration_ms as f32).min(1.0);

        if progress >= 1.0 {
            self.animation.is_animating = false;
            self.bounce = 0.0;
            self.current = self.oriented();
            return;
        }

        // Starts enlarged and settles back to normal size with a bounce
        let eased = ease_out_bounce(progress);
        let scale_factor = 1.0 + (self.animation.target_scale - 1.0) * (1.0 - eased);
        let height = (progress * PI).sin() * self.animation.bounce_amp;

        let img = self.oriented();
        self.current = if scale_factor != 1.0 {
            let (w, h) = img.dimensions();
            let w = (w as f32 * scale_factor) as u32;
            let h = (h as f32 * scale_factor) as u32;
            scale(&img, w, h)
        } else {
            img
        };
        // Up is negative y
        self.bounce = -height;
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = self.current.dimensions();
        let slot = FACE_SIZE as i32;
        let draw_x = self.position.0 - (w as i32 - slot) / 2;
        let draw_y = (self.position.1 as f32 + self.bounce) as i32 - (h as i32 - slot) / 2;

        surface.blit(&self.current, draw_x, draw_y, None);
        surface.draw_text(self.position.0, draw_y - 40, self.name, WHITE);

        if self.animation.is_animating {
            if let Some(quip) = self.animation.quip {
                surface.draw_text(draw_x + self.quip_offset, draw_y, quip, WHITE);
            }
        }
    }
}
