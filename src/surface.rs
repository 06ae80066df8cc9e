//! Drawing targets.
//!
//! Everything in the simulation draws through [`Surface`]. The concrete target is
//! [`Canvas`], a software framebuffer in world coordinates that the terminal
//! presenter later folds down onto character cells.

use image::RgbaImage;

pub type Rgb = (u8, u8, u8);

pub trait Surface {
    fn fill(&mut self, color: Rgb);
    fn fill_circle(&mut self, center: (i32, i32), radius: i32, color: Rgb);
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb);
    /// Draws `image` with its top-left corner at `(x, y)`.
    ///
    /// `alpha` scales the image's own per-pixel alpha. The image itself is never
    /// modified, so shared sprites can be faded independently.
    fn blit(&mut self, image: &RgbaImage, x: i32, y: i32, alpha: Option<u8>);
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub color: Rgb,
}

pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    labels: Vec<Label>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![(0, 0, 0); width * height],
            labels: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, color: Rgb) {
        if self.in_bounds(x, y) {
            let idx = y as usize * self.width + x as usize;
            self.pixels[idx] = color;
        }
    }
}

#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    ((src as u16 * alpha + dst as u16 * (255 - alpha) + 127) / 255) as u8
}

impl Surface for Canvas {
    fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
        self.labels.clear();
    }

    fn fill_circle(&mut self, center: (i32, i32), radius: i32, color: Rgb) {
        if radius < 1 {
            return;
        }
        let r2 = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.put(center.0 + dx, center.1 + dy, color);
                }
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i32).min(self.width as i32);
        let y1 = (y + h as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for py in y0..y1 {
            let row = py as usize * self.width;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    fn blit(&mut self, image: &RgbaImage, x: i32, y: i32, alpha: Option<u8>) {
        let global = alpha.unwrap_or(255) as u16;
        if global == 0 {
            return;
        }
        for (ix, iy, px) in image.enumerate_pixels() {
            let tx = x + ix as i32;
            let ty = y + iy as i32;
            if !self.in_bounds(tx, ty) {
                continue;
            }
            let [r, g, b, a] = px.0;
            let a = a as u16 * global / 255;
            if a == 0 {
                continue;
            }
            let idx = ty as usize * self.width + tx as usize;
            let dst = self.pixels[idx];
            self.pixels[idx] = (
                blend_channel(r, dst.0, a),
                blend_channel(g, dst.1, a),
                blend_channel(b, dst.2, a),
            );
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb) {
        self.labels.push(Label {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }
}
