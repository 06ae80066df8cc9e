//! Folds the world-sized canvas down onto terminal cells.
//!
//! Every cell shows two vertically stacked pixels with the lower half block
//! glyph: the background color is the top pixel and the foreground color the
//! bottom one. Text labels replace the glyph in the cells they cover.

use std::io::Write;

use crate::surface::{Canvas, Rgb};

const HALF_BLOCK: &str = "▄";

#[inline]
fn luma(c: Rgb) -> u32 {
    2 * c.0 as u32 + 5 * c.1 as u32 + c.2 as u32
}

pub struct Presenter {
    cols: usize,
    rows: usize,
    output_buf: Vec<u8>,
    overlay: Vec<Option<(char, Rgb)>>,
}

impl Presenter {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            output_buf: Vec::with_capacity(cols * rows * 25),
            overlay: vec![None; cols * rows],
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        *self = Self::new(cols, rows);
    }

    /// Brightest canvas pixel inside the world rectangle covered by one half cell.
    fn sample(&self, canvas: &Canvas, col: usize, half_row: usize) -> Rgb {
        let (w, h) = (canvas.width(), canvas.height());
        let half_rows = self.rows * 2;

        let x0 = (col * w / self.cols).min(w - 1);
        let x1 = ((col + 1) * w / self.cols).clamp(x0 + 1, w);
        let y0 = (half_row * h / half_rows).min(h - 1);
        let y1 = ((half_row + 1) * h / half_rows).clamp(y0 + 1, h);

        let mut best = canvas.pixel(x0, y0);
        for y in y0..y1 {
            for x in x0..x1 {
                let p = canvas.pixel(x, y);
                if luma(p) > luma(best) {
                    best = p;
                }
            }
        }
        best
    }

    fn place_labels(&mut self, canvas: &Canvas) {
        self.overlay.fill(None);
        if self.overlay.is_empty() {
            return;
        }
        let (w, h) = (canvas.width() as i64, canvas.height() as i64);
        for label in canvas.labels() {
            if label.y < 0 || label.y as i64 >= h {
                continue;
            }
            let row = (label.y as i64 * self.rows as i64 / h) as usize;
            let start = label.x as i64 * self.cols as i64 / w;
            for (i, ch) in label.text.chars().enumerate() {
                let col = start + i as i64;
                if col < 0 {
                    continue;
                }
                if col >= self.cols as i64 {
                    break;
                }
                self.overlay[row * self.cols + col as usize] = Some((ch, label.color));
            }
        }
    }

    /// Encodes the canvas as one full-screen frame of escape sequences.
    pub fn compose(&mut self, canvas: &Canvas) -> std::io::Result<&[u8]> {
        self.output_buf.clear();
        if self.cols == 0 || self.rows == 0 {
            return Ok(&self.output_buf);
        }
        self.place_labels(canvas);

        let mut buf = std::mem::take(&mut self.output_buf);
        buf.clear();
        buf.extend_from_slice(b"\x1b[H");

        let mut prev_bg: Option<Rgb> = None;
        let mut prev_fg: Option<Rgb> = None;

        for row in 0..self.rows {
            for col in 0..self.cols {
                let top = self.sample(canvas, col, row * 2);
                let (fg, glyph) = match self.overlay[row * self.cols + col] {
                    Some((ch, color)) => (color, Some(ch)),
                    None => (self.sample(canvas, col, row * 2 + 1), None),
                };

                if prev_bg != Some(top) {
                    write!(buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_bg = Some(top);
                }
                if prev_fg != Some(fg) {
                    write!(buf, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
                    prev_fg = Some(fg);
                }

                match glyph {
                    Some(ch) => write!(buf, "{}", ch)?,
                    None => buf.extend_from_slice(HALF_BLOCK.as_bytes()),
                }
            }
            buf.extend_from_slice(b"\x1b[0m");
            prev_bg = None;
            prev_fg = None;
            if row + 1 < self.rows {
                buf.extend_from_slice(b"\r\n");
            }
        }

        self.output_buf = buf;
        Ok(&self.output_buf)
    }

    pub fn present(&mut self, canvas: &Canvas, out: &mut impl Write) -> std::io::Result<()> {
        let frame = self.compose(canvas)?;
        out.write_all(frame)?;
        out.flush()
    }
}
