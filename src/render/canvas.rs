use super::font::{glyph, text_width, ADVANCE, GLYPH_WIDTH};
use image::{Rgb, RgbImage};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GRID: Rgb<u8> = Rgb([225, 225, 225]);

pub enum Align {
    Left,
    Center,
    Right,
}

/// Thin drawing layer over an `RgbImage`. Coordinates outside the image are
/// clipped.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color);
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb<u8>) {
        for py in y..y + h {
            for px in x..x + w {
                self.put(px, py, color);
            }
        }
    }

    pub fn hline(&mut self, x0: i64, x1: i64, y: i64, color: Rgb<u8>) {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        self.fill_rect(lo, y, hi - lo + 1, 1, color);
    }

    pub fn vline(&mut self, x: i64, y0: i64, y1: i64, color: Rgb<u8>) {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        self.fill_rect(x, lo, 1, hi - lo + 1, color);
    }

    /// Bresenham line stamped with a square brush of side `thickness`.
    pub fn line(&mut self, from: (i64, i64), to: (i64, i64), thickness: i64, color: Rgb<u8>) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let offset = (thickness - 1) / 2;

        loop {
            self.fill_rect(x0 - offset, y0 - offset, thickness, thickness, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, align: Align, color: Rgb<u8>) {
        let width = text_width(text, scale) as i64;
        let start = match align {
            Align::Left => x,
            Align::Center => x - width / 2,
            Align::Right => x - width,
        };
        let scale = scale as i64;
        for (i, c) in text.chars().enumerate() {
            let origin = start + i as i64 * ADVANCE as i64 * scale;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if *bits & (1u8 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        self.fill_rect(
                            origin + col as i64 * scale,
                            y + row as i64 * scale,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_outside_bounds_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.put(-1, 2, BLACK);
        canvas.put(4, 0, BLACK);
        canvas.line((-5, -5), (10, 10), 1, BLACK);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(0, 0), BLACK);
        assert_eq!(*image.get_pixel(3, 3), BLACK);
        assert_eq!(*image.get_pixel(3, 0), WHITE);
    }

    #[test]
    fn line_reaches_both_endpoints() {
        let mut canvas = Canvas::new(20, 20);
        canvas.line((2, 17), (15, 3), 1, BLACK);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(2, 17), BLACK);
        assert_eq!(*image.get_pixel(15, 3), BLACK);
    }

    #[test]
    fn text_marks_pixels() {
        let mut canvas = Canvas::new(40, 20);
        canvas.text(1, 1, "I", 2, Align::Left, BLACK);
        let image = canvas.into_image();
        assert!(image.pixels().any(|p| *p == BLACK));
    }
}
