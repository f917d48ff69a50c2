use crate::error::WheelError;
use crate::math::{edge_function, Point};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use std::io::{self, Write};
use std::str::FromStr;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

/// 24-bit color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Scales every channel by `intensity`, clamped to the channel range
    pub fn shade(self, intensity: f64) -> Rgb {
        let scale = |c: u8| (c as f64 * intensity).clamp(0.0, 255.0) as u8;
        Rgb::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Mixes `other` over `self` with the given opacity
    pub fn blend(self, other: Rgb, alpha: f64) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - alpha) + b as f64 * alpha).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    fn to_crossterm(self) -> Color {
        Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

impl FromStr for Rgb {
    type Err = WheelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WheelError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Text placed on top of the pixels of one character cell
#[derive(Clone, Debug, PartialEq)]
enum CellText {
    Glyph { text: String, fg: Rgb, bold: bool },
    /// Covered by the right half of a wide glyph to its left
    Covered,
}

/// Pixel buffer with two pixels per terminal cell plus a text layer
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    text: Vec<Option<CellText>>,
}

impl Canvas {
    /// Creates a canvas covering `cols × rows` terminal cells
    pub fn new(cols: usize, rows: usize, background: Rgb) -> Self {
        Canvas {
            width: cols,
            height: rows * 2,
            pixels: vec![background; cols * rows * 2],
            text: vec![None; cols * rows],
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: isize, y: isize, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Runs `shader` on every pixel whose center lies within `radius` of `center`.
    /// The shader receives the pixel center and its current color.
    pub fn shade_disc(
        &mut self,
        center: Point,
        radius: f64,
        mut shader: impl FnMut(Point, Rgb) -> Rgb,
    ) {
        if radius <= 0.0 {
            return;
        }
        let min_y = (center.y - radius).floor().max(0.0) as usize;
        let max_y = ((center.y + radius).ceil().max(0.0) as usize).min(self.height);
        let min_x = (center.x - radius).floor().max(0.0) as usize;
        let max_x = ((center.x + radius).ceil().max(0.0) as usize).min(self.width);
        let radius_sq = radius * radius;
        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let (dx, dy) = (p.x - center.x, p.y - center.y);
                if dx * dx + dy * dy <= radius_sq {
                    let offset = y * self.width + x;
                    self.pixels[offset] = shader(p, self.pixels[offset]);
                }
            }
        }
    }

    /// Fills a triangle regardless of its winding
    pub fn fill_triangle(&mut self, v0: Point, v1: Point, v2: Point, color: Rgb) {
        let area = edge_function(&v0, &v1, &v2);
        if area == 0.0 {
            return;
        }

        // Compute bounding box of the triangle
        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as usize;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min(self.width as f64 - 1.0);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as usize;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min(self.height as f64 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }

        for y in min_y..=max_y as usize {
            for x in min_x..=max_x as usize {
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                // Normalizing by the signed area makes both windings positive inside
                let w0 = edge_function(&v1, &v2, &p) / area;
                let w1 = edge_function(&v2, &v0, &p) / area;
                let w2 = edge_function(&v0, &v1, &p) / area;
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.pixels[y * self.width + x] = color;
                }
            }
        }
    }

    /// Draws a line between two points using Bresenham's algorithm
    pub fn draw_line(&mut self, from: Point, to: Point, color: Rgb) {
        let (mut x0, mut y0, x1, y1) = (
            from.x.round() as isize,
            from.y.round() as isize,
            to.x.round() as isize,
            to.y.round() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            self.set_pixel(x0, y0, color);
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

    /// Writes `text` starting at a cell; cells past the right edge are dropped
    pub fn put_text(&mut self, col: usize, row: usize, text: &str, fg: Rgb, bold: bool) {
        let cols = self.width;
        if row >= self.height / 2 {
            return;
        }
        let mut col = col;
        for ch in text.chars() {
            let cell = ch.to_string();
            let width = glyph_width(&cell);
            if width == 0 {
                // Attach combining marks and variation selectors to the previous glyph
                if let Some(Some(CellText::Glyph { text, .. })) = col
                    .checked_sub(glyph_span_back(&self.text, row * cols + col))
                    .and_then(|c| self.text.get_mut(row * cols + c))
                {
                    text.push(ch);
                }
                continue;
            }
            if col + width > cols {
                break;
            }
            self.text[row * cols + col] = Some(CellText::Glyph {
                text: cell,
                fg,
                bold,
            });
            for covered in 1..width {
                self.text[row * cols + col + covered] = Some(CellText::Covered);
            }
            col += width;
        }
    }

    /// Writes `text` centered on the cell containing pixel `(x, y)`
    pub fn put_text_centered_at(&mut self, at: Point, text: &str, fg: Rgb) {
        if at.x < 0.0 || at.y < 0.0 {
            return;
        }
        let width = glyph_width(text);
        let col = (at.x as usize).saturating_sub(width / 2);
        self.put_text(col, at.y as usize / 2, text, fg, false);
    }

    /// Writes `text` centered horizontally on a row
    pub fn put_text_centered(&mut self, row: usize, text: &str, fg: Rgb, bold: bool) {
        let col = self.width.saturating_sub(glyph_width(text)) / 2;
        self.put_text(col, row, text, fg, bold);
    }

    /// Text written on a row, covered cells skipped and blank cells as spaces
    #[cfg(test)]
    pub fn row_text(&self, row: usize) -> String {
        self.text[row * self.width..(row + 1) * self.width]
            .iter()
            .filter_map(|cell| match cell {
                Some(CellText::Glyph { text, .. }) => Some(text.as_str()),
                Some(CellText::Covered) => None,
                None => Some(" "),
            })
            .collect()
    }

    /// Queues the whole canvas to `out` starting at the top left cell
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rows = self.height / 2;
        let mut colors: Option<(Rgb, Rgb)> = None;
        for row in 0..rows {
            queue!(out, MoveTo(0, row as u16))?;
            for col in 0..self.width {
                let top = self.pixels[row * 2 * self.width + col];
                let bottom = self.pixels[(row * 2 + 1) * self.width + col];
                match &self.text[row * self.width + col] {
                    Some(CellText::Covered) => continue,
                    Some(CellText::Glyph { text, fg, bold }) => {
                        let bg = top.blend(bottom, 0.5);
                        queue!(
                            out,
                            SetForegroundColor(fg.to_crossterm()),
                            SetBackgroundColor(bg.to_crossterm())
                        )?;
                        if *bold {
                            queue!(
                                out,
                                SetAttribute(Attribute::Bold),
                                Print(text),
                                SetAttribute(Attribute::NormalIntensity)
                            )?;
                        } else {
                            queue!(out, Print(text))?;
                        }
                        colors = Some((*fg, bg));
                    }
                    None => {
                        if colors != Some((top, bottom)) {
                            queue!(
                                out,
                                SetForegroundColor(top.to_crossterm()),
                                SetBackgroundColor(bottom.to_crossterm())
                            )?;
                            colors = Some((top, bottom));
                        }
                        queue!(out, Print(HALF_BLOCK))?;
                    }
                }
            }
        }
        queue!(out, ResetColor)?;
        Ok(())
    }
}

/// Distance back from `index` to the cell holding the glyph that owns it
fn glyph_span_back(text: &[Option<CellText>], index: usize) -> usize {
    let mut back = 1;
    while index >= back && matches!(text[index - back], Some(CellText::Covered)) {
        back += 1;
    }
    back
}

/// Approximate number of terminal columns a string occupies.
/// Emoji and other pictographs count double; joiners and variation
/// selectors count zero.
pub fn glyph_width(text: &str) -> usize {
    text.chars()
        .map(|ch| match ch as u32 {
            0x200B..=0x200F | 0xFE00..=0xFE0F | 0x0300..=0x036F => 0,
            0x1F000..=0x1FAFF | 0x2E80..=0x9FFF | 0xAC00..=0xD7A3 | 0xFF00..=0xFF60 => 2,
            _ => 1,
        })
        .sum()
}
