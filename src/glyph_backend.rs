//! A drawing backend wrapper that renders text with a built-in bitmap font.
//!
//! plotters is built without its `ttf` feature, so the stock text path can
//! measure strings but cannot rasterize them. `GlyphBackend` forwards every
//! primitive to the wrapped backend and draws text itself from a 5x7 glyph
//! table scaled to the requested font size. Rendering therefore never
//! depends on fonts being installed on the host.

use plotters_backend::{
    text_anchor, BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend,
    DrawingErrorKind, FontTransform,
};

const GLYPH_HEIGHT: usize = 7;
const SPACE_WIDTH: i32 = 3;

pub struct GlyphBackend<DB> {
    inner: DB,
}

impl<DB> GlyphBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for GlyphBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        let (width, height) = measure(text, glyph_scale(style.size()));
        Ok((width as u32, height as u32))
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let scale = glyph_scale(style.size());
        let (width, height) = measure(text, scale);

        let dx = match style.anchor().h_pos {
            text_anchor::HPos::Left => 0,
            text_anchor::HPos::Right => -width,
            text_anchor::HPos::Center => -width / 2,
        };
        let dy = match style.anchor().v_pos {
            text_anchor::VPos::Top => 0,
            text_anchor::VPos::Center => -height / 2,
            text_anchor::VPos::Bottom => -height,
        };

        let transform = style.transform();
        let mut cursor_x = dx;
        for ch in text.chars() {
            match glyph(ch) {
                Some(g) => {
                    for (row, pattern) in g.rows.iter().enumerate() {
                        for col in 0..g.width {
                            if pattern & (1 << (g.width - 1 - col)) != 0 {
                                self.fill_block(
                                    pos,
                                    (cursor_x + col as i32 * scale, dy + row as i32 * scale),
                                    scale,
                                    &transform,
                                    color,
                                )?;
                            }
                        }
                    }
                    cursor_x += scale * (g.width as i32 + 1);
                }
                None => cursor_x += scale * SPACE_WIDTH,
            }
        }
        Ok(())
    }
}

impl<DB: DrawingBackend> GlyphBackend<DB> {
    /// Fills a `scale` x `scale` block whose corner is `offset` from `origin`
    /// in unrotated text space.
    fn fill_block(
        &mut self,
        origin: BackendCoord,
        offset: (i32, i32),
        scale: i32,
        transform: &FontTransform,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        for dx in 0..scale {
            for dy in 0..scale {
                let (x, y) = transform.transform(offset.0 + dx, offset.1 + dy);
                self.inner.draw_pixel((origin.0 + x, origin.1 + y), color)?;
            }
        }
        Ok(())
    }
}

/// Pixel size of one glyph cell for a font of `size` pixels.
fn glyph_scale(size: f64) -> i32 {
    (size / GLYPH_HEIGHT as f64).round().max(1.0) as i32
}

/// Width and height in pixels of `text` drawn at `scale`.
fn measure(text: &str, scale: i32) -> (i32, i32) {
    let advance: i32 = text
        .chars()
        .map(|ch| glyph(ch).map_or(SPACE_WIDTH, |g| g.width as i32 + 1))
        .sum();
    // Drop the spacing column after the last glyph
    let width = (advance - 1).max(0) * scale;
    (width, GLYPH_HEIGHT as i32 * scale)
}

#[derive(Clone, Copy)]
struct Glyph {
    width: u8,
    rows: [u8; GLYPH_HEIGHT],
}

const fn g5(rows: [u8; GLYPH_HEIGHT]) -> Glyph {
    Glyph { width: 5, rows }
}

const fn g3(rows: [u8; GLYPH_HEIGHT]) -> Glyph {
    Glyph { width: 3, rows }
}

const fn g1(rows: [u8; GLYPH_HEIGHT]) -> Glyph {
    Glyph { width: 1, rows }
}

/// Hollow box drawn for characters the table has no glyph for.
const MISSING: Glyph = g5([0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111]);

/// Glyph for `ch`, or `None` for whitespace.
///
/// Accented Latin letters are drawn as their base letter. Anything else
/// outside the table is drawn as a box so no character silently vanishes.
fn glyph(ch: char) -> Option<Glyph> {
    if ch.is_whitespace() {
        return None;
    }
    Some(table_glyph(fold_accent(ch)).unwrap_or(MISSING))
}

fn fold_accent(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}

fn table_glyph(ch: char) -> Option<Glyph> {
    Some(match ch {
        'A' => g5([0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'B' => g5([0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
        'C' => g5([0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        'D' => g5([0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100]),
        'E' => g5([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => g5([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => g5([0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
        'H' => g5([0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'I' => g3([0b111, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
        'J' => g5([0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100]),
        'K' => g5([0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
        'L' => g5([0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => g5([0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => g5([0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001]),
        'O' => g5([0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => g5([0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'Q' => g5([0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101]),
        'R' => g5([0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => g5([0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'T' => g5([0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        'U' => g5([0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'V' => g5([0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b01010, 0b00100]),
        'W' => g5([0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001]),
        'X' => g5([0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
        'Y' => g5([0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100]),
        'Z' => g5([0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111]),
        '0' => g5([0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => g3([0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111]),
        '2' => g5([0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
        '3' => g5([0b11110, 0b00001, 0b00001, 0b00110, 0b00001, 0b00001, 0b11110]),
        '4' => g5([0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => g5([0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => g5([0b01110, 0b10001, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => g5([0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => g5([0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => g5([0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b10001, 0b01110]),
        '-' => g3([0b000, 0b000, 0b000, 0b111, 0b000, 0b000, 0b000]),
        '+' => g5([0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000]),
        '=' => g3([0b000, 0b000, 0b111, 0b000, 0b111, 0b000, 0b000]),
        '_' => g5([0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b11111]),
        '/' => g3([0b001, 0b001, 0b010, 0b010, 0b100, 0b100, 0b100]),
        '(' => g3([0b001, 0b010, 0b100, 0b100, 0b100, 0b010, 0b001]),
        ')' => g3([0b100, 0b010, 0b001, 0b001, 0b001, 0b010, 0b100]),
        '.' => g1([0, 0, 0, 0, 0, 0, 1]),
        ',' => g3([0b000, 0b000, 0b000, 0b000, 0b000, 0b010, 0b100]),
        ':' => g1([0, 1, 0, 0, 0, 1, 0]),
        '\'' => g1([1, 1, 0, 0, 0, 0, 0]),
        '!' => g1([1, 1, 1, 1, 1, 0, 1]),
        '?' => g5([0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100]),
        'a' => g5([0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111]),
        'b' => g5([0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110]),
        'c' => g5([0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110]),
        'd' => g5([0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111]),
        'e' => g5([0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110]),
        'f' => g5([0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000]),
        'g' => g5([0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
        'h' => g5([0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
        'i' => g3([0b010, 0b000, 0b110, 0b010, 0b010, 0b010, 0b111]),
        'j' => g3([0b001, 0b000, 0b011, 0b001, 0b001, 0b101, 0b010]),
        'k' => g5([0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010]),
        'l' => g3([0b110, 0b010, 0b010, 0b010, 0b010, 0b010, 0b111]),
        'm' => g5([0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001]),
        'n' => g5([0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001]),
        'o' => g5([0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110]),
        'p' => g5([0b00000, 0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000]),
        'q' => g5([0b00000, 0b01101, 0b10011, 0b10001, 0b01111, 0b00001, 0b00001]),
        'r' => g5([0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000]),
        's' => g5([0b00000, 0b00000, 0b01111, 0b10000, 0b01110, 0b00001, 0b11110]),
        't' => g5([0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110]),
        'u' => g5([0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101]),
        'v' => g5([0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'w' => g5([0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010]),
        'x' => g5([0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001]),
        'y' => g5([0b00000, 0b10001, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110]),
        'z' => g5([0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111]),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::prelude::*;
    use plotters::style::text_anchor::{HPos, Pos, VPos};

    #[test]
    fn measures_with_scale() {
        // "A1" = 5 + 1 spacing + 3 columns
        assert_eq!(measure("A1", 1), (9, 7));
        assert_eq!(measure("A1", 3), (27, 21));
        assert_eq!(measure("", 2), (0, 14));
    }

    #[test]
    fn scale_tracks_font_size() {
        assert_eq!(glyph_scale(7.0), 1);
        assert_eq!(glyph_scale(35.0), 5);
        assert_eq!(glyph_scale(1.0), 1);
    }

    #[test]
    fn case_is_preserved() {
        let upper = glyph('A').unwrap();
        let lower = glyph('a').unwrap();
        assert_ne!(upper.rows, lower.rows);
        assert_ne!(glyph('l').unwrap().rows, glyph('L').unwrap().rows);
    }

    #[test]
    fn accented_letters_use_their_base_letter() {
        assert_eq!(glyph('é').unwrap().rows, glyph('e').unwrap().rows);
        assert_eq!(glyph('Ü').unwrap().rows, glyph('U').unwrap().rows);
        assert_eq!(measure("café", 1), measure("cafe", 1));
    }

    #[test]
    fn characters_outside_the_table_are_boxed_not_dropped() {
        assert_eq!(glyph('東').unwrap().rows, MISSING.rows);
        assert!(glyph(' ').is_none());
        // Two boxes plus the spacing column between them
        assert_eq!(measure("東京", 1).0, 11);
    }

    #[test]
    fn right_bottom_anchor_ends_at_the_anchor_point() {
        let (w, h) = (40u32, 20u32);
        let mut buf = vec![255u8; (w * h * 3) as usize];
        {
            let root = GlyphBackend::new(BitMapBackend::with_buffer(&mut buf, (w, h)))
                .into_drawing_area();
            let style = ("sans-serif", 7)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Right, VPos::Bottom));
            root.draw(&Text::new("L", (30, 15), style)).unwrap();
            root.present().unwrap();
        }

        let dark = |x: u32, y: u32| buf[((y * w + x) * 3) as usize] < 128;
        // Bottom row of 'L' is solid and sits just above/left of the anchor
        assert!(dark(25, 14));
        assert!(dark(29, 14));
        assert!(!dark(30, 14));
        assert!(!dark(29, 15));
        // Left stem of 'L' reaches the top of the 7px cell
        assert!(dark(25, 8));
    }
}
