// Bitmap text - Draws short ASCII labels onto raster surfaces with an 8x8 font
use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgba, RgbaImage};

pub const GLYPH_SIZE: u32 = 8;

/// Horizontal advance of one character at `scale`.
pub fn advance(scale: u32) -> u32 {
    GLYPH_SIZE * scale.max(1)
}

pub fn text_width(text: &str, scale: u32) -> u32 {
    (text.chars().count() as u32).saturating_mul(advance(scale))
}

/// Draw `text` with its top-left corner at (x, y).
///
/// Pixels falling outside the image are clipped. Characters without a
/// basic glyph are drawn as `?`.
pub fn draw_text(image: &mut RgbaImage, x: u32, y: u32, text: &str, scale: u32, color: Rgba<u8>) {
    let scale = scale.max(1);
    let step = advance(scale);

    for (i, ch) in text.chars().enumerate() {
        let left = x.saturating_add((i as u32).saturating_mul(step));
        if left >= image.width() {
            break;
        }
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);

        for (row, bits) in glyph.into_iter().enumerate() {
            let top = y.saturating_add(row as u32 * scale);
            // Bit 0 is the leftmost pixel of the row.
            for col in 0..GLYPH_SIZE {
                if bits & (1u8 << col) != 0 {
                    fill_block(image, left + col * scale, top, scale, color);
                }
            }
        }
    }
}

fn fill_block(image: &mut RgbaImage, x: u32, y: u32, size: u32, color: Rgba<u8>) {
    for py in y..y.saturating_add(size).min(image.height()) {
        for px in x..x.saturating_add(size).min(image.width()) {
            image.put_pixel(px, py, color);
        }
    }
}
