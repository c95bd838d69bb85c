//! 5x7 bitmap font for the digits 0-9 (FPS counters, debug overlays)

use super::draw2d::PixelTarget;
use super::types::Color;

pub const GLYPH_WIDTH: i32 = 5;
pub const GLYPH_HEIGHT: i32 = 7;

/// One row per byte, bit 4 is the leftmost column
const DIGITS: [[u8; 7]; 10] = [
    [0b01110, 0b11011, 0b11011, 0b11011, 0b11011, 0b11011, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
    [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b10000, 0b11110, 0b00001, 0b00001, 0b11110],
    [0b01110, 0b10000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001, 0b01110],
];

/// Draw one digit with its top-left corner at (x, y). Each glyph pixel
/// becomes a `scale` x `scale` block. Digits outside 0-9 are ignored.
pub fn draw_digit<T: PixelTarget + ?Sized>(target: &mut T, digit: u32, x: i32, y: i32, color: Color, scale: i32) {
    let Some(rows) = DIGITS.get(digit as usize) else {
        return;
    };

    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                continue;
            }
            let px = x + col * scale;
            let py = y + row as i32 * scale;
            for sy in 0..scale {
                for sx in 0..scale {
                    target.set_pixel(px + sx, py + sy, color);
                }
            }
        }
    }
}

/// Draw a run of digits. Spaces advance the pen, anything else is skipped.
pub fn draw_string<T: PixelTarget + ?Sized>(
    target: &mut T,
    text: &str,
    x: i32,
    y: i32,
    color: Color,
    scale: i32,
    spacing: i32,
) {
    let advance = GLYPH_WIDTH * scale + spacing;
    let mut pen = x;
    for c in text.chars() {
        if let Some(d) = c.to_digit(10) {
            draw_digit(target, d, pen, y, color, scale);
            pen += advance;
        } else if c == ' ' {
            pen += advance;
        }
    }
}

/// Pixel width `draw_string` would cover (used for right alignment)
pub fn string_width(text: &str, scale: i32, spacing: i32) -> i32 {
    let count = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ' ')
        .count() as i32;
    if count == 0 {
        return 0;
    }
    count * GLYPH_WIDTH * scale + (count - 1) * spacing
}
