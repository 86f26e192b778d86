use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::font::{self, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Style for a line of overlay text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    /// Pixels per font dot.
    pub scale: u32,
    pub color: [u8; 3],
}

/// Area a line of text occupies when drawn with its baseline-left corner at
/// `origin`. The area may extend past the frame; drawing clips it.
pub fn text_bounds(text: &str, origin: (i32, i32), scale: u32) -> Region {
    let scale = scale.max(1);
    let chars = text.chars().count() as u32;
    let width = if chars == 0 {
        0
    } else {
        (chars - 1) * GLYPH_ADVANCE * scale + GLYPH_WIDTH * scale
    };
    let height = GLYPH_HEIGHT * scale;
    Region::new(origin.0, origin.1 - height as i32, width as i32, height as i32)
}

/// Draws a single line of text into the frame, clipped to its bounds.
///
/// `origin` is the left end of the baseline, matching the convention of
/// placing labels by their bottom-left corner.
pub fn draw_text(frame: &mut Frame, text: &str, origin: (i32, i32), style: TextStyle) {
    let scale = style.scale.max(1);
    let bounds = text_bounds(text, origin, scale);
    let fw = frame.width() as i32;
    let fh = frame.height() as i32;
    let channels = frame.channels() as usize;
    let data = frame.data_mut();

    for (i, ch) in text.chars().enumerate() {
        let glyph = font::glyph(ch);
        let left = bounds.x + (i as u32 * GLYPH_ADVANCE * scale) as i32;
        for col in 0..GLYPH_WIDTH {
            for row in 0..GLYPH_HEIGHT {
                if !font::is_set(glyph, col, row) {
                    continue;
                }
                let x0 = left + (col * scale) as i32;
                let y0 = bounds.y + (row * scale) as i32;
                for y in y0.max(0)..(y0 + scale as i32).min(fh) {
                    for x in x0.max(0)..(x0 + scale as i32).min(fw) {
                        let idx = (y as usize * fw as usize + x as usize) * channels;
                        for (c, &v) in style.color.iter().enumerate().take(channels) {
                            data[idx + c] = v;
                        }
                    }
                }
            }
        }
    }
}
