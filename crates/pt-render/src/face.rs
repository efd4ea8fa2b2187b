use std::sync::Arc;

use ab_glyph::{Font, FontVec, Glyph, GlyphId, PxScale, Rect, ScaleFont, point};
use image::{Rgb, RgbImage};

use crate::bitmap;

/// Dimensions de l'encre d'un texte, en pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// Mesure et dessin de texte pour une police à une taille donnée.
///
/// Implémenté par : `ScaledFace` (boîte englobante des contours),
/// `BitmapFace` (taille de cellule fixe). Le choix est fait une seule fois,
/// à la résolution de la police.
///
/// # Example
/// ```
/// use pt_render::face::{BitmapFace, TextFace};
/// let extent = BitmapFace.measure("Hi");
/// assert_eq!((extent.width, extent.height), (11, 8));
/// ```
pub trait TextFace {
    /// Taille de l'encre du texte, origine en (0, 0).
    fn measure(&self, text: &str) -> TextExtent;

    /// Dessine `text` avec `(x, y)` = coin haut-gauche de la ligne d'ascendante.
    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>);
}

/// Police vectorielle ab_glyph à une échelle fixe.
pub struct ScaledFace {
    font: Arc<FontVec>,
    scale: PxScale,
}

impl ScaledFace {
    /// `em_px` : taille em en pixels, convertie via unités/em de la police.
    #[must_use]
    pub fn new(font: Arc<FontVec>, em_px: f32) -> Self {
        let units_per_em = font.units_per_em().unwrap_or(1000.0);
        let scale = PxScale::from(em_px * font.height_unscaled() / units_per_em);
        Self { font, scale }
    }

    fn layout(&self, text: &str, x: f32, y: f32) -> Vec<Glyph> {
        let scaled = self.font.as_scaled(self.scale);
        let baseline = y + scaled.ascent();
        let mut caret = x;
        let mut prev: Option<GlyphId> = None;
        let mut glyphs = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(self.scale, point(caret, baseline)));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }
        glyphs
    }
}

impl TextFace for ScaledFace {
    fn measure(&self, text: &str) -> TextExtent {
        let mut ink: Option<Rect> = None;
        for glyph in self.layout(text, 0.0, 0.0) {
            if let Some(outline) = self.font.outline_glyph(glyph) {
                let b = outline.px_bounds();
                ink = Some(match ink {
                    None => b,
                    Some(acc) => Rect {
                        min: point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
                        max: point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
                    },
                });
            }
        }
        ink.map_or_else(TextExtent::default, |r| TextExtent {
            width: (r.max.x - r.min.x).max(0.0) as u32,
            height: (r.max.y - r.min.y).max(0.0) as u32,
        })
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        for glyph in self.layout(text, x as f32, y as f32) {
            if let Some(outline) = self.font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                outline.draw(|gx, gy, coverage| {
                    blend(
                        canvas,
                        bounds.min.x as i32 + gx as i32,
                        bounds.min.y as i32 + gy as i32,
                        color,
                        coverage,
                    );
                });
            }
        }
    }
}

/// Police bitmap intégrée 5×8, taille unique.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapFace;

impl TextFace for BitmapFace {
    fn measure(&self, text: &str) -> TextExtent {
        let n = text.chars().count() as u32;
        if n == 0 {
            return TextExtent::default();
        }
        TextExtent {
            width: n * bitmap::ADVANCE - 1,
            height: bitmap::GLYPH_HEIGHT,
        }
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        for (i, ch) in text.chars().enumerate() {
            let left = x + (i as u32 * bitmap::ADVANCE) as i32;
            for (col, bits) in bitmap::glyph(ch).into_iter().enumerate() {
                for row in 0..bitmap::GLYPH_HEIGHT {
                    if (bits >> row) & 1 == 1 {
                        blend(canvas, left + col as i32, y + row as i32, color, 1.0);
                    }
                }
            }
        }
    }
}

/// Mélange `color` sur le pixel (x, y) avec la couverture donnée. Hors canevas : ignoré.
fn blend(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0);
    let px = canvas.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in px.0.iter_mut().zip(color.0) {
        *dst = (f32::from(src) * alpha + f32::from(*dst) * (1.0 - alpha)).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_measure_scales_with_length() {
        assert_eq!(BitmapFace.measure(""), TextExtent::default());
        assert_eq!(BitmapFace.measure("Preview").width, 7 * 6 - 1);
    }

    #[test]
    fn bitmap_draw_clips_outside_canvas() {
        let mut canvas = RgbImage::new(4, 4);
        BitmapFace.draw(&mut canvas, -3, -3, "MM", Rgb([255, 255, 255]));
        BitmapFace.draw(&mut canvas, 10, 10, "MM", Rgb([255, 255, 255]));
        assert!(canvas.pixels().any(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn blend_mixes_channels() {
        let mut canvas = RgbImage::from_pixel(1, 1, Rgb([0, 0, 0]));
        blend(&mut canvas, 0, 0, Rgb([200, 100, 50]), 0.5);
        assert_eq!(canvas.get_pixel(0, 0).0, [100, 50, 25]);
    }
}
