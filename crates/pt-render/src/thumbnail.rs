use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{Rgb, RgbImage};
use pt_core::error::CoreError;

use crate::font::FontSet;

/// Titre tronqué à ce nombre de caractères.
pub const TITLE_MAX_CHARS: usize = 60;
/// Titre par défaut quand le texte est vide (avant nettoyage).
pub const TITLE_FALLBACK: &str = "Product";
/// Sous-titre fixe.
pub const SUBTITLE: &str = "Preview";

/// Décalage vers le haut du titre centré.
const TITLE_LIFT: i32 = 6;
/// Distance du sous-titre depuis le bas.
const SUBTITLE_FROM_BOTTOM: i32 = 34;

const TITLE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const SUBTITLE_COLOR: Rgb<u8> = Rgb([150, 170, 185]);

/// Teinte de base du dégradé et amplitude d'éclaircissement haut → bas.
const SHADE_BASE: u32 = 22;
const SHADE_SPAN: u32 = 18;

/// Niveau de gris de la ligne `y` pour une image de hauteur `height`.
///
/// # Example
/// ```
/// use pt_render::thumbnail::gradient_shade;
/// assert_eq!(gradient_shade(0, 300), 22);
/// assert_eq!(gradient_shade(299, 300), 39);
/// ```
#[must_use]
pub fn gradient_shade(y: u32, height: u32) -> u8 {
    (SHADE_BASE + (SHADE_SPAN * y) / height.max(1)) as u8
}

/// Titre affiché : `"Product"` si le texte est vide, puis nettoyé et
/// limité à 60 caractères. Un texte fait d'espaces donne un titre vide.
///
/// # Example
/// ```
/// use pt_render::thumbnail::title_text;
/// assert_eq!(title_text("  Mug  "), "Mug");
/// assert_eq!(title_text(""), "Product");
/// assert_eq!(title_text("   "), "");
/// ```
#[must_use]
pub fn title_text(text: &str) -> String {
    let text = if text.is_empty() { TITLE_FALLBACK } else { text };
    text.trim().chars().take(TITLE_MAX_CHARS).collect()
}

/// Centre une étendue dans une longueur, division plancher (peut être négatif).
fn centered(outer: u32, inner: u32) -> i32 {
    (i64::from(outer) - i64::from(inner)).div_euclid(2) as i32
}

/// Génère les vignettes produit : dégradé sombre, titre centré, sous-titre.
///
/// # Example
/// ```
/// use pt_render::font::FontSet;
/// use pt_render::thumbnail::ThumbnailRenderer;
/// let fonts = FontSet::builtin();
/// let renderer = ThumbnailRenderer::new(&fonts, 400, 300).unwrap();
/// let img = renderer.render("Desk Lamp");
/// assert_eq!(img.dimensions(), (400, 300));
/// ```
pub struct ThumbnailRenderer<'f> {
    fonts: &'f FontSet,
    width: u32,
    height: u32,
}

impl<'f> ThumbnailRenderer<'f> {
    /// # Errors
    /// Retourne `CoreError::InvalidDimensions` si une dimension est nulle.
    pub fn new(fonts: &'f FontSet, width: u32, height: u32) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            fonts,
            width,
            height,
        })
    }

    /// Rendu en mémoire.
    #[must_use]
    pub fn render(&self, text: &str) -> RgbImage {
        let (w, h) = (self.width, self.height);
        let mut img = RgbImage::from_fn(w, h, |_, y| {
            let s = gradient_shade(y, h);
            Rgb([s, s + 2, s + 4])
        });

        let title = title_text(text);
        let face = self.fonts.title();
        let extent = face.measure(&title);
        face.draw(
            &mut img,
            centered(w, extent.width),
            centered(h, extent.height) - TITLE_LIFT,
            &title,
            TITLE_COLOR,
        );

        let face = self.fonts.subtitle();
        let extent = face.measure(SUBTITLE);
        face.draw(
            &mut img,
            centered(w, extent.width),
            h as i32 - SUBTITLE_FROM_BOTTOM,
            SUBTITLE,
            SUBTITLE_COLOR,
        );

        img
    }

    /// Rendu puis écriture PNG à `path`.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier ne peut être créé ou encodé.
    pub fn render_to(&self, text: &str, path: &Path) -> Result<()> {
        save_png(&self.render(text), path)
    }
}

/// Écrit un PNG en compression maximale avec filtrage adaptatif.
///
/// # Errors
/// Retourne une erreur I/O ou d'encodage.
pub fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Impossible de créer {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    img.write_with_encoder(PngEncoder::new_with_quality(
        &mut writer,
        CompressionType::Best,
        FilterType::Adaptive,
    ))
    .with_context(|| format!("Échec de l'encodage PNG : {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Rgb<u8> = Rgb([22, 24, 26]);
    const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

    #[test]
    fn gradient_lightens_top_to_bottom() {
        let fonts = FontSet::builtin();
        let img = ThumbnailRenderer::new(&fonts, 40, 90).unwrap().render("");
        let mut prev = 0u8;
        for y in 0..90 {
            let shade = gradient_shade(y, 90);
            assert!(shade >= prev);
            prev = shade;
        }
        assert_eq!(*img.get_pixel(0, 0), BASE);
        assert_eq!(*img.get_pixel(39, 89), Rgb([39, 41, 43]));
    }

    #[test]
    fn title_is_truncated_by_chars() {
        let long = "é".repeat(80);
        assert_eq!(title_text(&long).chars().count(), TITLE_MAX_CHARS);
    }

    #[test]
    fn blank_title_draws_no_ink() {
        assert_eq!(title_text(" \t "), "");
        let fonts = FontSet::builtin();
        let img = ThumbnailRenderer::new(&fonts, 400, 300).unwrap().render("   ");
        assert!(img.pixels().all(|p| p.0 != TITLE_COLOR.0));
    }

    #[test]
    fn system_font_text_is_centered() {
        // Police système absente sur certaines machines : rien à vérifier.
        let path = std::path::PathBuf::from(SYSTEM_FONT);
        if !path.exists() {
            return;
        }
        let fonts = FontSet::from_file(&path, 22.0, 14.0).unwrap();
        let (w, h) = (400, 300);
        let img = ThumbnailRenderer::new(&fonts, w, h).unwrap().render("Desk Lamp");

        // Encre = tout pixel qui diffère du dégradé de sa ligne.
        let ink: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|&(_, y, p)| {
                let s = gradient_shade(y, h);
                p.0 != [s, s + 2, s + 4]
            })
            .map(|(x, y, _)| (x, y))
            .collect();
        let subtitle_top = h - SUBTITLE_FROM_BOTTOM as u32;
        let (title, subtitle): (Vec<_>, Vec<_>) =
            ink.into_iter().partition(|&(_, y)| y < h / 2 + 40);
        assert!(!title.is_empty());
        assert!(!subtitle.is_empty());

        let min_x = title.iter().map(|p| p.0).min().unwrap();
        let max_x = title.iter().map(|p| p.0).max().unwrap();
        let center = i64::from(min_x + max_x + 1) / 2;
        assert!((center - i64::from(w / 2)).abs() <= 1, "centre {center}");

        let min_y = title.iter().map(|p| p.1).min().unwrap();
        assert!(min_y > h / 2 - 40);

        assert!(subtitle.iter().all(|&(_, y)| (subtitle_top..h).contains(&y)));
    }

    #[test]
    fn builtin_title_is_centered_and_lifted() {
        let fonts = FontSet::builtin();
        let img = ThumbnailRenderer::new(&fonts, 400, 300).unwrap().render("HH");
        // "HH" = 11×8 px → x = 194, y = 146 - 6 = 140.
        let white: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 == TITLE_COLOR.0)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!white.is_empty());
        let min_x = white.iter().map(|p| p.0).min().unwrap();
        let max_x = white.iter().map(|p| p.0).max().unwrap();
        let min_y = white.iter().map(|p| p.1).min().unwrap();
        assert_eq!((min_x, max_x), (194, 204));
        assert_eq!(min_y, 140);
    }

    #[test]
    fn subtitle_sits_near_bottom() {
        let fonts = FontSet::builtin();
        let img = ThumbnailRenderer::new(&fonts, 400, 300).unwrap().render("X");
        let rows: Vec<u32> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 == SUBTITLE_COLOR.0)
            .map(|(_, y, _)| y)
            .collect();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|&y| (266..274).contains(&y)));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let fonts = FontSet::builtin();
        assert!(matches!(
            ThumbnailRenderer::new(&fonts, 0, 300),
            Err(CoreError::InvalidDimensions { width: 0, .. })
        ));
    }

    #[test]
    fn saved_png_decodes_with_same_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thumb.png");
        let fonts = FontSet::builtin();
        ThumbnailRenderer::new(&fonts, 120, 80)
            .unwrap()
            .render_to("Tea Pot", &path)
            .unwrap();
        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (120, 80));
        assert_eq!(*back.get_pixel(0, 0), BASE);
    }

    #[test]
    fn unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("thumb.png");
        let fonts = FontSet::builtin();
        let renderer = ThumbnailRenderer::new(&fonts, 10, 10).unwrap();
        assert!(renderer.render_to("x", &path).is_err());
    }
}
