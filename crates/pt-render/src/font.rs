use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::FontVec;
use anyhow::{Context, Result};
use pt_core::error::CoreError;

use crate::face::{BitmapFace, ScaledFace, TextFace};

/// Origine de la police effectivement utilisée.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// Police système chargée depuis ce chemin.
    File(PathBuf),
    /// Police bitmap intégrée (aucune police système trouvée).
    Builtin,
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Builtin => f.write_str("police bitmap intégrée"),
        }
    }
}

/// Premier chemin existant parmi `candidates`.
///
/// # Example
/// ```
/// use pt_render::font::find_font;
/// use std::path::PathBuf;
/// assert!(find_font(&[PathBuf::from("/nonexistent/Font.ttf")]).is_none());
/// ```
#[must_use]
pub fn find_font(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|path| path.exists())
}

/// Faces titre et sous-titre, résolues une fois par exécution.
///
/// Immuable après construction ; passée par référence au rendu.
pub struct FontSet {
    title: Box<dyn TextFace>,
    subtitle: Box<dyn TextFace>,
    source: FontSource,
}

impl FontSet {
    /// Sonde `candidates` ; charge la première police trouvée aux deux tailles,
    /// sinon se replie sur la police bitmap intégrée.
    ///
    /// # Errors
    /// Retourne une erreur si la police trouvée est illisible ou invalide.
    pub fn resolve(candidates: &[PathBuf], title_px: f32, subtitle_px: f32) -> Result<Self> {
        match find_font(candidates) {
            Some(path) => Self::from_file(path, title_px, subtitle_px),
            None => {
                log::info!("Aucune police système trouvée, repli sur la police intégrée");
                Ok(Self::builtin())
            }
        }
    }

    /// # Errors
    /// Retourne une erreur si le fichier est illisible ou n'est pas une police valide.
    pub fn from_file(path: &Path, title_px: f32, subtitle_px: f32) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        let font = FontVec::try_from_vec(data).map_err(|e| CoreError::Font {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let font = Arc::new(font);
        log::info!("Police : {} ({title_px}px / {subtitle_px}px)", path.display());
        Ok(Self {
            title: Box::new(ScaledFace::new(Arc::clone(&font), title_px)),
            subtitle: Box::new(ScaledFace::new(font, subtitle_px)),
            source: FontSource::File(path.to_path_buf()),
        })
    }

    /// Police bitmap intégrée, même taille pour le titre et le sous-titre.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            title: Box::new(BitmapFace),
            subtitle: Box::new(BitmapFace),
            source: FontSource::Builtin,
        }
    }

    #[must_use]
    pub fn title(&self) -> &dyn TextFace {
        self.title.as_ref()
    }

    #[must_use]
    pub fn subtitle(&self) -> &dyn TextFace {
        self.subtitle.as_ref()
    }

    #[must_use]
    pub fn source(&self) -> &FontSource {
        &self.source
    }
}

impl fmt::Debug for FontSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSet")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
