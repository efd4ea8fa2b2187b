/// Rendu des vignettes produit.
///
/// Résolution de police (système ou bitmap intégrée), mesure/dessin de texte
/// derrière `TextFace`, et génération PNG des vignettes.

pub mod bitmap;
pub mod face;
pub mod font;
pub mod thumbnail;

pub use face::{TextExtent, TextFace};
pub use font::{FontSet, FontSource};
pub use thumbnail::ThumbnailRenderer;
