use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::naming::DEFAULT_NAME_LIMIT;

/// Emplacements de polices sondés dans l'ordre. Le premier fichier existant gagne.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "C:\\Windows\\Fonts\\SegoeUIBold.ttf",
    "C:\\Windows\\Fonts\\Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// Configuration complète d'une exécution, figée après résolution.
///
/// Défauts ← fichier TOML optionnel ← options CLI.
///
/// # Example
/// ```
/// use pt_core::config::ThumbConfig;
/// let config = ThumbConfig::default();
/// assert_eq!((config.width, config.height), (400, 300));
/// assert_eq!(config.sample, 2000);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ThumbConfig {
    // === Dataset ===
    /// Input CSV path.
    pub csv_path: PathBuf,
    /// Dossier de sortie des vignettes.
    pub out_dir: PathBuf,
    /// Colonne de nom préférée.
    pub name_col: String,
    /// Colonne image à écrire.
    pub image_col: String,
    /// Nombre de lignes à traiter. 0 = toutes.
    pub sample: usize,
    /// Réécrire le jeu de données avec la colonne image.
    pub update_csv: bool,

    // === Rendu ===
    pub width: u32,
    pub height: u32,
    /// Taille du titre en pixels (em).
    pub title_px: f32,
    /// Taille du sous-titre en pixels (em).
    pub subtitle_px: f32,
    /// Longueur max de la partie lisible du nom de fichier.
    pub name_limit: usize,
    /// Polices candidates, sondées dans l'ordre.
    pub font_candidates: Vec<PathBuf>,
}

impl Default for ThumbConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("products.csv"),
            out_dir: PathBuf::from("images"),
            name_col: "product_name".into(),
            image_col: "image".into(),
            sample: 2000,
            update_csv: false,
            width: 400,
            height: 300,
            title_px: 22.0,
            subtitle_px: 14.0,
            name_limit: DEFAULT_NAME_LIMIT,
            font_candidates: DEFAULT_FONT_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }
}

impl ThumbConfig {
    /// Clamp numeric fields so that every thumbnail stays renderable.
    /// Called after TOML merge and CLI overrides.
    pub fn clamp_all(&mut self) {
        if self.width == 0 || self.height == 0 {
            log::warn!(
                "Dimensions {}×{} ramenées à au moins 1 pixel",
                self.width,
                self.height
            );
        }
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self.title_px = self.title_px.clamp(4.0, 200.0);
        self.subtitle_px = self.subtitle_px.clamp(4.0, 200.0);
        self.name_limit = self.name_limit.max(1);
    }

    /// Fixe `sample` depuis une valeur signée : toute valeur ≤ 0 signifie « toutes ».
    ///
    /// # Example
    /// ```
    /// use pt_core::config::ThumbConfig;
    /// let mut config = ThumbConfig::default();
    /// config.set_sample(-1);
    /// assert_eq!(config.sample, 0);
    /// ```
    pub fn set_sample(&mut self, n: i64) {
        self.sample = usize::try_from(n).unwrap_or(0);
    }

    /// Nombre de lignes de tête à traiter pour un total donné.
    ///
    /// # Example
    /// ```
    /// use pt_core::config::ThumbConfig;
    /// let mut config = ThumbConfig::default();
    /// config.sample = 2;
    /// assert_eq!(config.rows_to_process(3), 2);
    /// config.sample = 0;
    /// assert_eq!(config.rows_to_process(3), 3);
    /// ```
    #[must_use]
    pub fn rows_to_process(&self, total: usize) -> usize {
        if self.sample == 0 {
            total
        } else {
            self.sample.min(total)
        }
    }
}

/// Structure TOML intermédiaire, toutes sections optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    dataset: Option<DatasetSection>,
    render: Option<RenderSection>,
}

#[derive(Deserialize)]
struct DatasetSection {
    csv: Option<PathBuf>,
    out: Option<PathBuf>,
    name_col: Option<String>,
    image_col: Option<String>,
    sample: Option<i64>,
    update_csv: Option<bool>,
}

#[derive(Deserialize)]
struct RenderSection {
    width: Option<u32>,
    height: Option<u32>,
    title_px: Option<f32>,
    subtitle_px: Option<f32>,
    name_limit: Option<usize>,
    font_candidates: Option<Vec<PathBuf>>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use pt_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ThumbConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse TOML content on top of the defaults.
///
/// # Errors
/// Returns an error on malformed TOML or mistyped values.
pub fn parse_config(content: &str) -> Result<ThumbConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = ThumbConfig::default();

    if let Some(d) = file.dataset {
        if let Some(v) = d.csv {
            config.csv_path = v;
        }
        if let Some(v) = d.out {
            config.out_dir = v;
        }
        if let Some(v) = d.name_col {
            config.name_col = v;
        }
        if let Some(v) = d.image_col {
            config.image_col = v;
        }
        if let Some(v) = d.sample {
            config.set_sample(v);
        }
        if let Some(v) = d.update_csv {
            config.update_csv = v;
        }
    }

    if let Some(r) = file.render {
        if let Some(v) = r.width {
            config.width = v;
        }
        if let Some(v) = r.height {
            config.height = v;
        }
        if let Some(v) = r.title_px {
            config.title_px = v;
        }
        if let Some(v) = r.subtitle_px {
            config.subtitle_px = v;
        }
        if let Some(v) = r.name_limit {
            config.name_limit = v;
        }
        if let Some(v) = r.font_candidates {
            config.font_candidates = v;
        }
    }

    config.clamp_all();
    Ok(config)
}
