use std::path::PathBuf;

use clap::Parser;
use pt_core::config::ThumbConfig;

/// prodthumb — vignettes PNG de remplacement pour un catalogue produit CSV.
///
/// Les options absentes reprennent la valeur du fichier de config, sinon le défaut.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier CSV d'entrée. Défaut : products.csv.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Dossier de sortie des vignettes. Défaut : images.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Colonne de nom préférée. Défaut : product_name.
    #[arg(long, value_name = "NAME")]
    pub name_col: Option<String>,

    /// Colonne image à écrire. Défaut : image.
    #[arg(long, value_name = "NAME")]
    pub image_col: Option<String>,

    /// Lignes à traiter (0 ou négatif = toutes). Défaut : 2000.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub sample: Option<i64>,

    /// Largeur des vignettes. Défaut : 400.
    #[arg(long = "w", value_name = "N")]
    pub width: Option<u32>,

    /// Hauteur des vignettes. Défaut : 300.
    #[arg(long = "h", value_name = "N")]
    pub height: Option<u32>,

    /// Écrire products_with_images.csv avec la colonne image.
    #[arg(long, default_value_t = false)]
    pub update_csv: bool,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Applique les options explicites par-dessus `config`.
    pub fn apply_overrides(&self, config: &mut ThumbConfig) {
        if let Some(ref v) = self.csv {
            config.csv_path.clone_from(v);
        }
        if let Some(ref v) = self.out {
            config.out_dir.clone_from(v);
        }
        if let Some(ref v) = self.name_col {
            config.name_col.clone_from(v);
        }
        if let Some(ref v) = self.image_col {
            config.image_col.clone_from(v);
        }
        if let Some(v) = self.sample {
            config.set_sample(v);
        }
        if let Some(v) = self.width {
            config.width = v;
        }
        if let Some(v) = self.height {
            config.height = v;
        }
        if self.update_csv {
            config.update_csv = true;
        }
        config.clamp_all();
    }
}
