use std::path::Path;

use anyhow::{Context, Result};
use pt_core::config::ThumbConfig;
use pt_core::naming::{resolve_display_name, thumbnail_filename};
use pt_dataset::{read_dataset, write_dataset};
use pt_render::font::FontSet;
use pt_render::thumbnail::ThumbnailRenderer;

/// Bilan d'une exécution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lignes lues dans le CSV.
    pub total: usize,
    /// Lignes de tête traitées.
    pub selected: usize,
    /// Vignettes générées.
    pub rendered: usize,
    /// Vignettes déjà présentes, non régénérées.
    pub skipped: usize,
}

/// Crée le dossier de sortie (et ses parents) si besoin.
///
/// # Errors
/// Retourne une erreur si le dossier ne peut être créé.
pub fn prepare_output_dir(config: &ThumbConfig) -> Result<()> {
    std::fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("Impossible de créer {}", config.out_dir.display()))
}

/// Chemin relatif stocké dans la colonne image, séparateurs `/`.
fn image_path_cell(out_dir: &Path, filename: &str) -> String {
    out_dir.join(filename).to_string_lossy().replace('\\', "/")
}

/// Exécute le pipeline complet : lecture, vignettes, réécriture optionnelle.
///
/// `updated_csv` : destination du jeu de données réécrit (si `update_csv`).
///
/// # Errors
/// Toute erreur de lecture, de rendu ou d'écriture interrompt l'exécution ;
/// les vignettes déjà écrites restent en place.
pub fn run(config: &ThumbConfig, fonts: &FontSet, updated_csv: &Path) -> Result<RunSummary> {
    let mut dataset = read_dataset(&config.csv_path)?;

    let total = dataset.len();
    println!("Found {total} rows in {}", config.csv_path.display());

    let selected = config.rows_to_process(total);
    println!(
        "Generating thumbnails for {selected} rows -> '{}'",
        config.out_dir.display()
    );

    let renderer = ThumbnailRenderer::new(fonts, config.width, config.height)?;
    let mut summary = RunSummary {
        total,
        selected,
        ..RunSummary::default()
    };

    for record in dataset.records.iter_mut().take(selected) {
        let name = resolve_display_name(record, &config.name_col).to_owned();
        let filename = thumbnail_filename(&name, config.name_limit);
        let target = config.out_dir.join(&filename);

        if target.exists() {
            log::debug!("Déjà présente : {}", target.display());
            summary.skipped += 1;
        } else {
            renderer.render_to(&name, &target)?;
            log::debug!("Générée : {}", target.display());
            summary.rendered += 1;
        }

        record.set(&config.image_col, image_path_cell(&config.out_dir, &filename));
    }

    if config.update_csv {
        println!("Writing: {}", updated_csv.display());
        write_dataset(updated_csv, &dataset, &config.image_col)?;
    }

    log::info!(
        "{} générée(s), {} ignorée(s) sur {} ligne(s)",
        summary.rendered,
        summary.skipped,
        summary.total
    );
    println!("Done.");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_dataset::parse_dataset;
    use std::path::PathBuf;

    struct Fixture {
        _dir: tempfile::TempDir,
        config: ThumbConfig,
        updated: PathBuf,
    }

    fn fixture(csv: &str, sample: usize) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("products.csv");
        std::fs::write(&csv_path, csv).unwrap();
        let config = ThumbConfig {
            csv_path,
            out_dir: dir.path().join("images"),
            sample,
            update_csv: true,
            width: 80,
            height: 60,
            ..ThumbConfig::default()
        };
        prepare_output_dir(&config).unwrap();
        let updated = dir.path().join("products_with_images.csv");
        Fixture {
            _dir: dir,
            config,
            updated,
        }
    }

    fn png_count(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == "png"))
            .count()
    }

    const THREE_ROWS: &str = "id,product_name,price\n1,Mug,4\n2,Lamp,19\n3,Desk,120\n";

    #[test]
    fn sample_limits_renders_but_not_rows() {
        let fx = fixture(THREE_ROWS, 2);
        let fonts = FontSet::builtin();
        let summary = run(&fx.config, &fonts, &fx.updated).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.selected, 2);
        assert_eq!(summary.rendered, 2);
        assert_eq!(png_count(&fx.config.out_dir), 2);

        let out = parse_dataset(&std::fs::read(&fx.updated).unwrap()).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.header, ["id", "product_name", "price", "image"]);
        for rec in &out.records[..2] {
            let cell = rec.get("image").unwrap();
            assert!(cell.ends_with(".png"));
            assert!(cell.contains("/images/") || cell.starts_with("images/"));
        }
        assert_eq!(out.records[2].get("image"), Some(""));
        assert_eq!(out.records[2].get("price"), Some("120"));
    }

    #[test]
    fn second_run_renders_nothing() {
        let fx = fixture(THREE_ROWS, 0);
        let fonts = FontSet::builtin();
        let first = run(&fx.config, &fonts, &fx.updated).unwrap();
        assert_eq!(first.rendered, 3);

        let thumb = fx.config.out_dir.join(thumbnail_filename("Mug", 28));
        let before = std::fs::metadata(&thumb).unwrap().modified().unwrap();
        let bytes = std::fs::read(&thumb).unwrap();

        let second = run(&fx.config, &fonts, &fx.updated).unwrap();
        assert_eq!(second.rendered, 0);
        assert_eq!(second.skipped, 3);
        assert_eq!(png_count(&fx.config.out_dir), 3);
        assert_eq!(std::fs::metadata(&thumb).unwrap().modified().unwrap(), before);
        assert_eq!(std::fs::read(&thumb).unwrap(), bytes);
    }

    #[test]
    fn existing_file_is_never_overwritten() {
        let fx = fixture("title\nKettle\n", 0);
        let thumb = fx.config.out_dir.join(thumbnail_filename("Kettle", 28));
        std::fs::write(&thumb, b"placeholder").unwrap();

        let summary = run(&fx.config, &FontSet::builtin(), &fx.updated).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(std::fs::read(&thumb).unwrap(), b"placeholder");
    }

    #[test]
    fn filename_ignores_dimensions() {
        let fx = fixture("name\nStool\n", 0);
        let fonts = FontSet::builtin();
        run(&fx.config, &fonts, &fx.updated).unwrap();

        let mut bigger = fx.config.clone();
        bigger.width = 200;
        bigger.height = 150;
        let summary = run(&bigger, &fonts, &fx.updated).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(png_count(&fx.config.out_dir), 1);
    }

    #[test]
    fn columns_survive_and_nameless_rows_use_fallback() {
        let fx = fixture("sku,title,notes\nA1,,fragile\nB2,Vase,\"a, b\"\n", 0);
        run(&fx.config, &FontSet::builtin(), &fx.updated).unwrap();

        let out = parse_dataset(&std::fs::read(&fx.updated).unwrap()).unwrap();
        assert_eq!(out.header, ["sku", "title", "notes", "image"]);
        assert_eq!(out.records[0].get("notes"), Some("fragile"));
        assert_eq!(out.records[1].get("notes"), Some("a, b"));
        let first = out.records[0].get("image").unwrap();
        assert!(first.ends_with(&thumbnail_filename("Product", 28)));
    }

    #[test]
    fn no_rewrite_without_flag() {
        let mut fx = fixture(THREE_ROWS, 1);
        fx.config.update_csv = false;
        run(&fx.config, &FontSet::builtin(), &fx.updated).unwrap();
        assert!(!fx.updated.exists());
    }

    #[test]
    fn missing_input_aborts() {
        let mut fx = fixture(THREE_ROWS, 0);
        fx.config.csv_path = fx.config.csv_path.with_file_name("absent.csv");
        assert!(run(&fx.config, &FontSet::builtin(), &fx.updated).is_err());
        assert_eq!(png_count(&fx.config.out_dir), 0);
    }

    #[test]
    fn image_cell_uses_forward_slashes() {
        assert_eq!(
            image_path_cell(Path::new("images"), "Mug_abc.png"),
            "images/Mug_abc.png"
        );
    }
}
