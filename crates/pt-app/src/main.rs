use std::path::Path;

use anyhow::Result;
use clap::Parser;
use pt_core::config::{ThumbConfig, load_config};
use pt_dataset::UPDATED_DATASET_FILE;
use pt_render::font::FontSet;

pub mod cli;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Config : défauts ← TOML ← CLI
    let mut config = resolve_config(&cli.config)?;
    cli.apply_overrides(&mut config);
    pipeline::prepare_output_dir(&config)?;

    // 4. Police, une seule fois pour toute l'exécution
    let fonts = FontSet::resolve(&config.font_candidates, config.title_px, config.subtitle_px)?;
    log::info!("Police active : {}", fonts.source());

    // 5. Pipeline
    pipeline::run(&config, &fonts, Path::new(UPDATED_DATASET_FILE))?;
    Ok(())
}

/// Charge le fichier de config s'il existe, sinon les défauts.
fn resolve_config(path: &Path) -> Result<ThumbConfig> {
    if path.exists() {
        log::info!("Config : {}", path.display());
        load_config(path)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(ThumbConfig::default())
    }
}
