//! Lecture et réécriture du jeu de données produit (CSV).
//!
//! Lecture tolérante : octets UTF-8 invalides ignorés, lignes de longueur
//! variable acceptées. Réécriture : toutes les lignes, dans l'ordre d'origine.

use std::path::Path;

use anyhow::{Context, Result};
use pt_core::error::CoreError;
use pt_core::record::ProductRecord;

/// Nom fixe du jeu de données réécrit, indépendant du fichier d'entrée.
pub const UPDATED_DATASET_FILE: &str = "products_with_images.csv";

/// En-tête et lignes d'un fichier CSV.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Header labels as declared (duplicates removed, first position kept).
    pub header: Vec<String>,
    pub records: Vec<ProductRecord>,
}

impl Dataset {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Colonnes de sortie : celles de la première ligne (ou l'en-tête si
    /// aucune ligne), plus `image_col` en fin si absente.
    ///
    /// # Example
    /// ```
    /// use pt_dataset::Dataset;
    /// let ds = Dataset { header: vec!["id".into(), "name".into()], records: vec![] };
    /// assert_eq!(ds.output_columns("image"), ["id", "name", "image"]);
    /// ```
    #[must_use]
    pub fn output_columns(&self, image_col: &str) -> Vec<String> {
        let mut columns: Vec<String> = match self.records.first() {
            Some(first) => first.columns().map(str::to_owned).collect(),
            None => self.header.clone(),
        };
        if !columns.iter().any(|c| c == image_col) {
            columns.push(image_col.to_owned());
        }
        columns
    }
}

/// Décode en UTF-8 en supprimant les séquences invalides et un BOM initial.
///
/// # Example
/// ```
/// use pt_dataset::decode_lossy;
/// assert_eq!(decode_lossy(b"caf\xff\xfee"), "cafe");
/// ```
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_owned(),
        None => text,
    }
}

/// Lit un fichier CSV avec en-tête.
///
/// # Errors
/// Retourne une erreur si le fichier est absent ou illisible.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(CoreError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_dataset(&bytes).with_context(|| format!("CSV invalide : {}", path.display()))
}

/// Parse CSV bytes; first non-empty line is the header.
///
/// # Errors
/// Returns an error if the CSV reader reports a structural failure.
pub fn parse_dataset(bytes: &[u8]) -> Result<Dataset> {
    let text = decode_lossy(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_header = reader.headers()?.clone();
    let mut header: Vec<String> = Vec::new();
    for label in &raw_header {
        if !header.iter().any(|h| h == label) {
            header.push(label.to_owned());
        }
    }

    let mut records = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row?;
        if row.len() > raw_header.len() {
            log::warn!(
                "Ligne {} : {} cellule(s) hors en-tête ignorée(s)",
                line + 2,
                row.len() - raw_header.len()
            );
        }
        let mut record = ProductRecord::default();
        for label in &header {
            record.declare(label);
        }
        for (label, value) in raw_header.iter().zip(row.iter()) {
            record.set(label, value);
        }
        records.push(record);
    }

    Ok(Dataset { header, records })
}

/// Réécrit toutes les lignes, colonne image ajoutée à l'en-tête si absente.
///
/// Valeurs absentes écrites comme cellules vides ; fins de ligne CRLF.
///
/// # Errors
/// Retourne une erreur si le fichier ne peut être créé ou écrit.
pub fn write_dataset(path: &Path, dataset: &Dataset, image_col: &str) -> Result<()> {
    let columns = dataset.output_columns(image_col);
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .with_context(|| format!("Impossible de créer {}", path.display()))?;

    writer.write_record(&columns)?;
    for record in &dataset.records {
        writer.write_record(columns.iter().map(|c| record.get(c).unwrap_or("")))?;
    }
    writer
        .flush()
        .with_context(|| format!("Écriture incomplète de {}", path.display()))?;
    Ok(())
}
