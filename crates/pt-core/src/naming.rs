use unicode_general_category::{GeneralCategory, get_general_category};

use crate::record::{KnownColumn, ProductRecord};

/// Nom affiché quand aucune colonne de nom n'est renseignée.
pub const FALLBACK_DISPLAY_NAME: &str = "Product";

/// Base de fichier quand le nom assaini est vide.
pub const FALLBACK_FILE_STEM: &str = "product";

/// Longueur maximale (en caractères) de la partie lisible du nom de fichier.
pub const DEFAULT_NAME_LIMIT: usize = 28;

const HASH_LEN: usize = 10;

/// Résout le nom affiché d'une ligne.
///
/// Sonde la colonne préférée, puis les colonnes connues dans l'ordre de repli.
/// Une cellule vide compte comme absente. Ne renvoie jamais de chaîne vide.
///
/// # Example
/// ```
/// use pt_core::naming::resolve_display_name;
/// use pt_core::record::ProductRecord;
/// let mut rec = ProductRecord::default();
/// rec.set("product_name", "");
/// rec.set("title", "Desk Lamp");
/// assert_eq!(resolve_display_name(&rec, "product_name"), "Desk Lamp");
/// assert_eq!(resolve_display_name(&ProductRecord::default(), "label"), "Product");
/// ```
#[must_use]
pub fn resolve_display_name<'a>(record: &'a ProductRecord, preferred: &str) -> &'a str {
    std::iter::once(record.get(preferred))
        .chain(
            KnownColumn::FALLBACK_ORDER
                .into_iter()
                .map(|col| record.names.get(col)),
        )
        .flatten()
        .find(|value| !value.is_empty())
        .unwrap_or(FALLBACK_DISPLAY_NAME)
}

/// Lettres (L*) et nombres (N*) au sens de la catégorie générale Unicode.
///
/// Les marques combinantes (Mn, Mc) sont exclues, même quand
/// `char::is_alphanumeric` les accepte (signes vocaliques indiens).
fn is_letter_or_number(ch: char) -> bool {
    use GeneralCategory as G;
    matches!(
        get_general_category(ch),
        G::UppercaseLetter
            | G::LowercaseLetter
            | G::TitlecaseLetter
            | G::ModifierLetter
            | G::OtherLetter
            | G::DecimalNumber
            | G::LetterNumber
            | G::OtherNumber
    )
}

/// Keeps letters and numbers, space, `_` and `-`, then trims.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|&ch| is_letter_or_number(ch) || matches!(ch, ' ' | '_' | '-'))
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Nom de fichier déterministe `{base}_{hash10}.png` pour un nom affiché.
///
/// Le hash MD5 porte sur le nom assaini non tronqué : deux noms longs de même
/// préfixe restent distincts.
///
/// # Example
/// ```
/// use pt_core::naming::{thumbnail_filename, DEFAULT_NAME_LIMIT};
/// assert_eq!(thumbnail_filename("Widget", DEFAULT_NAME_LIMIT), "Widget_6ed562a0d4.png");
/// assert_eq!(thumbnail_filename("!!!", DEFAULT_NAME_LIMIT), "product_d41d8cd98f.png");
/// ```
#[must_use]
pub fn thumbnail_filename(raw: &str, limit: usize) -> String {
    let clean = sanitize(raw);
    let stem = if clean.is_empty() {
        FALLBACK_FILE_STEM
    } else {
        clean.as_str()
    };
    let base: String = stem
        .chars()
        .take(limit)
        .map(|ch| if ch == ' ' { '_' } else { ch })
        .collect();
    let digest = format!("{:x}", md5::compute(clean.as_bytes()));
    format!("{base}_{}.png", &digest[..HASH_LEN])
}
