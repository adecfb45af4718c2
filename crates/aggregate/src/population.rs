//! Display names for indigenous populations.

use crate::classify::normalize_text;

/// Shown when a finding in the designated country has no population.
pub const UNKNOWN_POPULATION: &str = "Desconocido";

/// Canonical spellings keyed by normalized name.
const CANONICAL_NAMES: &[(&str, &str)] = &[
    ("aimara", "Aymara"),
    ("aymara", "Aymara"),
    ("atacameno", "Atacameño"),
    ("chileno-general", "Chileno general"),
    ("colla", "Colla"),
    ("diaguita", "Diaguita"),
    ("kawesqar", "Kawésqar"),
    ("mapuche", "Mapuche"),
    ("quechua", "Quechua"),
    ("rapa-nui", "Rapa Nui"),
    ("rapanui", "Rapa Nui"),
    ("yagan", "Yagán"),
];

/// Turns a raw population label into its display name.
///
/// Underscores become spaces and runs of whitespace collapse. Known names get
/// their canonical spelling; anything else is kept as cleaned.
pub fn display_name(raw: Option<&str>) -> String {
    let cleaned = raw
        .map(|r| r.replace('_', " "))
        .map(|r| r.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    if cleaned.is_empty() {
        return UNKNOWN_POPULATION.to_string();
    }
    let key = normalize_text(&cleaned);
    CANONICAL_NAMES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(cleaned)
}
