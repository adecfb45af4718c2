//! Total classification of raw category and risk text.

use genreport_types::{Category, RiskLevel};

/// Substring rules applied to normalized category text, first match wins.
const CATEGORY_RULES: &[(&str, Category)] = &[
    ("enfermedad", Category::Diseases),
    ("disease", Category::Diseases),
    ("farmaco", Category::Pharmacogenetics),
    ("pharmaco", Category::Pharmacogenetics),
    ("biomarc", Category::Biomarkers),
    ("biomarker", Category::Biomarkers),
    ("biometr", Category::Biometrics),
    ("rasgo", Category::Traits),
    ("trait", Category::Traits),
];

/// Strips diacritics, case-folds and joins words with `-`.
pub fn normalize_text(raw: &str) -> String {
    slug::slugify(raw)
}

fn category_of(raw: &str) -> Option<Category> {
    let norm = normalize_text(raw);
    if norm.is_empty() {
        return None;
    }
    CATEGORY_RULES
        .iter()
        .find(|(stem, _)| norm.contains(stem))
        .map(|(_, category)| *category)
}

/// Classifies a finding by its category text, falling back to its group text.
pub fn classify_category(category: Option<&str>, group: Option<&str>) -> Option<Category> {
    category.and_then(category_of).or_else(|| group.and_then(category_of))
}

/// Maps raw risk text to a bucket. Never fails: anything unrecognized is `Low`.
pub fn classify_risk(raw: Option<&str>) -> RiskLevel {
    let Some(raw) = raw else {
        return RiskLevel::Low;
    };
    let norm = normalize_text(raw);
    let tokens: Vec<&str> = norm.split('-').filter(|t| !t.is_empty()).collect();

    let is_high = |t: &&str| t.starts_with("alto") || t.starts_with("alta") || *t == "high";
    let is_mid = |t: &&str| {
        t.starts_with("intermedi")
            || t.starts_with("medio")
            || t.starts_with("media")
            || *t == "medium"
            || *t == "mid"
    };

    if tokens.iter().any(is_high) {
        RiskLevel::High
    } else if tokens.iter().any(is_mid) {
        RiskLevel::Mid
    } else {
        RiskLevel::Low
    }
}
