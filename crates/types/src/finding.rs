use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The fixed set of report categories.
///
/// Declaration order is the report order: aggregates, sections and the
/// detail list all follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "enfermedades")]
    Diseases,
    #[serde(rename = "farmacogenetica")]
    Pharmacogenetics,
    #[serde(rename = "biometricas")]
    Biometrics,
    #[serde(rename = "biomarcadores")]
    Biomarkers,
    #[serde(rename = "rasgos")]
    Traits,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Diseases,
        Category::Pharmacogenetics,
        Category::Biometrics,
        Category::Biomarkers,
        Category::Traits,
    ];

    /// The wire tag used in payload keys and in `_section_<tag>` file names.
    pub fn tag(self) -> &'static str {
        match self {
            Category::Diseases => "enfermedades",
            Category::Pharmacogenetics => "farmacogenetica",
            Category::Biometrics => "biometricas",
            Category::Biomarkers => "biomarcadores",
            Category::Traits => "rasgos",
        }
    }

    /// Looks up a category by its exact wire tag (case-insensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL.into_iter().find(|c| c.tag().eq_ignore_ascii_case(tag))
    }

    /// Human-readable section title.
    pub fn label(self) -> &'static str {
        match self {
            Category::Diseases => "Enfermedades",
            Category::Pharmacogenetics => "Farmacogenetica",
            Category::Biometrics => "Biometricas",
            Category::Biomarkers => "Biomarcadores",
            Category::Traits => "Rasgos",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Risk bucket of a finding. Absent or unrecognized risk text is `Low`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Mid,
    #[default]
    Low,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Mid, RiskLevel::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Mid => "mid",
            RiskLevel::Low => "low",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding exactly as the finding store hands it over.
///
/// Every descriptive field is raw text; classification into [`Category`] and
/// [`RiskLevel`] happens in the aggregator. Numeric fields accept numbers or
/// numeric strings and silently become `None` when unparseable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindingRecord {
    pub rsid: String,
    #[serde(default, alias = "genotipo")]
    pub genotype: String,
    #[serde(default, alias = "fenotipo")]
    pub phenotype: String,
    #[serde(default, alias = "categoria")]
    pub category: Option<String>,
    #[serde(default, alias = "grupo")]
    pub group: Option<String>,
    #[serde(default, alias = "nivel_riesgo")]
    pub risk: Option<String>,
    #[serde(default, alias = "magnitud_efecto", deserialize_with = "lenient_f64")]
    pub effect_magnitude: Option<f64>,
    #[serde(default, alias = "fuente_base_datos")]
    pub source: Option<String>,
    #[serde(default, alias = "cromosoma")]
    pub chromosome: Option<String>,
    #[serde(default, alias = "posicion", deserialize_with = "lenient_i64")]
    pub position: Option<i64>,
    #[serde(default, alias = "alelo_referencia")]
    pub reference_allele: Option<String>,
    #[serde(default, alias = "alelo_alternativo")]
    pub alternative_allele: Option<String>,
    #[serde(default, alias = "continente")]
    pub continent: Option<String>,
    #[serde(default, alias = "pais")]
    pub country: Option<String>,
    #[serde(default, alias = "af_pais", deserialize_with = "lenient_f64")]
    pub country_frequency: Option<f64>,
    #[serde(default, alias = "poblacion_pais")]
    pub population: Option<String>,
}

/// A classified finding, as rendered on detail pages.
///
/// Field names on the wire follow the renderer's payload contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticFinding {
    pub rsid: String,
    #[serde(rename = "genotipo")]
    pub genotype: String,
    #[serde(rename = "fenotipo")]
    pub phenotype: String,
    #[serde(rename = "categoria")]
    pub category: Option<Category>,
    #[serde(rename = "riesgo", default)]
    pub risk: RiskLevel,
    #[serde(rename = "magnitudEfecto", default)]
    pub effect_magnitude: Option<f64>,
    #[serde(rename = "phenotypeDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "porcentajeChilenos", default)]
    pub national_frequency: Option<f64>,
    #[serde(rename = "fuente", default)]
    pub source: Option<String>,
    #[serde(rename = "cromosoma", default)]
    pub chromosome: Option<String>,
    #[serde(rename = "posicion", default)]
    pub position: Option<i64>,
    #[serde(rename = "aleloReferencia", default)]
    pub reference_allele: Option<String>,
    #[serde(rename = "aleloAlternativo", default)]
    pub alternative_allele: Option<String>,
    #[serde(rename = "pais", default)]
    pub country: Option<String>,
    #[serde(rename = "poblacion", default)]
    pub population: Option<String>,
    #[serde(rename = "continente", default)]
    pub continent: Option<String>,
}

/// Parses a number out of free text: surrounding whitespace, a trailing `%`
/// and a decimal comma are tolerated. Non-finite values are rejected.
pub fn parse_lenient_number(text: &str) -> Option<f64> {
    let cleaned = text.trim().trim_end_matches('%').trim().replace(',', ".");
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[derive(Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// `deserialize_with` helper: a number, a numeric string, or `None`.
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<RawNumber>::deserialize(deserializer)? {
        Some(RawNumber::Int(n)) => Some(n as f64),
        Some(RawNumber::Float(n)) if n.is_finite() => Some(n),
        Some(RawNumber::Text(s)) => parse_lenient_number(&s),
        _ => None,
    })
}

pub fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<RawNumber>::deserialize(deserializer)? {
        Some(RawNumber::Int(n)) => Some(n),
        Some(RawNumber::Float(n)) if n.is_finite() && n.fract() == 0.0 => Some(n as i64),
        Some(RawNumber::Text(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tags_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_tag(category.tag()), Some(category));
        }
        assert_eq!(Category::from_tag(" Rasgos "), Some(Category::Traits));
        assert_eq!(Category::from_tag("ancestria"), None);
    }

    #[test]
    fn test_category_order_is_report_order() {
        let mut shuffled = vec![Category::Traits, Category::Diseases, Category::Biomarkers];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Category::Diseases, Category::Biomarkers, Category::Traits]
        );
    }

    #[test]
    fn test_record_accepts_numeric_strings() {
        let record: FindingRecord = serde_json::from_str(
            r#"{"rsid": "rs1", "effect_magnitude": "1,25", "position": "12345", "country_frequency": "18.5%"}"#,
        )
        .unwrap();
        assert_eq!(record.effect_magnitude, Some(1.25));
        assert_eq!(record.position, Some(12345));
        assert_eq!(record.country_frequency, Some(18.5));
    }

    #[test]
    fn test_record_malformed_numbers_become_absent() {
        let record: FindingRecord = serde_json::from_str(
            r#"{"rsid": "rs2", "effect_magnitude": "n/a", "position": [1, 2], "country_frequency": {"x": 1}}"#,
        )
        .unwrap();
        assert_eq!(record.effect_magnitude, None);
        assert_eq!(record.position, None);
        assert_eq!(record.country_frequency, None);
    }

    #[test]
    fn test_record_accepts_store_column_aliases() {
        let record: FindingRecord = serde_json::from_str(
            r#"{"rsid": "rs3", "genotipo": "AG", "fenotipo": "Lactosa", "categoria": "Rasgos", "pais": "Chile", "magnitud_efecto": 2}"#,
        )
        .unwrap();
        assert_eq!(record.genotype, "AG");
        assert_eq!(record.phenotype, "Lactosa");
        assert_eq!(record.category.as_deref(), Some("Rasgos"));
        assert_eq!(record.country.as_deref(), Some("Chile"));
        assert_eq!(record.effect_magnitude, Some(2.0));
    }

    #[test]
    fn test_finding_serializes_renderer_keys() {
        let finding = GeneticFinding {
            rsid: "rs4".into(),
            genotype: "CC".into(),
            phenotype: "Migraña".into(),
            category: Some(Category::Diseases),
            risk: RiskLevel::High,
            effect_magnitude: Some(1.5),
            description: None,
            national_frequency: Some(12.0),
            source: None,
            chromosome: Some("7".into()),
            position: None,
            reference_allele: None,
            alternative_allele: None,
            country: None,
            population: None,
            continent: None,
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["categoria"], "enfermedades");
        assert_eq!(json["riesgo"], "high");
        assert_eq!(json["magnitudEfecto"], 1.5);
        assert_eq!(json["porcentajeChilenos"], 12.0);
        assert_eq!(json["cromosoma"], "7");
    }

    #[test]
    fn test_parse_lenient_number_rejects_non_finite() {
        assert_eq!(parse_lenient_number("NaN"), None);
        assert_eq!(parse_lenient_number("inf"), None);
        assert_eq!(parse_lenient_number(""), None);
        assert_eq!(parse_lenient_number(" 3.5 "), Some(3.5));
    }
}
