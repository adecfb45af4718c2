//! Turns a subject's raw findings into the normalized [`ReportPayload`].
//!
//! Aggregation is a pure function of its inputs: the same findings, the same
//! annotations and the same timestamp always produce an identical payload,
//! regardless of the order the store returned the records in.

pub mod classify;
pub mod population;
pub mod shares;

use chrono::{DateTime, Utc};
use genreport_source::{AnnotationKey, AnnotationStore, FindingSource, Subject};
use genreport_types::{
    AncestryComponent, Category, CategoryAggregate, FindingRecord, GeneticFinding,
    IndigenousComponent, ReportId, ReportPayload, ReportSummary, RiskCounts,
};
use itertools::Itertools;
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

pub use classify::{classify_category, classify_risk};
pub use shares::{Share, distribute};

/// Display format of the report date.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Country whose findings feed the indigenous-population breakdown.
    pub indigenous_country: String,
    /// Number of countries listed in the ancestry summary.
    pub ancestry_top_n: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            indigenous_country: "Chile".to_string(),
            ancestry_top_n: 5,
        }
    }
}

pub struct Aggregator {
    config: AggregatorConfig,
    annotations: Arc<dyn AnnotationStore>,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig, annotations: Arc<dyn AnnotationStore>) -> Self {
        Self { config, annotations }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Builds the payload for one subject.
    ///
    /// Findings that match no category are left out of the aggregates. They
    /// stay in the finding list only when they carry a country, since the
    /// ancestry breakdown still uses them.
    pub fn aggregate<S>(
        &self,
        subject: &Subject,
        mut source: S,
        generated_at: DateTime<Utc>,
    ) -> ReportPayload
    where
        S: FindingSource,
    {
        let mut findings = Vec::with_capacity(source.size_hint().unwrap_or(0));
        let mut areas: BTreeMap<Category, CategoryAggregate> = BTreeMap::new();
        let mut analyzed = 0usize;
        let mut unclassified = 0usize;

        while let Some(record) = source.next_record() {
            analyzed += 1;
            let finding = self.classify(&record);
            match finding.category {
                Some(category) => areas.entry(category).or_default().record(finding.risk),
                None => {
                    unclassified += 1;
                    debug!(
                        "Finding {} has no recognizable category ({:?} / {:?})",
                        record.rsid, record.category, record.group
                    );
                    if finding.country.is_none() {
                        continue;
                    }
                }
            }
            findings.push(finding);
        }

        if unclassified > 0 {
            warn!(
                "{} of {} findings for '{}' matched no category",
                unclassified, analyzed, subject.user_id
            );
        }

        findings.sort_by(finding_order);

        let mut risk_counts = RiskCounts::default();
        for aggregate in areas.values() {
            risk_counts += aggregate.counts;
        }

        let ancestry = distribute(
            findings
                .iter()
                .filter_map(|f| f.country.clone())
                .counts(),
        );
        let ancestry_map = ancestry
            .iter()
            .map(|share| (share.name.clone(), share.percentage()))
            .collect();
        let ancestry_top = ancestry
            .iter()
            .take(self.config.ancestry_top_n)
            .map(|share| AncestryComponent {
                name: share.name.clone(),
                percentage: share.percentage(),
                count: share.count,
            })
            .collect();

        let indigenous = distribute(
            findings
                .iter()
                .filter(|f| {
                    f.country
                        .as_deref()
                        .is_some_and(|c| c.eq_ignore_ascii_case(&self.config.indigenous_country))
                })
                .map(|f| population::display_name(f.population.as_deref()))
                .counts(),
        )
        .into_iter()
        .map(|share| IndigenousComponent {
            percentage: share.percentage(),
            name: share.name,
            count: share.count,
        })
        .collect();

        let name = first_present([&subject.name, &subject.display_name])
            .unwrap_or_else(|| subject.user_id.clone());
        let display_name = first_present([&subject.display_name, &subject.name])
            .unwrap_or_else(|| name.clone());
        let report_id = first_present([&subject.report_id])
            .map(ReportId::from)
            .unwrap_or_else(|| ReportId::from(format!("GEN-{}", subject.user_id)));

        info!(
            "Aggregated {} findings for report '{}' ({} high, {} mid, {} low)",
            analyzed, report_id, risk_counts.high, risk_counts.mid, risk_counts.low
        );

        ReportPayload {
            report_id,
            name,
            display_name,
            date: generated_at.format(DATE_FORMAT).to_string(),
            generated_at,
            link: first_present([&subject.link]),
            summary: ReportSummary { snps_analyzed: analyzed, risk_counts },
            areas,
            ancestry_top,
            ancestry_map,
            indigenous,
            findings,
        }
    }

    /// Same as [`Aggregator::aggregate`], stamped with the current time.
    pub fn aggregate_now<S: FindingSource>(&self, subject: &Subject, source: S) -> ReportPayload {
        self.aggregate(subject, source, Utc::now())
    }

    fn classify(&self, record: &FindingRecord) -> GeneticFinding {
        let annotation = self.annotations.lookup(&AnnotationKey::for_record(record));
        let (description, national_frequency) = annotation
            .map(|a| (a.description, a.frequency_percent))
            .unwrap_or_default();

        GeneticFinding {
            rsid: record.rsid.trim().to_string(),
            genotype: record.genotype.trim().to_string(),
            phenotype: record.phenotype.trim().to_string(),
            category: classify_category(record.category.as_deref(), record.group.as_deref()),
            risk: classify_risk(record.risk.as_deref()),
            effect_magnitude: record.effect_magnitude,
            description,
            national_frequency,
            source: non_blank(&record.source),
            chromosome: non_blank(&record.chromosome),
            position: record.position,
            reference_allele: non_blank(&record.reference_allele),
            alternative_allele: non_blank(&record.alternative_allele),
            country: non_blank(&record.country),
            population: non_blank(&record.population),
            continent: non_blank(&record.continent),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_present<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates.into_iter().find_map(non_blank)
}

/// Category (unclassified last), risk, magnitude descending, then rsID and
/// genotype so the order is total.
fn finding_order(a: &GeneticFinding, b: &GeneticFinding) -> Ordering {
    let category = match (a.category, b.category) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    let magnitude = match (a.effect_magnitude, b.effect_magnitude) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    category
        .then(a.risk.cmp(&b.risk))
        .then(magnitude)
        .then_with(|| a.rsid.cmp(&b.rsid))
        .then_with(|| a.genotype.cmp(&b.genotype))
        .then_with(|| a.phenotype.cmp(&b.phenotype))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use genreport_source::{Annotation, InMemoryAnnotations, NoAnnotations, VecFindingSource};
    use genreport_types::RiskLevel;

    fn record(rsid: &str, category: &str, risk: &str, country: Option<&str>) -> FindingRecord {
        FindingRecord {
            rsid: rsid.to_string(),
            genotype: "AG".to_string(),
            phenotype: format!("fenotipo {rsid}"),
            category: Some(category.to_string()),
            risk: Some(risk.to_string()),
            country: country.map(str::to_string),
            ..Default::default()
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()
    }

    fn aggregator() -> Aggregator {
        Aggregator::new(AggregatorConfig::default(), Arc::new(NoAnnotations))
    }

    #[test]
    fn test_empty_input_yields_empty_payload() {
        let subject = Subject::new("u1");
        let payload = aggregator().aggregate(&subject, VecFindingSource::new(vec![]), fixed_time());

        assert_eq!(payload.summary.snps_analyzed, 0);
        assert_eq!(payload.summary.risk_counts.total(), 0);
        assert!(payload.areas.is_empty());
        assert!(payload.ancestry_top.is_empty());
        assert!(payload.ancestry_map.is_empty());
        assert!(payload.indigenous.is_empty());
        assert!(payload.findings.is_empty());
        assert_eq!(payload.date, "09/03/2024");
        assert_eq!(payload.report_id.as_str(), "GEN-u1");
        assert_eq!(payload.display_name, "u1");
    }

    #[test]
    fn test_aggregates_partition_classified_findings() {
        let records = vec![
            record("rs1", "Enfermedades", "Alto", None),
            record("rs2", "Enfermedades", "Bajo", None),
            record("rs3", "Farmacogenética", "Intermedio", None),
            record("rs4", "Rasgos", "sin dato", None),
            record("rs5", "Otro", "Alto", None),
        ];
        let payload =
            aggregator().aggregate(&Subject::new("u1"), VecFindingSource::new(records), fixed_time());

        assert_eq!(payload.summary.snps_analyzed, 5);
        let diseases = payload.aggregate(Category::Diseases);
        assert_eq!(diseases.total, 2);
        assert_eq!(diseases.counts, RiskCounts { high: 1, mid: 0, low: 1 });
        assert_eq!(payload.aggregate(Category::Pharmacogenetics).counts.mid, 1);
        assert_eq!(payload.aggregate(Category::Traits).counts.low, 1);
        assert_eq!(payload.aggregate(Category::Biomarkers).total, 0);

        let per_category: usize = payload.areas.values().map(|a| a.total).sum();
        assert_eq!(per_category, 4);
        assert_eq!(payload.summary.risk_counts.total(), 4);
        for aggregate in payload.areas.values() {
            assert_eq!(aggregate.total, aggregate.counts.total());
        }
        assert!(payload.findings.iter().all(|f| f.rsid != "rs5"));
    }

    #[test]
    fn test_unclassified_finding_with_country_counts_for_ancestry() {
        let records = vec![
            record("rs1", "Rasgos", "Bajo", Some("Chile")),
            record("rs2", "???", "Bajo", Some("Peru")),
        ];
        let payload =
            aggregator().aggregate(&Subject::new("u1"), VecFindingSource::new(records), fixed_time());

        assert_eq!(payload.findings.len(), 2);
        assert_eq!(payload.findings[1].rsid, "rs2");
        assert_eq!(payload.findings[1].category, None);
        assert_eq!(payload.ancestry_map.len(), 2);
        assert_eq!(payload.aggregate(Category::Traits).total, 1);
    }

    #[test]
    fn test_ancestry_top_is_truncated_and_closes() {
        let countries = ["Chile", "Chile", "Chile", "Peru", "Peru", "Bolivia", "Spain", "Italy", "Japan"];
        let records: Vec<_> = countries
            .iter()
            .enumerate()
            .map(|(i, c)| record(&format!("rs{i}"), "Rasgos", "Bajo", Some(c)))
            .collect();
        let payload =
            aggregator().aggregate(&Subject::new("u1"), VecFindingSource::new(records), fixed_time());

        assert_eq!(payload.ancestry_map.len(), 6);
        assert_eq!(payload.ancestry_top.len(), 5);
        assert_eq!(payload.ancestry_top[0].name, "Chile");
        assert_eq!(payload.ancestry_top[0].count, 3);
        assert_eq!(payload.ancestry_top[1].name, "Peru");
        let total: f64 = payload.ancestry_map.values().sum();
        assert!((total - 100.0).abs() <= 0.01, "total = {total}");
    }

    #[test]
    fn test_indigenous_breakdown_uses_designated_country() {
        let mut records = vec![
            record("rs1", "Rasgos", "Bajo", Some("chile")),
            record("rs2", "Rasgos", "Bajo", Some("Chile")),
            record("rs3", "Rasgos", "Bajo", Some("Chile")),
            record("rs4", "Rasgos", "Bajo", Some("Peru")),
        ];
        records[0].population = Some("Aimara".into());
        records[1].population = Some("Aymara".into());
        records[3].population = Some("Quechua".into());

        let payload =
            aggregator().aggregate(&Subject::new("u1"), VecFindingSource::new(records), fixed_time());

        let names: Vec<_> = payload.indigenous.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Aymara", population::UNKNOWN_POPULATION]);
        assert_eq!(payload.indigenous[0].count, 2);
        let total: f64 = payload.indigenous.iter().map(|c| c.percentage).sum();
        assert!((total - 100.0).abs() <= 0.01);
    }

    #[test]
    fn test_output_is_independent_of_input_order() {
        let records = vec![
            record("rs3", "Rasgos", "Alto", Some("Peru")),
            record("rs1", "Enfermedades", "Bajo", Some("Chile")),
            record("rs2", "Enfermedades", "Alto", Some("Chile")),
            record("rs4", "Biomarcadores", "Medio", Some("Bolivia")),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let agg = aggregator();
        let subject = Subject::new("u1");
        let a = agg.aggregate(&subject, VecFindingSource::new(records), fixed_time());
        let b = agg.aggregate(&subject, VecFindingSource::new(reversed), fixed_time());
        assert_eq!(a, b);

        let order: Vec<_> = a.findings.iter().map(|f| f.rsid.as_str()).collect();
        assert_eq!(order, ["rs2", "rs1", "rs4", "rs3"]);
    }

    #[test]
    fn test_magnitude_orders_within_risk() {
        let mut records = vec![
            record("rs1", "Rasgos", "Alto", None),
            record("rs2", "Rasgos", "Alto", None),
            record("rs3", "Rasgos", "Alto", None),
        ];
        records[0].effect_magnitude = Some(0.5);
        records[1].effect_magnitude = Some(2.0);
        let payload =
            aggregator().aggregate(&Subject::new("u1"), VecFindingSource::new(records), fixed_time());
        let order: Vec<_> = payload.findings.iter().map(|f| f.rsid.as_str()).collect();
        assert_eq!(order, ["rs2", "rs1", "rs3"]);
        assert!(payload.findings.iter().all(|f| f.risk == RiskLevel::High));
    }

    #[test]
    fn test_annotations_enrich_findings() {
        let mut annotations = InMemoryAnnotations::new();
        annotations.insert(
            AnnotationKey::new("rs1", "AG", "fenotipo rs1"),
            Annotation {
                description: Some("Metabolismo lento".into()),
                frequency_percent: Some(31.2),
            },
        );
        let agg = Aggregator::new(AggregatorConfig::default(), Arc::new(annotations));
        let payload = agg.aggregate(
            &Subject::new("u1"),
            VecFindingSource::new(vec![
                record("rs1", "Farmacogenetica", "Bajo", None),
                record("rs2", "Farmacogenetica", "Bajo", None),
            ]),
            fixed_time(),
        );
        assert_eq!(payload.findings[0].description.as_deref(), Some("Metabolismo lento"));
        assert_eq!(payload.findings[0].national_frequency, Some(31.2));
        assert_eq!(payload.findings[1].description, None);
    }

    #[test]
    fn test_subject_names_fall_back() {
        let subject = Subject {
            user_id: "u7".into(),
            name: Some("Ana Pérez".into()),
            display_name: Some("  ".into()),
            report_id: Some("R-77".into()),
            link: Some("https://example.org/r/77".into()),
        };
        let payload = aggregator().aggregate(&subject, VecFindingSource::new(vec![]), fixed_time());
        assert_eq!(payload.name, "Ana Pérez");
        assert_eq!(payload.display_name, "Ana Pérez");
        assert_eq!(payload.report_id.as_str(), "R-77");
        assert_eq!(payload.link.as_deref(), Some("https://example.org/r/77"));
    }
}
