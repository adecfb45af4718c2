use crate::finding::{Category, GeneticFinding, RiskLevel};
use crate::ids::ReportId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Count of findings per risk bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskCounts {
    pub high: usize,
    pub mid: usize,
    pub low: usize,
}

impl RiskCounts {
    pub fn record(&mut self, risk: RiskLevel) {
        match risk {
            RiskLevel::High => self.high += 1,
            RiskLevel::Mid => self.mid += 1,
            RiskLevel::Low => self.low += 1,
        }
    }

    pub fn get(&self, risk: RiskLevel) -> usize {
        match risk {
            RiskLevel::High => self.high,
            RiskLevel::Mid => self.mid,
            RiskLevel::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.mid + self.low
    }
}

impl AddAssign for RiskCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.high += rhs.high;
        self.mid += rhs.mid;
        self.low += rhs.low;
    }
}

/// Per-category totals. Derived on every run, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub total: usize,
    pub counts: RiskCounts,
}

impl CategoryAggregate {
    pub fn record(&mut self, risk: RiskLevel) {
        self.total += 1;
        self.counts.record(risk);
    }
}

/// One country in the ancestry breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncestryComponent {
    #[serde(rename = "country")]
    pub name: String,
    #[serde(rename = "pct")]
    pub percentage: f64,
    #[serde(rename = "variantCount")]
    pub count: usize,
}

/// One indigenous population in the designated country's breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndigenousComponent {
    pub name: String,
    pub percentage: f64,
    #[serde(rename = "variantCount")]
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub snps_analyzed: usize,
    pub risk_counts: RiskCounts,
}

/// Everything the section renderer needs to draw one report.
///
/// The payload is self-contained: it has no back-reference to storage and is
/// discarded once the compiled document has been returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub report_id: ReportId,
    pub name: String,
    pub display_name: String,
    /// Display date (`dd/mm/yyyy`) derived from `generated_at`.
    pub date: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub summary: ReportSummary,
    pub areas: BTreeMap<Category, CategoryAggregate>,
    #[serde(rename = "ancestryTop5")]
    pub ancestry_top: Vec<AncestryComponent>,
    pub ancestry_map: BTreeMap<String, f64>,
    #[serde(rename = "indigenousData")]
    pub indigenous: Vec<IndigenousComponent>,
    #[serde(rename = "rsids")]
    pub findings: Vec<GeneticFinding>,
}

impl ReportPayload {
    pub fn aggregate(&self, category: Category) -> CategoryAggregate {
        self.areas.get(&category).copied().unwrap_or_default()
    }
}

/// The envelope the renderer reads from its `--input` file.
#[derive(Debug, Serialize)]
pub struct RendererInput<'a> {
    pub people: Vec<&'a ReportPayload>,
}

impl<'a> From<&'a ReportPayload> for RendererInput<'a> {
    fn from(payload: &'a ReportPayload) -> Self {
        Self { people: vec![payload] }
    }
}
