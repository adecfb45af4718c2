use genreport::types::{FindingRecord, ManifestFile, TocEntry};
use genreport::{RenderError, RenderJob, SectionRenderer, Subject, SubjectRecord};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Creates a simple PDF with `num_pages` A4 pages, each showing "<prefix> <n>".
pub fn dummy_pdf(num_pages: u32, text_prefix: &str) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut page_ids = vec![];
    for i in 1..=num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 760.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("{} {}", text_prefix, i).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        page_ids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => num_pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

pub fn write_pdf(dir: &Path, name: &str, num_pages: u32) -> PathBuf {
    let path = dir.join(name);
    dummy_pdf(num_pages, name).save(&path).unwrap();
    path
}

pub fn finding(rsid: &str, category: &str, risk: &str, country: Option<&str>) -> FindingRecord {
    FindingRecord {
        rsid: rsid.to_string(),
        genotype: "AG".to_string(),
        phenotype: format!("Fenotipo {rsid}"),
        category: Some(category.to_string()),
        risk: Some(risk.to_string()),
        country: country.map(str::to_string),
        ..Default::default()
    }
}

/// A subject with findings in two categories and two countries.
pub fn subject_record(user_id: &str) -> SubjectRecord {
    let mut subject = Subject::new(user_id);
    subject.display_name = Some("Ana Perez".to_string());
    subject.report_id = Some(format!("GEN-{user_id}"));
    SubjectRecord {
        subject,
        findings: vec![
            finding("rs1", "Enfermedades", "Alto", Some("Chile")),
            finding("rs2", "Enfermedades", "Bajo", Some("Chile")),
            finding("rs3", "Rasgos", "Medio", Some("Peru")),
            finding("rs4", "Farmacogenetica", "alta", None),
        ],
    }
}

/// Section files the stub writes: file suffix, page count.
pub const STANDARD_SECTIONS: [(&str, u32); 8] = [
    ("portada", 1),
    ("indice", 1),
    ("intro", 1),
    ("reporte", 2),
    ("section_enfermedades", 2),
    ("section_rasgos", 1),
    ("ancestria", 1),
    ("cierre", 1),
];

pub fn standard_toc() -> Vec<TocEntry> {
    vec![
        TocEntry::new(0, "intro").with_label("Introduccion"),
        TocEntry::new(1, "report").with_label("Resumen"),
        TocEntry::new(2, "section-enfermedades").with_label("Enfermedades"),
        TocEntry::new(3, "section-farmacogenetica").with_label("Farmacogenetica"),
        TocEntry::new(4, "section-rasgos").with_label("Rasgos"),
        TocEntry::new(5, "ancestry").with_label("Ancestria"),
        TocEntry::new(6, "closing"),
    ]
}

/// An in-process renderer: writes dummy section files and a manifest with
/// paths relative to the output directory.
pub struct StubRenderer {
    pub sections: Vec<(String, u32)>,
    pub toc: Vec<TocEntry>,
    pub calls: AtomicUsize,
    pub payloads: Mutex<Vec<Value>>,
}

impl StubRenderer {
    pub fn standard() -> Self {
        Self::with_sections(
            STANDARD_SECTIONS.iter().map(|(s, n)| (s.to_string(), *n)).collect(),
            standard_toc(),
        )
    }

    pub fn with_sections(sections: Vec<(String, u32)>, toc: Vec<TocEntry>) -> Self {
        Self {
            sections,
            toc,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<Value> {
        self.payloads.lock().unwrap().last().cloned()
    }
}

impl SectionRenderer for StubRenderer {
    async fn render(&self, job: &RenderJob) -> Result<(), RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let envelope: Value = serde_json::from_slice(&std::fs::read(&job.input)?)
            .map_err(std::io::Error::other)?;
        let report_id = envelope["people"][0]["reportId"]
            .as_str()
            .unwrap_or("report")
            .to_string();
        self.payloads.lock().unwrap().push(envelope["people"][0].clone());

        let mut files = Vec::new();
        for (suffix, pages) in &self.sections {
            let name = format!("{report_id}_{suffix}.pdf");
            dummy_pdf(*pages, suffix)
                .save(job.out_dir.join(&name))
                .map_err(std::io::Error::other)?;
            files.push(ManifestFile::new(name));
        }
        let manifest = json!({
            "reports": [{
                "reportId": report_id,
                "files": files,
                "tocEntries": self.toc,
            }]
        });
        std::fs::write(&job.manifest, manifest.to_string())?;
        Ok(())
    }
}
