//! PDF composition for compiled reports.
//!
//! This crate provides the document side of report compilation using lopdf:
//! - Manifest-driven merge of section files, tracking where each role starts
//! - Invisible link annotations over the table-of-contents rows
//! - A flat outline (bookmarks) for labelled sections
//! - Deep page copying with inherited attributes materialized

mod annotate;
mod copy;
mod error;
mod merge;
mod outline;
#[cfg(test)]
mod test_support;

pub use annotate::{MM_TO_PT, TocLayout, annotate_toc};
pub use copy::append_pages;
pub use error::ComposerError;
pub use merge::{MergedDocument, merge_files, merge_manifest};
pub use outline::{add_outline, text_string};
