//! Report compilation pipeline.
//!
//! - [`ReportCompilerBuilder`]: Fluent builder for constructing report compilers
//! - [`ReportCompiler`]: Aggregate, render, merge and annotate one report
//! - [`CompilerConfig`]: Settings, loadable from `GENREPORT_*` variables
//! - [`assemble`]: The blocking merge and annotation stage on its own
//!
//! # Example
//!
//! ```ignore
//! use genreport::{ReportCompilerBuilder, SubprocessRenderer};
//!
//! let compiler = ReportCompilerBuilder::new(SubprocessRenderer::new("node").with_args(["generate.js"]))
//!     .with_indigenous_country("Chile")
//!     .build();
//!
//! let report = compiler.compile(&subject, findings, Utc::now()).await?;
//! std::fs::write(report.filename(), &report.bytes)?;
//! ```

mod assemble;
mod builder;
mod config;
mod orchestrator;
mod workspace;

pub use assemble::{AssembledReport, assemble};
pub use builder::ReportCompilerBuilder;
pub use config::{CompilerConfig, ENV_PREFIX};
pub use orchestrator::{CompiledReport, ReportCompiler};
pub use workspace::Workspace;

pub(crate) use config::environment;
#[cfg(test)]
pub(crate) use config::env_map;
