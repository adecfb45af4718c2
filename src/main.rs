use clap::{Parser, Subcommand};
use genreport::composer::ComposerError;
use genreport::server::AppState;
use genreport::source::{AnnotationStore, NoAnnotations};
use genreport::{
    Aggregator, CompilerConfig, InMemoryAnnotations, JsonDirectoryStore, Manifest, PipelineError,
    ReportCompiler, ServerConfig, SubjectRecord, assemble,
};
use axum::http::HeaderName;
use chrono::Utc;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "genreport", version, about = "Compiles genetic reports into a single linked PDF")]
struct Cli {
    /// JSON annotation table with descriptions and national frequencies
    #[arg(long, global = true)]
    annotations: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the report download endpoint
    Serve {
        #[arg(long)]
        bind: Option<String>,
        /// Directory of `<user_id>.json` subject files
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Print the renderer payload for a subject file
    Aggregate {
        #[arg(long)]
        findings: PathBuf,
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Run the whole pipeline for a subject file
    Compile {
        #[arg(long)]
        findings: PathBuf,
        /// Defaults to the report's download name
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Merge and link the output of an earlier renderer run
    Merge {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Base for relative file paths. Defaults to the manifest's directory.
        #[arg(long)]
        base_dir: Option<PathBuf>,
    },
}

fn load_annotations(path: Option<&Path>) -> Result<Arc<dyn AnnotationStore>, PipelineError> {
    Ok(match path {
        Some(path) => Arc::new(InMemoryAnnotations::from_file(path)?),
        None => Arc::new(NoAnnotations),
    })
}

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = CompilerConfig::from_env()?;

    match cli.command {
        Commands::Serve { bind, data_dir } => {
            let mut server = ServerConfig::from_env()?;
            if let Some(bind) = bind {
                server.bind = bind;
            }
            if let Some(data_dir) = data_dir {
                server.data_dir = data_dir;
            }
            let annotations =
                load_annotations(cli.annotations.as_deref().or(server.annotations.as_deref()))?;
            let identity_header = HeaderName::from_bytes(server.identity_header.as_bytes())
                .map_err(|e| {
                    config::ConfigError::Message(format!(
                        "invalid identity header '{}': {}",
                        server.identity_header, e
                    ))
                })?;

            info!("Serving subjects from '{}'", server.data_dir.display());
            let compiler = ReportCompiler::from_config(config, annotations);
            let state = AppState::new(
                Arc::new(compiler),
                Arc::new(JsonDirectoryStore::new(&server.data_dir)),
                identity_header,
            );
            genreport::serve(&server.bind, state).await?;
        }
        Commands::Aggregate { findings, pretty } => {
            let (subject, source) = SubjectRecord::from_file(&findings)?.into_parts();
            let aggregator = Aggregator::new(
                config.aggregator_config(),
                load_annotations(cli.annotations.as_deref())?,
            );
            let payload = aggregator.aggregate_now(&subject, source);
            let json = if pretty {
                serde_json::to_string_pretty(&payload)?
            } else {
                serde_json::to_string(&payload)?
            };
            println!("{json}");
        }
        Commands::Compile { findings, out } => {
            let (subject, source) = SubjectRecord::from_file(&findings)?.into_parts();
            let compiler =
                ReportCompiler::from_config(config, load_annotations(cli.annotations.as_deref())?);
            let report = compiler.compile(&subject, source, Utc::now()).await?;
            let out = out.unwrap_or_else(|| PathBuf::from(report.filename()));
            tokio::fs::write(&out, &report.bytes).await?;
            info!(
                "Wrote '{}' ({} pages, {} TOC links)",
                out.display(),
                report.page_count,
                report.links
            );
        }
        Commands::Merge { manifest, out, base_dir } => {
            let text = tokio::fs::read_to_string(&manifest).await?;
            let mut parsed: Manifest = serde_json::from_str(&text)?;
            let base = base_dir
                .or_else(|| manifest.parent().map(Path::to_path_buf))
                .unwrap_or_default();
            parsed.resolve_relative(&base);
            let report = parsed.into_primary().ok_or(ComposerError::EmptyManifest)?;

            let layout = config.toc_layout;
            let assembled =
                tokio::task::spawn_blocking(move || assemble(&report, &layout)).await??;
            tokio::fs::write(&out, &assembled.bytes).await?;
            info!(
                "Wrote '{}' ({} pages, {} TOC links, {} bookmarks)",
                out.display(),
                assembled.page_count,
                assembled.links,
                assembled.bookmarks
            );
        }
    }
    Ok(())
}
