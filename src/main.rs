use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use vestidor::analysis::DescriptiveAnalyzer;
use vestidor::catalog::{CatalogStore, FileBackend};
use vestidor::codec;
use vestidor::config::Config;
use vestidor::generation::{GenerationMode, GenerationOrchestrator, ReferenceImage};
use vestidor::pipeline::{TryOnPipeline, TryOnRequest};
use vestidor::watermark::{
    apply_watermark, preview_mark, WatermarkPosition, WatermarkSize, WatermarkSpec, WatermarkStyle,
};

/// Vestidor - virtual try-on generation with adaptive brand watermarking
#[derive(Parser, Debug)]
#[command(name = "vestidor")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "vestidor.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a look and store it in the catalog
    Generate {
        /// catalog, tryon or generic
        #[arg(long, default_value = "catalog")]
        mode: GenerationMode,
        /// Model or customer photo
        #[arg(long)]
        model: Option<PathBuf>,
        /// Garment photo
        #[arg(long)]
        garment: Option<PathBuf>,
        /// Skip garment analysis and use this description
        #[arg(long)]
        garment_description: Option<String>,
        /// Skip person analysis and use this description
        #[arg(long)]
        person_description: Option<String>,
        /// Base prompt for generic mode
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Where to write the final PNG
        #[arg(short, long)]
        out: PathBuf,
        /// Store the raw provider image without a watermark
        #[arg(long)]
        no_watermark: bool,
    },
    /// Watermark an existing image
    Watermark {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long)]
        position: Option<WatermarkPosition>,
        #[arg(long)]
        opacity: Option<f32>,
        #[arg(long)]
        size: Option<WatermarkSize>,
        #[arg(long)]
        style: Option<WatermarkStyle>,
    },
    /// Print the mark as SVG markup
    PreviewMark {
        #[arg(long, default_value = "full")]
        style: WatermarkStyle,
        #[arg(long, default_value = "medium")]
        size: WatermarkSize,
    },
    /// Show what the catalog holds
    Catalog,
}

fn load_config(path: &Path) -> Result<Config, String> {
    if path.exists() {
        Config::from_file(path)
    } else {
        Ok(Config::default())
    }
}

fn read_reference(path: &Path) -> anyhow::Result<ReferenceImage> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(ReferenceImage::new(codec::sniff_media_type(&data), data))
}

fn open_catalog(config: &Config) -> anyhow::Result<CatalogStore> {
    match &config.catalog.path {
        Some(path) => Ok(CatalogStore::open(
            Box::new(FileBackend::new(path)),
            config.catalog.limits(),
        )?),
        None => Ok(CatalogStore::in_memory()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let config = load_config(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    // Initialize logging subsystem
    vestidor::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow!("Failed to initialize logging subsystem: {}", e))?;

    config.validate_offline().map_err(|e| anyhow!(e))?;

    tracing::info!(
        config_file = %args.config.display(),
        max_attempts = config.retry.max_attempts,
        watermark_enabled = config.watermark.enabled,
        catalog_persisted = config.catalog.path.is_some(),
        "Configuration loaded successfully"
    );

    match args.command {
        Command::Generate {
            mode,
            model,
            garment,
            garment_description,
            person_description,
            prompt,
            title,
            out,
            no_watermark,
        } => {
            config.validate().map_err(|e| anyhow!(e))?;

            let client = Arc::new(config.provider.build_client()?);
            let analyzer = DescriptiveAnalyzer::new(client.clone());
            let orchestrator =
                GenerationOrchestrator::new(client, config.retry.to_retry_policy());
            let watermark = if no_watermark {
                None
            } else {
                config.watermark.active_spec()
            };
            let catalog = Arc::new(open_catalog(&config)?);
            let pipeline = TryOnPipeline::new(analyzer, orchestrator, watermark, catalog);

            let request = TryOnRequest {
                mode,
                subject: model.as_deref().map(read_reference).transpose()?,
                garment: garment.as_deref().map(read_reference).transpose()?,
                garment_description,
                person_description,
                prompt,
                title,
            };

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupt received, cancelling generation");
                    ctrl_c.cancel();
                }
            });

            match pipeline.run(request, &cancel).await {
                Ok(outcome) => {
                    std::fs::write(&out, &outcome.artifact.data)
                        .with_context(|| format!("writing {}", out.display()))?;
                    tracing::info!(id = %outcome.item.id, out = %out.display(), "Look generated");
                    println!("{}", outcome.item.id);
                }
                Err(e) if e.is_cancelled() => {
                    eprintln!("Generation cancelled");
                    std::process::exit(130);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Generation failed");
                    eprintln!("{}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
        Command::Watermark {
            input,
            out,
            position,
            opacity,
            size,
            style,
        } => {
            let base = config.watermark.spec;
            let spec = WatermarkSpec::new(
                position.unwrap_or(base.position),
                opacity.unwrap_or(base.opacity),
                size.unwrap_or(base.size),
                style.unwrap_or(base.style),
            );
            spec.validate().map_err(|e| anyhow!(e))?;

            let data =
                std::fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let png = tokio::task::spawn_blocking(move || apply_watermark(&data, &spec)).await??;
            std::fs::write(&out, png).with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(input = %input.display(), out = %out.display(), "Watermark applied");
        }
        Command::PreviewMark { style, size } => {
            println!("{}", preview_mark(style, size));
        }
        Command::Catalog => {
            let catalog = open_catalog(&config)?;
            let info = catalog.storage_info();
            println!(
                "{} item(s), {:.1} KB persisted",
                info.item_count, info.size_kb
            );
            for item in catalog.list() {
                println!(
                    "{}  {}  {}",
                    item.id,
                    item.created_at.format("%Y-%m-%d %H:%M"),
                    item.title
                );
            }
        }
    }

    Ok(())
}
