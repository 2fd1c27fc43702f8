use clap::{Parser, Subcommand, ValueEnum};
use cmaas::cdr::{AreaExtractionResponse, LegendItemResponse};
use cmaas::{
    convert_cdr_area_extraction_to_layout, convert_cdr_feature_results_to_cmaas_map,
    convert_cdr_legend_items_to_legend, load_cdr_feature_results, load_layout_json, load_legend_json, FeatureResults,
    MapUnitType, DEFAULT_NOISE_THRESHOLD,
};
use cmaas_cli::{BatchConfig, ExportJob, ExportSettings};
use color_eyre::eyre::{eyre, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a legend file of any supported dialect
    Legend {
        #[arg(short, long)]
        input: PathBuf,
        /// Drop legend entries whose type could not be resolved
        #[arg(long)]
        known_only: bool,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Normalize a layout file of any supported dialect
    Layout {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert one map to CDR feature results
    Export {
        /// Legend json of the map; its file stem names the map
        #[arg(short, long)]
        legend: PathBuf,
        #[arg(long)]
        layout: Option<PathBuf>,
        /// Polygon label mask to vectorize
        #[arg(long)]
        poly_mask: Option<PathBuf>,
        #[arg(short, long)]
        output_dir: PathBuf,
        #[arg(long)]
        cog_id: Option<String>,
        #[arg(long, default_value = "uiuc")]
        system: String,
        #[arg(long, default_value = "0.1")]
        system_version: String,
        #[arg(long, default_value_t = DEFAULT_NOISE_THRESHOLD)]
        noise_threshold: u32,
    },
    /// Convert CDR records back into the map data model
    Import {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, value_enum, default_value_t = ImportKind::FeatureResults)]
        kind: ImportKind,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert every map described by a batch configuration file
    Batch {
        /// Path to the TOML or JSON configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print a JSON schema
    Schema {
        #[arg(value_enum, default_value_t = SchemaKind::FeatureResults)]
        kind: SchemaKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ImportKind {
    /// A full FeatureResults document
    FeatureResults,
    /// A json array of area extraction records
    AreaExtractions,
    /// A json array of legend item records
    LegendItems,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    FeatureResults,
    BatchConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Legend { input, known_only, output } => {
            let filter: &[MapUnitType] = if known_only { &MapUnitType::ALL_KNOWN } else { &MapUnitType::ALL };
            let legend = load_legend_json(&input, filter)?;
            info!("{legend}");
            write_json(&legend, output.as_deref())?;
        }
        Commands::Layout { input, output } => {
            let layout = load_layout_json(&input)?;
            info!(provenance = %layout.provenance, "loaded layout");
            write_json(&layout, output.as_deref())?;
        }
        Commands::Export {
            legend,
            layout,
            poly_mask,
            output_dir,
            cog_id,
            system,
            system_version,
            noise_threshold,
        } => {
            let job = ExportJob {
                name: cmaas::io::map_name(&legend)?,
                legend_path: legend,
                layout_path: layout,
                poly_mask_path: poly_mask,
                output_dir,
            };
            let settings = ExportSettings {
                system,
                system_version,
                type_filter: MapUnitType::ALL.to_vec(),
                noise_threshold,
                cog_id,
            };
            let results = job.run(&settings)?;
            log_results(&job, &results);
        }
        Commands::Import { input, kind, output } => import(&input, kind, output.as_deref())?,
        Commands::Batch { config } => run_batch(&config).await?,
        Commands::Schema { kind } => {
            let schema = match kind {
                SchemaKind::FeatureResults => schemars::schema_for!(FeatureResults),
                SchemaKind::BatchConfig => schemars::schema_for!(BatchConfig),
            };
            write_json(&schema, None)?;
        }
    }

    Ok(())
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("📄 Written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn import(input: &Path, kind: ImportKind, output: Option<&Path>) -> Result<()> {
    match kind {
        ImportKind::FeatureResults => {
            let results = load_cdr_feature_results(input)?;
            let map = convert_cdr_feature_results_to_cmaas_map(&results);
            info!("{map}");
            write_json(&map, output)
        }
        ImportKind::AreaExtractions => {
            let records: Vec<AreaExtractionResponse> = serde_json::from_str(&std::fs::read_to_string(input)?)?;
            let layout = convert_cdr_area_extraction_to_layout(&records)
                .ok_or_else(|| eyre!("{} contains no area extractions", input.display()))?;
            write_json(&layout, output)
        }
        ImportKind::LegendItems => {
            let records: Vec<LegendItemResponse> = serde_json::from_str(&std::fs::read_to_string(input)?)?;
            let legend = convert_cdr_legend_items_to_legend(&records)
                .ok_or_else(|| eyre!("{} contains no legend items", input.display()))?;
            write_json(&legend, output)
        }
    }
}

fn log_results(job: &ExportJob, results: &FeatureResults) {
    let count = |len: Option<usize>| len.unwrap_or(0);
    info!(
        map = %job.name,
        points = count(results.point_feature_results.as_ref().map(Vec::len)),
        lines = count(results.line_feature_results.as_ref().map(Vec::len)),
        polygons = count(results.polygon_feature_results.as_ref().map(Vec::len)),
        "✅ Exported {}",
        job.cdr_output_path().display()
    );
}

/// Each map is converted on the blocking pool; maps share nothing.
async fn run_batch(config_path: &Path) -> Result<()> {
    let config = BatchConfig::from_file(config_path)?;
    let jobs = config.jobs()?;
    let settings = Arc::new(config.settings());
    info!("Converting {} maps from {}", jobs.len(), config.legend_dir.display());

    let mut tasks = JoinSet::new();
    for job in jobs {
        let settings = Arc::clone(&settings);
        tasks.spawn_blocking(move || {
            let outcome = job.run(&settings);
            (job, outcome)
        });
    }

    let mut failed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (job, outcome) = joined?;
        match outcome {
            Ok(results) => log_results(&job, &results),
            Err(e) => {
                failed += 1;
                error!(map = %job.name, "Failed to convert: {e}");
            }
        }
    }

    if failed > 0 {
        return Err(eyre!("{failed} maps failed to convert"));
    }
    info!("✅ Batch conversion completed!");
    Ok(())
}
