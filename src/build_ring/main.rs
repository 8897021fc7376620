//! Boundary ring builder.
//!
//! Reads an Overpass JSON response holding an admin boundary relation,
//! stitches its outer ways into a ring, simplifies it in the planar
//! projection and writes the result as JSON.

mod batch;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use transitzone::config::ZoneConfig;
use transitzone::models::OverpassResponse;
use transitzone::projection::{ProjectionReference, Projector};
use transitzone::ring::{build_from_graph, BoundaryGraph, BoundaryRing};

#[derive(Parser, Debug, Clone)]
#[command(name = "build-ring")]
#[command(about = "Build a simplified boundary ring from Overpass relation data")]
pub struct Args {
    /// Overpass JSON response containing the boundary relation
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Batch config listing several regions (overrides --file)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output file, or output directory in batch mode
    #[arg(short, long, default_value = "boundary_ring.json")]
    output: PathBuf,

    /// Simplification tolerance in projected metres
    #[arg(long)]
    epsilon: Option<f64>,

    /// Planar reference system, e.g. EPSG:32630
    #[arg(long)]
    projection: Option<ProjectionReference>,
}

impl Args {
    /// Apply command line overrides on top of `base`
    pub fn zone_config(&self, base: &ZoneConfig) -> Result<ZoneConfig> {
        let mut config = base.clone();
        if let Some(epsilon) = self.epsilon {
            config.epsilon = epsilon;
        }
        if let Some(projection) = &self.projection {
            config.projection = projection.clone();
        }
        config.validate().context("Invalid ring options")?;
        Projector::new(&config.projection).context("Invalid projection")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    if let Some(config_path) = args.config.clone() {
        info!("Running in batch mode with config: {}", config_path.display());
        return batch::run_batch(config_path, args);
    }

    let Some(file) = args.file.as_ref() else {
        anyhow::bail!("Either --file or --config must be given");
    };

    let config = args.zone_config(&ZoneConfig::default())?;
    info!("Boundary file: {}", file.display());
    info!("Projection: {}, epsilon: {}", config.projection, config.epsilon);

    let ring = build_ring_from_file(file, &config)?;
    write_ring(&ring, &args.output)?;

    info!(
        "Wrote {} ring points to {}",
        ring.len(),
        args.output.display()
    );
    Ok(())
}

/// Load an Overpass response and build its boundary ring
pub fn build_ring_from_file(path: &Path, config: &ZoneConfig) -> Result<BoundaryRing> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open boundary file {}", path.display()))?;
    let response: OverpassResponse = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse Overpass JSON in {}", path.display()))?;

    let graph = BoundaryGraph::from_response(&response);
    if graph.relation().is_none() {
        warn!("{} contains no relation; the ring will be empty", path.display());
    }

    let ring = build_from_graph(&graph, config)
        .with_context(|| format!("Failed to build ring from {}", path.display()))?;

    if !ring.dropped.is_empty() {
        warn!(
            "{} ways could not be stitched into the ring: {:?}",
            ring.dropped.len(),
            ring.dropped
        );
    }
    info!(
        "Ring: {} stitched points simplified to {}",
        ring.raw_point_count,
        ring.len()
    );
    Ok(ring)
}

pub fn write_ring(ring: &BoundaryRing, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, ring).context("Failed to write ring JSON")?;
    writer.flush()?;
    Ok(())
}
