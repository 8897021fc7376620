//! Station relevance classifier.
//!
//! Takes a boundary ring produced by `build-ring` and a CSV of stations
//! marked inside or outside, and reports which outside stations have a
//! catchment reaching into the boundary.

mod stations;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use transitzone::catchment::RelevanceClassifier;
use transitzone::config::{Config, ZoneConfig};
use transitzone::models::StationSite;
use transitzone::projection::Projector;
use transitzone::ring::BoundaryRing;

use crate::stations::{load_stations, StationRecord};

#[derive(Parser, Debug)]
#[command(name = "classify")]
#[command(about = "Classify outside stations by whether their catchment reaches a boundary")]
struct Args {
    /// Boundary ring JSON written by build-ring
    #[arg(short, long)]
    ring: PathBuf,

    /// Stations CSV with columns id,name,lat,lon,inside
    #[arg(short, long)]
    stations: PathBuf,

    /// Write results here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Take padding options from the [global] table of a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of padding sites (0 disables padding)
    #[arg(long)]
    padding_count: Option<usize>,

    /// Padding radius as a multiple of the site spread
    #[arg(long)]
    padding_multiplier: Option<f64>,

    /// Only list relevant stations
    #[arg(long)]
    relevant_only: bool,
}

#[derive(Debug, Serialize)]
struct StationVerdict<'a> {
    id: i64,
    name: &'a str,
    relevant: bool,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?.global,
        None => ZoneConfig::default(),
    };
    if let Some(count) = args.padding_count {
        config.padding_point_count = count;
    }
    if let Some(multiplier) = args.padding_multiplier {
        config.padding_radius_multiplier = multiplier;
    }

    let ring = load_ring(&args.ring)?;
    info!("Ring: {} points in {}", ring.len(), ring.projection);
    if ring.is_empty() {
        warn!("Boundary ring is empty; only unbounded cells will be relevant");
    }

    let records = load_stations(&args.stations)?;
    // Stations are projected into the ring's own planar space
    let projector = Projector::new(&ring.projection).context("Cannot project stations")?;

    let (inside_records, outside_records): (Vec<&StationRecord>, Vec<&StationRecord>) =
        records.iter().partition(|r| r.inside);
    let inside = project_sites(&inside_records, &projector)?;
    let outside = project_sites(&outside_records, &projector)?;

    let classifier = RelevanceClassifier::new(&config).context("Invalid padding options")?;
    let results = classifier
        .classify(&inside, &outside, &ring.planar)
        .context("Classification failed")?;

    let verdicts: Vec<StationVerdict> = outside_records
        .iter()
        .zip(&results)
        .filter(|(_, result)| result.relevant || !args.relevant_only)
        .map(|(record, result)| StationVerdict {
            id: record.id,
            name: &record.name,
            relevant: result.relevant,
        })
        .collect();

    info!(
        "{} of {} outside stations are relevant",
        results.iter().filter(|r| r.relevant).count(),
        results.len()
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            write_verdicts(BufWriter::new(file), &verdicts)?;
            info!("Wrote results to {}", path.display());
        }
        None => write_verdicts(io::stdout().lock(), &verdicts)?,
    }

    Ok(())
}

fn project_sites(records: &[&StationRecord], projector: &Projector) -> Result<Vec<StationSite>> {
    records
        .iter()
        .map(|record| {
            record
                .site(projector)
                .with_context(|| format!("Failed to project station {} ({})", record.id, record.name))
        })
        .collect()
}

fn load_ring(path: &Path) -> Result<BoundaryRing> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open ring file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse ring JSON in {}", path.display()))
}

fn write_verdicts<W: Write>(mut writer: W, verdicts: &[StationVerdict]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, verdicts).context("Failed to write results")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
