use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::info;

use transitzone::models::{GeoPoint, StationSite};
use transitzone::projection::Projector;

/// One row of the stations CSV: `id,name,lat,lon,inside`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StationRecord {
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// `true` when the station lies within the boundary
    pub inside: bool,
}

impl StationRecord {
    pub fn site(&self, projector: &Projector) -> transitzone::Result<StationSite> {
        let location = projector.project(&GeoPoint::new(self.lat, self.lon))?;
        Ok(if self.inside {
            StationSite::inside(self.id, location)
        } else {
            StationSite::outside(self.id, location)
        })
    }
}

pub fn load_stations(path: &Path) -> Result<Vec<StationRecord>> {
    info!("Loading stations from {}", path.display());

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open stations file {}", path.display()))?;

    let mut stations = Vec::new();
    for (line, record) in reader.deserialize().enumerate() {
        let station: StationRecord =
            record.with_context(|| format!("Bad station record on row {}", line + 1))?;
        stations.push(station);
    }

    info!(
        "Loaded {} stations ({} inside)",
        stations.len(),
        stations.iter().filter(|s| s.inside).count()
    );
    Ok(stations)
}
