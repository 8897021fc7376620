use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ZoneError;
use crate::projection::ProjectionReference;

/// Default RDP tolerance in projected metres
pub const DEFAULT_EPSILON: f64 = 1.0;
pub const DEFAULT_PADDING_RADIUS_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_PADDING_POINT_COUNT: usize = 64;

/// Batch configuration file: shared options plus one entry per region
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub global: ZoneConfig,
    pub regions: Vec<RegionConfig>,
}

/// Options for one boundary/catchment computation
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ZoneConfig {
    /// Simplification tolerance (projected units)
    pub epsilon: f64,
    /// Padding ring radius as a multiple of the furthest site's distance
    pub padding_radius_multiplier: f64,
    /// Number of padding sites; 0 disables the padding ring
    pub padding_point_count: usize,
    /// Planar reference system the geometry is computed in
    pub projection: ProjectionReference,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    pub name: String,
    /// Overpass JSON response holding the region's boundary relation
    pub boundary_file: PathBuf,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            padding_radius_multiplier: DEFAULT_PADDING_RADIUS_MULTIPLIER,
            padding_point_count: DEFAULT_PADDING_POINT_COUNT,
            projection: ProjectionReference::default(),
        }
    }
}

impl ZoneConfig {
    pub fn validate(&self) -> Result<(), ZoneError> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ZoneError::InvalidEpsilon(self.epsilon));
        }
        if !(self.padding_radius_multiplier.is_finite() && self.padding_radius_multiplier > 0.0) {
            return Err(ZoneError::InvalidConfig(format!(
                "padding_radius_multiplier must be positive, got {}",
                self.padding_radius_multiplier
            )));
        }
        if matches!(self.padding_point_count, 1 | 2) {
            return Err(ZoneError::InvalidConfig(format!(
                "padding_point_count must be 0 or at least 3, got {}",
                self.padding_point_count
            )));
        }
        Ok(())
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config
            .global
            .validate()
            .context("Invalid [global] options in config file")?;
        Ok(config)
    }
}
