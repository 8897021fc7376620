use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hashbrown::HashMap;
use rayon::prelude::*;
use tracing::{error, info};

use transitzone::config::{Config, RegionConfig};

use crate::{build_ring_from_file, write_ring, Args};

pub fn run_batch(config_path: PathBuf, args: Args) -> Result<()> {
    let config = Config::load_from_file(&config_path)?;
    let zone_config = args.zone_config(&config.global)?;

    info!("Building rings for {} regions", config.regions.len());

    std::fs::create_dir_all(&args.output).with_context(|| {
        format!("Failed to create output directory {}", args.output.display())
    })?;

    let planned = plan_outputs(&config.regions, &args.output)?;

    let outcomes: Vec<(&RegionConfig, Result<PathBuf>)> = planned
        .into_par_iter()
        .map(|(region, output)| {
            let outcome = build_ring_from_file(&region.boundary_file, &zone_config)
                .and_then(|ring| write_ring(&ring, &output))
                .map(|_| output);
            (region, outcome)
        })
        .collect();

    let mut failed = 0;
    for (region, outcome) in &outcomes {
        match outcome {
            Ok(path) => info!("{}: wrote {}", region.name, path.display()),
            Err(e) => {
                error!("{}: {:?}", region.name, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} regions failed", failed, outcomes.len());
    }
    info!("Batch complete");
    Ok(())
}

/// Pair each region with its output file, refusing two regions that would
/// write the same file
fn plan_outputs<'a>(
    regions: &'a [RegionConfig],
    dir: &Path,
) -> Result<Vec<(&'a RegionConfig, PathBuf)>> {
    let mut claimed: HashMap<String, &str> = HashMap::new();
    let mut planned = Vec::with_capacity(regions.len());

    for region in regions {
        let file_name = output_file_name(&region.name);
        if let Some(other) = claimed.insert(file_name.clone(), &region.name) {
            anyhow::bail!(
                "Regions '{}' and '{}' would both write {}",
                other,
                region.name,
                file_name
            );
        }
        planned.push((region, dir.join(file_name)));
    }
    Ok(planned)
}

/// `City of London` -> `city_of_london.json`
fn output_file_name(region: &str) -> String {
    let slug: String = region
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.json", slug)
}
