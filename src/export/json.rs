//! JSON dump of a generated world, for inspection and tooling.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::config::GenerationConfig;
use crate::error::ExportError;
use crate::generation::zone_counts;
use crate::graph::RegionGraph;

#[derive(Serialize)]
struct ExportMetadata<'a> {
    seed: u64,
    generated_at: String,
    config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct ZoneCount {
    zone_type: String,
    regions: usize,
}

#[derive(Serialize)]
struct WorldExport<'a> {
    metadata: ExportMetadata<'a>,
    zone_counts: Vec<ZoneCount>,
    world: &'a RegionGraph,
}

/// Write `world` together with the seed and config that produced it.
pub fn write_world_json(
    world: &RegionGraph,
    config: &GenerationConfig,
    seed: u64,
    path: &Path,
) -> Result<(), ExportError> {
    let export = WorldExport {
        metadata: ExportMetadata {
            seed,
            generated_at: chrono::Local::now().to_rfc3339(),
            config,
        },
        zone_counts: zone_counts(world)
            .into_iter()
            .map(|(zone, regions)| ZoneCount {
                zone_type: zone.to_string(),
                regions,
            })
            .collect(),
        world,
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &export)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generate_world;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_json_dump_lists_every_region() {
        let config = GenerationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let world = generate_world(&config, &mut rng).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        write_world_json(&world, &config, 31, &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["metadata"]["seed"], 31);
        assert_eq!(value["world"]["regions"].as_array().unwrap().len(), world.region_count());
        assert_eq!(value["world"]["connections"].as_array().unwrap().len(), world.connection_count());
    }
}
