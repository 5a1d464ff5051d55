use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::graph::{RegionGraph, ZoneType};

/// Cumulative classification tables for untyped regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneTable {
    /// Main area of a random-style map.
    MainRandom,
    /// Base fragment of a balanced-style map.
    MainBalanced,
    /// Non-start regions of a player's starting area.
    StartingArea,
}

impl ZoneTable {
    /// `(zone, cumulative upper bound)` pairs; the last entry catches the rest.
    fn thresholds(&self) -> &'static [(ZoneType, f64)] {
        match self {
            Self::MainRandom => &[
                (ZoneType::Junction, 0.1),
                (ZoneType::Neutral, 0.4),
                (ZoneType::Treasure, 0.8),
                (ZoneType::SuperTreasure, 1.0),
            ],
            Self::MainBalanced => &[
                (ZoneType::Junction, 0.1),
                (ZoneType::Neutral, 0.4),
                (ZoneType::Treasure, 0.7),
                (ZoneType::SuperTreasure, 1.0),
            ],
            Self::StartingArea => &[
                (ZoneType::Neutral, 0.7),
                (ZoneType::Treasure, 0.9),
                (ZoneType::SuperTreasure, 1.0),
            ],
        }
    }

    pub fn draw(&self, rng: &mut ChaCha8Rng) -> ZoneType {
        let roll = rng.gen::<f64>();
        let table = self.thresholds();
        table
            .iter()
            .find(|(_, bound)| roll < *bound)
            .map(|(zone, _)| *zone)
            .unwrap_or(table[table.len() - 1].0)
    }
}

/// Classify one region: start regions are always [`ZoneType::Start`] and
/// never consume a draw.
pub fn classify_one(is_start: bool, table: ZoneTable, rng: &mut ChaCha8Rng) -> ZoneType {
    if is_start {
        ZoneType::Start
    } else {
        table.draw(rng)
    }
}

/// Set the zone type of every region in `graph`, in region order.
pub fn classify_regions(graph: &mut RegionGraph, table: ZoneTable, rng: &mut ChaCha8Rng) {
    for region in graph.regions_mut() {
        region.zone_type = Some(classify_one(region.is_start, table, rng));
    }
}
