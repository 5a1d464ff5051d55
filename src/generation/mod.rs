//! World assembly
//!
//! `generate_world` runs the whole pipeline on one random stream: the main
//! area, the starting-area template and its per-player copies, the
//! player-to-main links, AI start zones, and finally the bulk connection
//! pass and validation.

pub mod ai;
pub mod balanced;
pub mod player_links;
pub mod starting_area;

use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::{GenerationConfig, MapStyle};
use crate::connections::assign_all_connection_attributes;
use crate::error::{GenerationError, GenerationResult};
use crate::graph::{build_connected_graph, IdGenerator, RegionGraph, RegionId, ZoneType};
use crate::zones::{assign_zone_attributes, classify_regions, missing_keys, ZoneTable};

pub use ai::{Candidate, Placement, PlayerCandidates};
pub use balanced::BalancedMain;
pub use starting_area::{PlayerArea, StartingAreaTemplate};

/// Main area as built for either map style.
enum MainArea {
    Random(Vec<RegionId>),
    Balanced(BalancedMain),
}

/// Generate a complete world for `config`.
///
/// The configuration is validated before the first draw. The same config
/// and seed always yield the same world.
pub fn generate_world(config: &GenerationConfig, rng: &mut ChaCha8Rng) -> GenerationResult<RegionGraph> {
    config.validate()?;
    let humans = config.human_players;
    info!(
        "Generating {} map for {} human and {} AI players",
        config.map_style, humans, config.ai_players
    );

    let mut ids = IdGenerator::starting_at(1);
    let mut world = RegionGraph::new();

    let main_size = config.main_area_size.draw(rng);
    let main = match config.map_style {
        MapStyle::Random => {
            let mut graph = build_connected_graph(main_size, config.avg_links_main, &mut ids, rng);
            classify_regions(&mut graph, ZoneTable::MainRandom, rng);
            for region in graph.regions_mut() {
                assign_zone_attributes(region, &config.overrides, rng);
            }
            let regions: Vec<RegionId> = graph.regions().iter().map(|r| r.id).collect();
            info!("Main area: {} regions, {} connections", graph.region_count(), graph.connection_count());
            world.merge(graph);
            MainArea::Random(regions)
        }
        MapStyle::Balanced => {
            let mut balanced = balanced::generate_balanced_main(
                main_size,
                humans,
                config.avg_links_main,
                &config.overrides,
                &mut ids,
                rng,
            )?;
            world.merge(std::mem::take(&mut balanced.graph));
            MainArea::Balanced(balanced)
        }
    };

    let start_size = config.start_area_size.draw(rng);
    let template = StartingAreaTemplate::generate(start_size, config.avg_links_player, &config.overrides, rng);
    if config.ai_players > 0 && template.start_region().is_none() {
        return Err(GenerationError::MissingStartTemplate);
    }

    let mut areas = Vec::with_capacity(humans);
    for owner in 1..=humans {
        let (graph, area) = template.instantiate(
            owner as u8,
            &mut ids,
            config.same_faction_towns,
            config.different_faction_towns,
        )?;
        world.merge(graph);
        areas.push(area);
    }
    info!("Placed {} starting areas of {} regions", humans, template.len());

    match &main {
        MainArea::Random(regions) => {
            player_links::wire_random(&mut world, &areas, &template, regions, rng);
            if let Some(start) = template.start_region() {
                let placed = ai::place_random_ais(&mut world, regions, start, humans, config.ai_players, &mut ids, rng);
                debug!("AI start regions: {:?}", placed);
            }
        }
        MainArea::Balanced(balanced) => {
            player_links::wire_balanced(&mut world, &areas, &template, balanced, rng);
            if let Some(start) = template.start_region() {
                let candidates = collect_candidates(&world, &areas, balanced);
                let placement = ai::place_balanced_ais(
                    &mut world,
                    &candidates,
                    start,
                    config.ai_players,
                    config.ai_placement,
                    &mut ids,
                    rng,
                );
                debug!("AI placement: {:?}", placement);
            }
        }
    }

    let assigned = assign_all_connection_attributes(&mut world, rng);
    debug!("Bulk pass assigned {} connections", assigned);

    validate_world(&world)?;
    info!(
        "World complete: {} regions, {} connections",
        world.region_count(),
        world.connection_count()
    );
    debug!("{}", world);
    Ok(world)
}

/// Per-player AI candidates: the player's fragment and the non-start
/// regions of the player's starting area.
fn collect_candidates(world: &RegionGraph, areas: &[PlayerArea], main: &BalancedMain) -> Vec<PlayerCandidates> {
    let candidate = |id: RegionId| Candidate {
        id,
        zone_type: world.zone_type_of(id),
    };

    areas
        .iter()
        .zip(&main.fragments)
        .map(|(area, fragment)| PlayerCandidates {
            main: fragment.iter().copied().map(candidate).collect(),
            start: area
                .regions
                .iter()
                .copied()
                .filter(|&id| id != area.start_id)
                .map(candidate)
                .collect(),
        })
        .collect()
}

/// Structural checks plus attribute completeness of every region.
pub fn validate_world(world: &RegionGraph) -> GenerationResult<()> {
    world.validate_structure().map_err(GenerationError::Malformed)?;

    for region in world.regions() {
        if region.zone_type.is_none() {
            return Err(GenerationError::Malformed(format!("region {} has no zone type", region.id)));
        }
        let missing = missing_keys(region);
        if !missing.is_empty() {
            return Err(GenerationError::Malformed(format!(
                "region {} is missing attributes: {}",
                region.id,
                missing.join(", ")
            )));
        }
    }
    Ok(())
}

/// Regions per zone type, for summaries.
pub fn zone_counts(world: &RegionGraph) -> Vec<(ZoneType, usize)> {
    ZoneType::all()
        .iter()
        .map(|&zone| {
            let n = world.regions().iter().filter(|r| r.zone_type == Some(zone)).count();
            (zone, n)
        })
        .collect()
}
