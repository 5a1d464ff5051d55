//! Symmetric main area for the balanced map style.
//!
//! One base fragment is drawn and attributed, then replicated once per human
//! player. Every link between fragments and every link to the optional
//! central region is drawn once against base-fragment indices and replayed
//! verbatim for each fragment, so all players see the same main area.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::ManualOverrides;
use crate::connections::{assign_all_connection_attributes, draw_connection_attributes};
use crate::error::{GenerationError, GenerationResult};
use crate::graph::{
    build_connected_graph, Attributes, IdGenerator, Link, Region, RegionGraph, RegionId, ZoneType,
};
use crate::random::chance;
use crate::zones::{assign_zone_attributes, classify_regions, ZoneTable};

/// Chance that a shared central region is added.
const CENTRAL_REGION_CHANCE: f64 = 0.5;

/// Link replayed between every fragment `i` and fragment `i + 1`.
#[derive(Clone, Debug)]
pub struct CrossLinkTemplate {
    pub from_index: usize,
    pub to_index: usize,
    pub attributes: Attributes,
}

/// Main area assembled from identical fragments.
#[derive(Clone, Debug)]
pub struct BalancedMain {
    pub graph: RegionGraph,
    /// Base fragment the clones were copied from; never placed in the world.
    pub base: RegionGraph,
    /// Per player, fragment region ids index-aligned with `base`.
    pub fragments: Vec<Vec<RegionId>>,
    pub cross_links: Vec<CrossLinkTemplate>,
    pub central: Option<RegionId>,
}

impl BalancedMain {
    pub fn fragment_size(&self) -> usize {
        self.base.region_count()
    }

    /// Zone type of the base-fragment region at `index`.
    pub fn zone_at(&self, index: usize) -> Option<ZoneType> {
        self.base.regions().get(index).and_then(|r| r.zone_type)
    }
}

/// Build the balanced main area for `players` humans from a drawn main size.
pub fn generate_balanced_main(
    main_size: usize,
    players: usize,
    avg_links: f64,
    overrides: &ManualOverrides,
    ids: &mut IdGenerator,
    rng: &mut ChaCha8Rng,
) -> GenerationResult<BalancedMain> {
    let fragment_size = if players == 0 { 0 } else { main_size / players };
    if fragment_size == 0 {
        return Err(GenerationError::EmptyFragment { main_size, players });
    }

    let base = build_base_fragment(fragment_size, avg_links, overrides, rng);
    info!(
        "Balanced main area: {} fragments of {} regions ({} drawn)",
        players, fragment_size, main_size
    );

    let mut graph = RegionGraph::new();
    let mut fragments = Vec::with_capacity(players);
    for _ in 0..players {
        let (clone, aligned) = base.replicate(ids, None);
        graph.merge(clone);
        fragments.push(aligned);
    }

    let cross_links = draw_cross_links(&base, rng);
    for template in &cross_links {
        for i in 0..players {
            let next = (i + 1) % players;
            let a = fragments[i][template.from_index];
            let b = fragments[next][template.to_index];
            connect_with(&mut graph, a, b, &template.attributes);
        }
    }
    debug!("Replayed {} cross-link templates over {} fragments", cross_links.len(), players);

    let central = add_central_region(&mut graph, &base, &fragments, overrides, ids, rng);

    Ok(BalancedMain {
        graph,
        base,
        fragments,
        cross_links,
        central,
    })
}

fn build_base_fragment(
    size: usize,
    avg_links: f64,
    overrides: &ManualOverrides,
    rng: &mut ChaCha8Rng,
) -> RegionGraph {
    let mut local_ids = IdGenerator::new();
    let mut base = build_connected_graph(size, avg_links, &mut local_ids, rng);
    classify_regions(&mut base, ZoneTable::MainBalanced, rng);
    for region in base.regions_mut() {
        assign_zone_attributes(region, overrides, rng);
    }
    assign_all_connection_attributes(&mut base, rng);
    base
}

/// Cross-link count is `U[2, m]`, or 1 for a single-region fragment.
fn draw_cross_links(base: &RegionGraph, rng: &mut ChaCha8Rng) -> Vec<CrossLinkTemplate> {
    let m = base.region_count();
    let count = if m <= 1 { 1 } else { rng.gen_range(2..=m) };
    let zone = |i: usize| base.regions()[i].zone_type;

    (0..count)
        .map(|_| {
            let from_index = rng.gen_range(0..m);
            let to_index = rng.gen_range(0..m);
            let attributes = draw_connection_attributes(zone(from_index), zone(to_index), false, rng);
            CrossLinkTemplate {
                from_index,
                to_index,
                attributes,
            }
        })
        .collect()
}

/// Add a double-allowed link carrying `attributes`. Equal endpoints are skipped.
fn connect_with(graph: &mut RegionGraph, a: RegionId, b: RegionId, attributes: &Attributes) -> Option<usize> {
    if a == b {
        return None;
    }
    match graph.add_connection(a, b, false, true) {
        Link::Created(index) => {
            if let Some(conn) = graph.connection_mut(index) {
                conn.apply_template(attributes);
            }
            Some(index)
        }
        Link::Existing(_) => None,
    }
}

fn add_central_region(
    graph: &mut RegionGraph,
    base: &RegionGraph,
    fragments: &[Vec<RegionId>],
    overrides: &ManualOverrides,
    ids: &mut IdGenerator,
    rng: &mut ChaCha8Rng,
) -> Option<RegionId> {
    if !chance(rng, CENTRAL_REGION_CHANCE) {
        return None;
    }

    let zone = if chance(rng, 0.3) {
        ZoneType::Treasure
    } else {
        ZoneType::SuperTreasure
    };
    let mut central = Region::new(ids.next_region());
    central.zone_type = Some(zone);
    assign_zone_attributes(&mut central, overrides, rng);

    let index = rng.gen_range(0..base.region_count());
    let target_zone = base.regions()[index].zone_type;
    let attributes = draw_connection_attributes(Some(zone), target_zone, false, rng);

    let id = graph.add_region(central);
    for fragment in fragments {
        connect_with(graph, id, fragment[index], &attributes);
    }
    info!("Central {} region {} linked to fragment index {}", zone, id, index);
    Some(id)
}
