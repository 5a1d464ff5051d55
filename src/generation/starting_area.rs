//! Player starting areas.
//!
//! One template is drawn per run and cloned for every human player, so all
//! players start from identical zones and internal links.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::ManualOverrides;
use crate::connections::assign_all_connection_attributes;
use crate::error::{GenerationError, GenerationResult};
use crate::graph::{build_connected_graph, IdGenerator, Region, RegionGraph, RegionId, ZoneType};
use crate::zones::{assign_zone_attributes, classify_regions, ZoneTable};

/// Fully attributed starting area that is only ever copied, never placed.
#[derive(Clone, Debug)]
pub struct StartingAreaTemplate {
    graph: RegionGraph,
}

/// A human player's copy of the template, as placed in the world.
#[derive(Clone, Debug)]
pub struct PlayerArea {
    pub owner: u8,
    pub start_id: RegionId,
    /// Region ids index-aligned with the template's regions.
    pub regions: Vec<RegionId>,
}

impl StartingAreaTemplate {
    /// Build, classify and attribute a starting area of `size` regions.
    ///
    /// Ids are local to the template; they never reach the world.
    pub fn generate(
        size: usize,
        avg_links: f64,
        overrides: &ManualOverrides,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut local_ids = IdGenerator::new();
        let mut graph = build_connected_graph(size, avg_links, &mut local_ids, rng);

        if graph.region_count() > 0 {
            let start = rng.gen_range(0..graph.region_count());
            graph.regions_mut()[start].is_start = true;
        }

        classify_regions(&mut graph, ZoneTable::StartingArea, rng);
        for region in graph.regions_mut() {
            assign_zone_attributes(region, overrides, rng);
        }
        assign_all_connection_attributes(&mut graph, rng);

        debug!("Starting-area template: {}", graph);
        Self { graph }
    }

    pub fn graph(&self) -> &RegionGraph {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.graph.region_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.region_count() == 0
    }

    /// Zone type of the template region at `index`.
    pub fn zone_at(&self, index: usize) -> Option<ZoneType> {
        self.graph.regions().get(index).and_then(|r| r.zone_type)
    }

    /// The template's start region, copied for every AI start zone.
    pub fn start_region(&self) -> Option<&Region> {
        self.graph
            .regions()
            .iter()
            .find(|r| r.zone_type == Some(ZoneType::Start))
    }

    /// Copy the template for player `owner` with fresh ids and apply the
    /// faction rules to its towns.
    pub fn instantiate(
        &self,
        owner: u8,
        ids: &mut IdGenerator,
        same_faction_towns: usize,
        different_faction_towns: usize,
    ) -> GenerationResult<(RegionGraph, PlayerArea)> {
        let (mut graph, regions) = self.graph.replicate(ids, Some(owner));

        let start = graph
            .regions_mut()
            .iter_mut()
            .find(|r| r.is_start)
            .ok_or(GenerationError::MissingStartTemplate)?;
        start.attributes.set("player_control", i64::from(owner));
        let start_id = start.id;

        apply_town_rules(&mut graph, start_id, same_faction_towns, different_faction_towns);

        let area = PlayerArea {
            owner,
            start_id,
            regions,
        };
        Ok((graph, area))
    }
}

/// Tag the first `same` town-bearing regions with the player's faction and
/// the next `different` with a foreign one. Start regions are never tagged.
pub fn apply_town_rules(graph: &mut RegionGraph, start_id: RegionId, same: usize, different: usize) {
    let candidates = graph
        .regions_mut()
        .iter_mut()
        .filter(|r| !r.is_start && r.has_town());

    for (n, region) in candidates.take(same + different).enumerate() {
        let prefix = if n < same { "ns" } else { "nd" };
        region
            .attributes
            .set("town_type_rules", format!("{}{}_p", prefix, start_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn template(seed: u64, size: usize) -> StartingAreaTemplate {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        StartingAreaTemplate::generate(size, 2.0, &ManualOverrides::default(), &mut rng)
    }

    #[test]
    fn test_template_has_exactly_one_start() {
        for seed in 0..20 {
            let t = template(seed, 4);
            let starts = t.graph().regions().iter().filter(|r| r.is_start).count();
            assert_eq!(starts, 1);
            assert_eq!(t.start_region().map(|r| r.is_start), Some(true));
            assert!(t.graph().connections().iter().all(|c| !c.attributes.is_empty()));
        }
    }

    #[test]
    fn test_clones_are_identical_apart_from_ids_and_control() {
        let t = template(3, 4);
        let mut ids = IdGenerator::starting_at(1);
        let (g1, a1) = t.instantiate(1, &mut ids, 0, 0).unwrap();
        let (g2, a2) = t.instantiate(2, &mut ids, 0, 0).unwrap();

        assert_eq!(a1.regions.len(), 4);
        assert!(a1.regions.iter().all(|id| !a2.regions.contains(id)));
        for (r1, r2) in g1.regions().iter().zip(g2.regions()) {
            assert_eq!(r1.zone_type, r2.zone_type);
            if r1.is_start {
                assert_eq!(r1.attributes.int("player_control"), 1);
                assert_eq!(r2.attributes.int("player_control"), 2);
            } else {
                assert_eq!(r1.attributes, r2.attributes);
            }
        }
        for (c1, c2) in g1.connections().iter().zip(g2.connections()) {
            assert_eq!(c1.attributes, c2.attributes);
        }
    }

    #[test]
    fn test_town_rules_follow_region_order() {
        let mut g = RegionGraph::new();
        g.add_region(Region::start(RegionId(1), 1));
        for id in 2..=5 {
            let mut r = Region::new(RegionId(id));
            r.zone_type = Some(ZoneType::Neutral);
            r.attributes.set("neutral_towns_min", if id == 3 { 0 } else { 1 });
            g.add_region(r);
        }

        apply_town_rules(&mut g, RegionId(1), 1, 1);
        let rule = |id: u32| g.region(RegionId(id)).unwrap().attributes.render("town_type_rules");
        assert_eq!(rule(2), "ns1_p");
        assert_eq!(rule(3), "");
        assert_eq!(rule(4), "nd1_p");
        assert_eq!(rule(5), "");
        assert_eq!(rule(1), "");
    }
}
