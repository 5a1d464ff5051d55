//! AI start-zone placement.
//!
//! Balanced maps place AIs so that every human sees the same AI links:
//! embedded AIs (one per human fragment) share one index selection and one
//! attribute template per slot, and global AIs link into every fragment at
//! the same index. Random maps simply attach each AI to random main regions.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::AiPlacementMode;
use crate::connections::draw_connection_attributes;
use crate::graph::{Attributes, IdGenerator, Link, Region, RegionGraph, RegionId, ZoneType};
use crate::random::{choose, sample_indices};

/// Connection slots of an embedded AI.
pub const EMBEDDED_AI_LINKS: usize = 2;

/// Main regions each AI attaches to on a random-style map.
pub const RANDOM_STYLE_AI_LINKS: usize = 2;

/// A region an AI start zone may link to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub id: RegionId,
    pub zone_type: Option<ZoneType>,
}

/// Connection points of one human player, index-aligned across players.
#[derive(Clone, Debug, Default)]
pub struct PlayerCandidates {
    /// Regions of the player's main-area fragment.
    pub main: Vec<Candidate>,
    /// Non-start regions of the player's starting area.
    pub start: Vec<Candidate>,
}

impl PlayerCandidates {
    fn list(&self, source: Source) -> &[Candidate] {
        match source {
            Source::Main => &self.main,
            Source::Start => &self.start,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Main,
    Start,
}

/// One embedded-AI link, shared by every embedded AI.
#[derive(Clone, Debug)]
struct Slot {
    source: Source,
    index: usize,
    attributes: Attributes,
}

/// Outcome of AI placement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    Placed {
        embedded: usize,
        global: usize,
        mode: AiPlacementMode,
    },
    /// Candidate lists were unusable; no AI was placed.
    Skipped(String),
}

/// New AI start region copied from the template start zone.
fn ai_start_region(template_start: &Region, owner: u8, ids: &mut IdGenerator) -> Region {
    let mut region = Region::start(ids.next_region(), owner);
    region.attributes = template_start.attributes.clone();
    region.attributes.set("player_control", i64::from(owner));
    region
}

fn link_with(world: &mut RegionGraph, a: RegionId, b: RegionId, attributes: &Attributes) {
    if let Link::Created(i) = world.add_connection(a, b, false, false) {
        if let Some(conn) = world.connection_mut(i) {
            conn.apply_template(attributes);
        }
    }
}

/// Lists must have the same lengths and the same zone type at every index.
fn check_alignment(candidates: &[PlayerCandidates]) -> Result<(), String> {
    let Some(first) = candidates.first() else {
        return Err("no human players to anchor AIs to".into());
    };
    for (player, other) in candidates.iter().enumerate().skip(1) {
        for (name, a, b) in [("main", &first.main, &other.main), ("start", &first.start, &other.start)] {
            if a.len() != b.len() {
                return Err(format!(
                    "{} candidate list of player {} has {} entries, player 1 has {}",
                    name,
                    player + 1,
                    b.len(),
                    a.len()
                ));
            }
            if let Some(index) = a.iter().zip(b.iter()).position(|(x, y)| x.zone_type != y.zone_type) {
                return Err(format!(
                    "{} candidate {} differs in zone type between player 1 and player {}",
                    name,
                    index,
                    player + 1
                ));
            }
        }
    }
    Ok(())
}

/// Pick the shared embedded-AI slots for a resolved placement mode.
///
/// Returns the mode actually used, which is `Main` whenever the requested
/// one cannot be satisfied.
fn embedded_slots(
    mode: AiPlacementMode,
    reference: &PlayerCandidates,
    rng: &mut ChaCha8Rng,
) -> (AiPlacementMode, Vec<(Source, usize)>) {
    let main_len = reference.main.len();
    let start_len = reference.start.len();
    let from = |source: Source, indices: Vec<usize>| indices.into_iter().map(move |i| (source, i));

    match mode {
        AiPlacementMode::Start if start_len > 0 => {
            let indices = sample_indices(rng, start_len, EMBEDDED_AI_LINKS);
            (mode, from(Source::Start, indices).collect())
        }
        AiPlacementMode::Both => {
            let splits: Vec<usize> = (1..EMBEDDED_AI_LINKS)
                .filter(|&m| m <= main_len && EMBEDDED_AI_LINKS - m <= start_len)
                .collect();
            match choose(rng, &splits).copied() {
                Some(main_count) => {
                    let main = sample_indices(rng, main_len, main_count);
                    let start = sample_indices(rng, start_len, EMBEDDED_AI_LINKS - main_count);
                    let slots: Vec<(Source, usize)> =
                        from(Source::Main, main).chain(from(Source::Start, start)).collect();
                    (mode, slots)
                }
                None => {
                    warn!(
                        "No main/start split fits {} main and {} start candidates; placing embedded AIs in main",
                        main_len, start_len
                    );
                    embedded_slots(AiPlacementMode::Main, reference, rng)
                }
            }
        }
        AiPlacementMode::Start => {
            warn!("Starting areas offer no AI candidates; placing embedded AIs in main");
            embedded_slots(AiPlacementMode::Main, reference, rng)
        }
        _ => {
            let indices = sample_indices(rng, main_len, EMBEDDED_AI_LINKS);
            (AiPlacementMode::Main, from(Source::Main, indices).collect())
        }
    }
}

/// Place `ai_players` AI start zones on a balanced map.
///
/// With at least one AI per human, one embedded AI goes to each human; the
/// rest (or all of them, with fewer AIs than humans) are global. Owners run
/// from `humans + 1`.
pub fn place_balanced_ais(
    world: &mut RegionGraph,
    candidates: &[PlayerCandidates],
    template_start: &Region,
    ai_players: usize,
    mode: AiPlacementMode,
    ids: &mut IdGenerator,
    rng: &mut ChaCha8Rng,
) -> Placement {
    let humans = candidates.len();
    if ai_players == 0 {
        return Placement::Placed {
            embedded: 0,
            global: 0,
            mode,
        };
    }
    if let Err(reason) = check_alignment(candidates) {
        warn!("Skipping AI placement: {}", reason);
        return Placement::Skipped(reason);
    }

    let reference = &candidates[0];
    let mode = mode.resolve(rng);
    let embedded = if ai_players >= humans { humans } else { 0 };
    let global = ai_players - embedded;
    let mut next_owner = humans + 1;

    let mut used_mode = mode;
    if embedded > 0 {
        let (resolved, picks) = embedded_slots(mode, reference, rng);
        used_mode = resolved;
        let slots: Vec<Slot> = picks
            .into_iter()
            .map(|(source, index)| {
                let target_zone = reference.list(source)[index].zone_type;
                Slot {
                    source,
                    index,
                    attributes: draw_connection_attributes(Some(ZoneType::Start), target_zone, false, rng),
                }
            })
            .collect();
        debug!("Embedded AI slots: {:?}", slots.iter().map(|s| (s.source, s.index)).collect::<Vec<_>>());

        for player in candidates {
            let ai = world.add_region(ai_start_region(template_start, next_owner as u8, ids));
            for slot in &slots {
                let target = player.list(slot.source)[slot.index].id;
                link_with(world, ai, target, &slot.attributes);
            }
            next_owner += 1;
        }
    }

    for _ in 0..global {
        if reference.main.is_empty() {
            break;
        }
        let index = rng.gen_range(0..reference.main.len());
        let attributes =
            draw_connection_attributes(Some(ZoneType::Start), reference.main[index].zone_type, false, rng);
        let ai = world.add_region(ai_start_region(template_start, next_owner as u8, ids));
        for player in candidates {
            link_with(world, ai, player.main[index].id, &attributes);
        }
        debug!("Global AI {} linked at fragment index {}", next_owner, index);
        next_owner += 1;
    }

    info!("Placed {} embedded and {} global AIs ({} placement)", embedded, global, used_mode);
    Placement::Placed {
        embedded,
        global,
        mode: used_mode,
    }
}

/// Random-style AIs: each start zone links to distinct random main regions.
/// Link attributes are left to the bulk pass.
pub fn place_random_ais(
    world: &mut RegionGraph,
    main_regions: &[RegionId],
    template_start: &Region,
    humans: usize,
    ai_players: usize,
    ids: &mut IdGenerator,
    rng: &mut ChaCha8Rng,
) -> Vec<RegionId> {
    let mut placed = Vec::with_capacity(ai_players);
    for n in 0..ai_players {
        let owner = (humans + n + 1) as u8;
        let ai = world.add_region(ai_start_region(template_start, owner, ids));
        for i in sample_indices(rng, main_regions.len(), RANDOM_STYLE_AI_LINKS) {
            world.add_connection(ai, main_regions[i], false, false);
        }
        placed.push(ai);
    }
    if ai_players > 0 {
        info!("Placed {} AI start zones on the main area", ai_players);
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Connection;
    use rand::SeedableRng;

    fn candidates(players: usize, main: &[ZoneType], start: &[ZoneType], world: &mut RegionGraph, ids: &mut IdGenerator) -> Vec<PlayerCandidates> {
        (0..players)
            .map(|_| {
                let mut make = |zones: &[ZoneType]| -> Vec<Candidate> {
                    zones
                        .iter()
                        .map(|&z| {
                            let mut r = Region::new(ids.next_region());
                            r.zone_type = Some(z);
                            let id = world.add_region(r);
                            Candidate { id, zone_type: Some(z) }
                        })
                        .collect()
                };
                PlayerCandidates {
                    main: make(main),
                    start: make(start),
                }
            })
            .collect()
    }

    fn template_start() -> Region {
        let mut r = Region::start(RegionId(0), 1);
        r.attributes.set("zone_size", 30);
        r.attributes.set("player_control", 1);
        r
    }

    fn ai_links(world: &RegionGraph, ai: RegionId) -> Vec<&Connection> {
        world.connections().iter().filter(|c| c.touches(ai)).collect()
    }

    #[test]
    fn test_embedded_ais_are_symmetric() {
        let mut world = RegionGraph::new();
        let mut ids = IdGenerator::starting_at(1);
        let main = [ZoneType::Neutral, ZoneType::Treasure, ZoneType::Junction];
        let start = [ZoneType::Neutral, ZoneType::SuperTreasure];
        let cands = candidates(4, &main, &start, &mut world, &mut ids);
        let mut rng = ChaCha8Rng::seed_from_u64(31);

        let placement = place_balanced_ais(&mut world, &cands, &template_start(), 4, AiPlacementMode::Main, &mut ids, &mut rng);
        assert_eq!(placement, Placement::Placed { embedded: 4, global: 0, mode: AiPlacementMode::Main });

        let ais: Vec<&Region> = world.regions().iter().filter(|r| r.is_start).collect();
        assert_eq!(ais.len(), 4);
        let owners: Vec<u8> = ais.iter().filter_map(|r| r.owner).collect();
        assert_eq!(owners, vec![5, 6, 7, 8]);

        let reference: Vec<Attributes> = ai_links(&world, ais[0].id).iter().map(|c| c.attributes.clone()).collect();
        assert_eq!(reference.len(), 2);
        for ai in &ais {
            assert_eq!(ai.attributes.int("zone_size"), 30);
            assert_eq!(ai.attributes.int("player_control"), i64::from(ai.owner.unwrap()));
            let attrs: Vec<Attributes> = ai_links(&world, ai.id).iter().map(|c| c.attributes.clone()).collect();
            assert_eq!(attrs, reference);
        }
    }

    #[test]
    fn test_both_mode_uses_each_list() {
        let mut world = RegionGraph::new();
        let mut ids = IdGenerator::starting_at(1);
        let cands = candidates(2, &[ZoneType::Neutral; 3], &[ZoneType::Treasure; 2], &mut world, &mut ids);
        let mut rng = ChaCha8Rng::seed_from_u64(32);

        place_balanced_ais(&mut world, &cands, &template_start(), 2, AiPlacementMode::Both, &mut ids, &mut rng);
        for (player, ai) in cands.iter().zip(world.regions().iter().filter(|r| r.is_start)) {
            let links = ai_links(&world, ai.id);
            let in_main = links.iter().filter(|c| player.main.iter().any(|m| c.touches(m.id))).count();
            let in_start = links.iter().filter(|c| player.start.iter().any(|s| c.touches(s.id))).count();
            assert_eq!((in_main, in_start), (1, 1));
        }
    }

    #[test]
    fn test_both_mode_falls_back_to_main() {
        let mut world = RegionGraph::new();
        let mut ids = IdGenerator::starting_at(1);
        let cands = candidates(2, &[ZoneType::Neutral; 3], &[], &mut world, &mut ids);
        let mut rng = ChaCha8Rng::seed_from_u64(33);

        let placement = place_balanced_ais(&mut world, &cands, &template_start(), 2, AiPlacementMode::Both, &mut ids, &mut rng);
        assert_eq!(placement, Placement::Placed { embedded: 2, global: 0, mode: AiPlacementMode::Main });
    }

    #[test]
    fn test_global_ais_link_every_fragment() {
        let mut world = RegionGraph::new();
        let mut ids = IdGenerator::starting_at(1);
        let cands = candidates(3, &[ZoneType::Neutral, ZoneType::Treasure], &[ZoneType::Neutral], &mut world, &mut ids);
        let mut rng = ChaCha8Rng::seed_from_u64(34);

        let placement = place_balanced_ais(&mut world, &cands, &template_start(), 2, AiPlacementMode::Main, &mut ids, &mut rng);
        assert_eq!(placement, Placement::Placed { embedded: 0, global: 2, mode: AiPlacementMode::Main });
        for ai in world.regions().iter().filter(|r| r.is_start) {
            let links = ai_links(&world, ai.id);
            assert_eq!(links.len(), 3);
            assert!(links.windows(2).all(|w| w[0].attributes == w[1].attributes));
        }
    }

    #[test]
    fn test_mismatched_lists_skip_placement() {
        let mut world = RegionGraph::new();
        let mut ids = IdGenerator::starting_at(1);
        let mut cands = candidates(2, &[ZoneType::Neutral; 2], &[ZoneType::Neutral], &mut world, &mut ids);
        cands[1].main.pop();
        let mut rng = ChaCha8Rng::seed_from_u64(35);

        let before = world.region_count();
        let placement = place_balanced_ais(&mut world, &cands, &template_start(), 2, AiPlacementMode::Main, &mut ids, &mut rng);
        assert!(matches!(placement, Placement::Skipped(_)));
        assert_eq!(world.region_count(), before);
    }

    #[test]
    fn test_random_style_ais_take_two_main_links() {
        let mut world = RegionGraph::new();
        let mut ids = IdGenerator::starting_at(1);
        let main: Vec<RegionId> = (0..5).map(|_| world.add_region(Region::new(ids.next_region()))).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(36);

        let ais = place_random_ais(&mut world, &main, &template_start(), 3, 2, &mut ids, &mut rng);
        assert_eq!(ais.len(), 2);
        for (n, &ai) in ais.iter().enumerate() {
            assert_eq!(world.region(ai).unwrap().owner, Some(4 + n as u8));
            assert_eq!(world.neighbors(ai).len(), 2);
        }
    }
}
