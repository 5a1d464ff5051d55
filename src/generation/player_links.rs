//! Links between each player's starting area and the main area.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::balanced::BalancedMain;
use super::starting_area::{PlayerArea, StartingAreaTemplate};
use crate::connections::draw_connection_attributes;
use crate::graph::{Attributes, Link, RegionGraph, RegionId};
use crate::random::{choose, sample_indices};

/// Player-to-main links per player in the random style.
pub const RANDOM_STYLE_LINKS: usize = 2;

/// Link counts a balanced map picks from, once per run.
pub const BALANCED_LINK_CHOICES: [usize; 2] = [2, 3];

/// Random style: two template indices drawn once, then two distinct main
/// targets per player. Attributes are drawn per link.
pub fn wire_random(
    world: &mut RegionGraph,
    areas: &[PlayerArea],
    template: &StartingAreaTemplate,
    main_regions: &[RegionId],
    rng: &mut ChaCha8Rng,
) {
    if main_regions.is_empty() || template.is_empty() {
        return;
    }

    let indices: Vec<usize> = if template.len() == 1 {
        vec![0; RANDOM_STYLE_LINKS]
    } else {
        (0..RANDOM_STYLE_LINKS)
            .map(|_| rng.gen_range(0..template.len()))
            .collect()
    };

    for area in areas {
        let (targets, allow_double) = if main_regions.len() >= RANDOM_STYLE_LINKS {
            let picked = sample_indices(rng, main_regions.len(), RANDOM_STYLE_LINKS);
            (picked.into_iter().map(|i| main_regions[i]).collect::<Vec<_>>(), false)
        } else {
            (vec![main_regions[0]; RANDOM_STYLE_LINKS], true)
        };

        for (&index, &target) in indices.iter().zip(&targets) {
            let source = area.regions[index];
            let link = world.add_connection(source, target, true, allow_double);
            if let Link::Created(i) = link {
                let (a, b) = (world.zone_type_of(source), world.zone_type_of(target));
                let attributes = draw_connection_attributes(a, b, true, rng);
                if let Some(conn) = world.connection_mut(i) {
                    conn.attributes = attributes;
                }
            }
        }
        debug!("Player {} linked to main regions {:?}", area.owner, targets);
    }
}

/// One symmetric player-to-main slot: template index, fragment index and
/// the attributes shared by every player's copy of the link.
#[derive(Clone, Debug)]
pub struct PlayerLinkSlot {
    pub template_index: usize,
    pub fragment_index: usize,
    pub attributes: Attributes,
}

/// Balanced style: `k ∈ {2, 3}` slots drawn once and replayed for every
/// player against that player's own fragment.
pub fn wire_balanced(
    world: &mut RegionGraph,
    areas: &[PlayerArea],
    template: &StartingAreaTemplate,
    main: &BalancedMain,
    rng: &mut ChaCha8Rng,
) -> Vec<PlayerLinkSlot> {
    let k = choose(rng, &BALANCED_LINK_CHOICES).copied().unwrap_or(2);
    let template_indices = sample_indices(rng, template.len(), k);
    let fragment_indices = sample_indices(rng, main.fragment_size(), k);

    let slots: Vec<PlayerLinkSlot> = template_indices
        .into_iter()
        .zip(fragment_indices)
        .map(|(template_index, fragment_index)| {
            let attributes = draw_connection_attributes(
                template.zone_at(template_index),
                main.zone_at(fragment_index),
                true,
                rng,
            );
            PlayerLinkSlot {
                template_index,
                fragment_index,
                attributes,
            }
        })
        .collect();

    for (area, fragment) in areas.iter().zip(&main.fragments) {
        for slot in &slots {
            let source = area.regions[slot.template_index];
            let target = fragment[slot.fragment_index];
            if let Link::Created(i) = world.add_connection(source, target, true, false) {
                if let Some(conn) = world.connection_mut(i) {
                    conn.apply_template(&slot.attributes);
                }
            }
        }
    }
    debug!("Balanced player links use {} slots", slots.len());
    slots
}
