//! Zone attribute assignment.
//!
//! Attributes are filled in a fixed phase order: base rules, resources,
//! terrain and monsters, treasure tiers, then meta parameters. Later phases
//! read what earlier ones wrote (resources and terrain both depend on the
//! town and castle minimums set by the base rules).

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::rules::base_rules;
use crate::config::ManualOverrides;
use crate::graph::{Attributes, Region, ZoneType};
use crate::random::{chance, choose, jitter, pick_subset, weighted_index};

pub const RESOURCES: [&str; 7] = ["wood", "mercury", "ore", "sulfur", "crystals", "gems", "gold"];
pub const RARE_RESOURCES: [&str; 4] = ["mercury", "sulfur", "crystals", "gems"];
pub const TERRAIN_SLOTS: usize = 10;
pub const MONSTER_TYPE_SLOTS: usize = 12;

const TREASURE_DENSITIES: [i64; 3] = [9, 6, 1];

const META_BLANK_KEYS: [&str; 9] = [
    "UI_position",
    "zone_faction_force_neutral",
    "zone_repulsion",
    "town_type_rules",
    "shipyard_density",
    "terrain_type_rule",
    "customized_allowed_factions_bitmap",
    "zone_faction_rule",
    "custom_monster_disposition",
];

const META_DRAWN_KEYS: [&str; 6] = [
    "allow_non_coherent_road",
    "monster_disposition",
    "joining_percent",
    "join_only_for_money",
    "shipyard_min",
    "max_road_block_value",
];

/// Fill every attribute of `region` for its zone type.
///
/// Regions without a zone type get no base rules; the remaining phases fall
/// back to neutral behaviour for them.
pub fn assign_zone_attributes(region: &mut Region, overrides: &ManualOverrides, rng: &mut ChaCha8Rng) {
    if let Some(zone) = region.zone_type {
        for (key, rule) in base_rules(zone) {
            let value = rule.evaluate(region, rng);
            region.attributes.set(key, value);
        }
    }

    let resources = resource_attributes(region, rng);
    region.attributes.extend(resources);

    let terrain = terrain_and_monster_attributes(region, rng);
    region.attributes.extend(terrain);

    let treasure = treasure_attributes(region.zone_type, rng);
    region.attributes.extend(treasure);

    let meta = meta_attributes(region.zone_type, overrides, rng);
    region.attributes.extend(meta);
}

/// Set `wood_min` and `ore_min` for zones that carry a castle, or a town half the time.
fn settlement_basics(res: &mut Attributes, towns: i64, castles: i64, rng: &mut ChaCha8Rng) {
    if castles > 0 || (towns > 0 && chance(rng, 0.5)) {
        res.set("wood_min", 1);
        res.set("ore_min", 1);
    }
}

fn one_random_rare(res: &mut Attributes, p: f64, rng: &mut ChaCha8Rng) {
    if chance(rng, p) {
        if let Some(rare) = choose(rng, &RARE_RESOURCES) {
            res.set(format!("{}_min", rare), 1);
        }
    }
}

/// `*_min` and `*_density` for every resource.
pub fn resource_attributes(region: &Region, rng: &mut ChaCha8Rng) -> Attributes {
    let mut res = Attributes::new();
    for r in RESOURCES {
        res.set(format!("{}_min", r), 0);
        res.set(format!("{}_density", r), 0);
    }

    let towns = region.attributes.int("neutral_towns_min");
    let castles = region.attributes.int("neutral_castle_min");

    match region.zone_type {
        Some(ZoneType::Start) => {
            res.set("wood_min", 1);
            res.set("ore_min", 1);
            one_random_rare(&mut res, 0.1, rng);
        }
        Some(ZoneType::Neutral) => {
            settlement_basics(&mut res, towns, castles, rng);
            one_random_rare(&mut res, 0.25, rng);
            if chance(rng, 0.05) {
                res.set("gold_min", 1);
            }
        }
        Some(ZoneType::Treasure) => {
            settlement_basics(&mut res, towns, castles, rng);
            for rare in pick_subset(rng, &RARE_RESOURCES, 0.2, Some(2)) {
                res.set(format!("{}_min", rare), 1);
            }
            if chance(rng, 0.10) {
                res.set("gold_min", 1);
            }
        }
        Some(ZoneType::SuperTreasure) => {
            settlement_basics(&mut res, towns, castles, rng);
            for rare in pick_subset(rng, &RARE_RESOURCES, 0.25, None) {
                res.set(format!("{}_min", rare), 1);
            }
            if chance(rng, 0.20) {
                res.set("gold_min", 1);
            }
        }
        Some(ZoneType::Junction) => {
            for r in RARE_RESOURCES.iter().chain(["gold"].iter()) {
                if chance(rng, 0.1) {
                    res.set(format!("{}_min", r), 1);
                }
            }
        }
        None => {}
    }
    res
}

pub fn terrain_and_monster_attributes(region: &Region, rng: &mut ChaCha8Rng) -> Attributes {
    let mut attrs = Attributes::new();
    let settled = region.has_town();
    let is_start = region.zone_type == Some(ZoneType::Start);

    let terrain_match = if is_start {
        1
    } else if settled {
        i64::from(chance(rng, 0.8))
    } else {
        0
    };
    attrs.set("terrain_match_town", terrain_match);

    for i in 1..=TERRAIN_SLOTS {
        attrs.set(format!("allowed_terrain_{}", i), 1);
    }

    let strength = match region.zone_type {
        Some(ZoneType::Start | ZoneType::Neutral | ZoneType::Junction) => 2,
        Some(ZoneType::Treasure) => {
            if chance(rng, 0.8) {
                2
            } else {
                3
            }
        }
        Some(ZoneType::SuperTreasure) => {
            if chance(rng, 0.7) {
                2
            } else {
                3
            }
        }
        None => 0,
    };
    attrs.set("monster_strength", strength);

    let monster_match = if is_start {
        0
    } else if settled {
        i64::from(chance(rng, 0.1))
    } else {
        0
    };
    attrs.set("monster_match_town", monster_match);

    for i in 1..=MONSTER_TYPE_SLOTS {
        attrs.set(format!("allowed_monster_type_{}", i), 1);
    }
    attrs
}

/// Base `(low, high)` treasure ranges of the three tiers.
fn treasure_ranges(zone: Option<ZoneType>) -> [(i64, i64); 3] {
    match zone {
        Some(ZoneType::Treasure) => [(3000, 6000), (10000, 15000), (15000, 20000)],
        Some(ZoneType::SuperTreasure) => [(10000, 15000), (15000, 20000), (20000, 30000)],
        _ => [(500, 3000), (3000, 6000), (10000, 15000)],
    }
}

pub fn treasure_attributes(zone: Option<ZoneType>, rng: &mut ChaCha8Rng) -> Attributes {
    let effective = match zone {
        Some(ZoneType::Junction) => {
            if chance(rng, 0.5) {
                Some(ZoneType::Neutral)
            } else {
                Some(ZoneType::Treasure)
            }
        }
        other => other,
    };

    let mut attrs = Attributes::new();
    for (tier, ((low, high), density)) in treasure_ranges(effective)
        .into_iter()
        .zip(TREASURE_DENSITIES)
        .enumerate()
    {
        let n = tier + 1;
        attrs.set(format!("treasure{}_low", n), jitter(rng, low));
        attrs.set(format!("treasure{}_high", n), jitter(rng, high));
        attrs.set(format!("treasure{}_density", n), density);
    }
    attrs.set("zone_placement", "");
    attrs.set("objects_section", "");
    attrs
}

/// Control parameters. Overrides take precedence over the drawn defaults.
pub fn meta_attributes(zone: Option<ZoneType>, overrides: &ManualOverrides, rng: &mut ChaCha8Rng) -> Attributes {
    let mut attrs = Attributes::new();
    for key in META_BLANK_KEYS {
        attrs.set(key, "");
    }

    attrs.set("allow_non_coherent_road", !chance(rng, 0.75));

    let disposition = match overrides.monster_disposition {
        Some(v) => v,
        None => weighted_index(rng, &[0.25, 0.5, 0.25]) as i64,
    };
    attrs.set("monster_disposition", disposition);
    attrs.set("joining_percent", overrides.joining_percent.unwrap_or(1));
    attrs.set("join_only_for_money", overrides.join_only_for_money.unwrap_or(true));

    let shipyard = zone == Some(ZoneType::SuperTreasure) && rng.gen_bool(0.1);
    attrs.set("shipyard_min", if shipyard { 1 } else { 0 });

    let road_block = if zone == Some(ZoneType::Start) { 4000 } else { 0 };
    attrs.set("max_road_block_value", road_block);
    attrs
}

/// Every attribute key a fully assigned region of `zone` carries.
pub fn required_keys(zone: Option<ZoneType>) -> Vec<String> {
    let mut keys: Vec<String> = match zone {
        Some(z) => base_rules(z).into_iter().map(|(k, _)| k).collect(),
        None => Vec::new(),
    };
    for r in RESOURCES {
        keys.push(format!("{}_min", r));
        keys.push(format!("{}_density", r));
    }
    keys.push("terrain_match_town".into());
    keys.extend((1..=TERRAIN_SLOTS).map(|i| format!("allowed_terrain_{}", i)));
    keys.push("monster_strength".into());
    keys.push("monster_match_town".into());
    keys.extend((1..=MONSTER_TYPE_SLOTS).map(|i| format!("allowed_monster_type_{}", i)));
    for n in 1..=3 {
        keys.push(format!("treasure{}_low", n));
        keys.push(format!("treasure{}_high", n));
        keys.push(format!("treasure{}_density", n));
    }
    keys.push("zone_placement".into());
    keys.push("objects_section".into());
    keys.extend(META_BLANK_KEYS.iter().map(|k| k.to_string()));
    keys.extend(META_DRAWN_KEYS.iter().map(|k| k.to_string()));
    keys
}

/// Keys of `zone`'s rule set missing from `region`.
pub fn missing_keys(region: &Region) -> Vec<String> {
    required_keys(region.zone_type)
        .into_iter()
        .filter(|k| !region.attributes.contains(k))
        .collect()
}
