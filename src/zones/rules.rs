//! Base zone rules, one table per zone type.
//!
//! Each rule is an explicit descriptor: a constant, an independent draw, or
//! a draw that reads the region being filled (its owner or attributes set
//! by earlier rules of the same table).

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::graph::{AttrValue, Region, ZoneType};
use crate::random::{chance, pick_weighted};

pub const CASTLE_SLOTS: usize = 12;

/// How one attribute of a zone is produced.
#[derive(Clone, Debug)]
pub enum Rule {
    Fixed(AttrValue),
    Draw(fn(&mut ChaCha8Rng) -> AttrValue),
    FromRegion(fn(&Region, &mut ChaCha8Rng) -> AttrValue),
}

impl Rule {
    pub fn evaluate(&self, region: &Region, rng: &mut ChaCha8Rng) -> AttrValue {
        match self {
            Rule::Fixed(value) => value.clone(),
            Rule::Draw(draw) => draw(rng),
            Rule::FromRegion(draw) => draw(region, rng),
        }
    }
}

fn fixed(value: impl Into<AttrValue>) -> Rule {
    Rule::Fixed(value.into())
}

/// Zone-type code written to the `zone_type` attribute.
fn zone_code(zone: ZoneType) -> i64 {
    match zone {
        ZoneType::Start => 1,
        ZoneType::Treasure | ZoneType::SuperTreasure => 2,
        ZoneType::Neutral | ZoneType::Junction => 3,
    }
}

fn size_rule(zone: ZoneType) -> Rule {
    match zone {
        ZoneType::Junction => Rule::Draw(|rng| AttrValue::Int(rng.gen_range(15..=25))),
        ZoneType::SuperTreasure => Rule::Draw(|rng| AttrValue::Int(rng.gen_range(20..=40))),
        _ => Rule::Draw(|rng| AttrValue::Int(rng.gen_range(15..=40))),
    }
}

fn neutral_towns_rule(zone: ZoneType) -> Rule {
    match zone {
        ZoneType::Start | ZoneType::Neutral => {
            Rule::Draw(|rng| AttrValue::Int(if chance(rng, 0.2) { 1 } else { 0 }))
        }
        ZoneType::Treasure | ZoneType::SuperTreasure => {
            Rule::Draw(|rng| AttrValue::Int(pick_weighted(rng, &[(2, 0.1), (1, 0.25), (0, 0.65)])))
        }
        ZoneType::Junction => fixed(0),
    }
}

/// Castles are only drawn for zones without a guaranteed town.
fn neutral_castle_rule(zone: ZoneType) -> Rule {
    match zone {
        ZoneType::Start | ZoneType::Junction => fixed(0),
        ZoneType::Neutral => Rule::FromRegion(|region, rng| {
            if region.attributes.int("neutral_towns_min") > 0 {
                AttrValue::Int(0)
            } else {
                AttrValue::Int(pick_weighted(rng, &[(1, 0.1), (0, 0.9)]))
            }
        }),
        ZoneType::Treasure => Rule::FromRegion(|region, rng| {
            if region.attributes.int("neutral_towns_min") > 0 {
                AttrValue::Int(0)
            } else {
                AttrValue::Int(pick_weighted(rng, &[(1, 0.2), (0, 0.8)]))
            }
        }),
        ZoneType::SuperTreasure => Rule::FromRegion(|region, rng| {
            if region.attributes.int("neutral_towns_min") > 0 {
                AttrValue::Int(0)
            } else {
                AttrValue::Int(pick_weighted(rng, &[(2, 0.1), (1, 0.15), (0, 0.75)]))
            }
        }),
    }
}

fn all_castle_same_rule(zone: ZoneType) -> Rule {
    match zone {
        ZoneType::Junction => fixed(""),
        _ => Rule::Draw(|rng| AttrValue::from(rng.gen_bool(0.5))),
    }
}

/// Ordered base rules for `zone`. Later rules may read values set by earlier ones.
pub fn base_rules(zone: ZoneType) -> Vec<(String, Rule)> {
    let mut rules: Vec<(String, Rule)> = vec![
        ("zone_type".into(), fixed(zone_code(zone))),
        ("zone_size".into(), size_rule(zone)),
        ("res_parameter1".into(), fixed(1)),
        ("res_parameter2".into(), fixed(8)),
        ("res_parameter3".into(), fixed(2)),
        ("res_parameter4".into(), fixed(8)),
    ];

    let player_control = match zone {
        ZoneType::Start => Rule::FromRegion(|region, _| AttrValue::Int(region.owner.map(i64::from).unwrap_or(0))),
        _ => fixed(0),
    };
    rules.push(("player_control".into(), player_control));

    let player_castles = if zone == ZoneType::Start { 1 } else { 0 };
    rules.extend([
        ("player_towns_min".into(), fixed(0)),
        ("player_castles_min".into(), fixed(player_castles)),
        ("player_towns_density".into(), fixed(0)),
        ("player_castles_density".into(), fixed(0)),
        ("neutral_towns_min".into(), neutral_towns_rule(zone)),
        ("neutral_castle_min".into(), neutral_castle_rule(zone)),
        ("neutral_towns_density".into(), fixed(0)),
        ("neutral_castle_density".into(), fixed(0)),
        ("all_castle_same".into(), all_castle_same_rule(zone)),
    ]);

    for i in 1..=CASTLE_SLOTS {
        rules.push((format!("allowed_castle_{}", i), fixed("x")));
    }
    rules
}
